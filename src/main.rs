//! tallyfile - file inventory generator.
//!
//! Usage:
//!   tallyfile ?                            Show help
//!   tallyfile -da [crc32|md5|sha1]         Inventory the current directory
//!   tallyfile -de <dir> [crc32|md5|sha1]   Inventory a directory
//!   tallyfile -der <dir> [crc32|md5|sha1]  Inventory a directory and its subdirectories
//!   tallyfile -t <text> [crc32|md5|sha1]   Digest a text string

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tallyfile_scan::{DigestSource, InventoryConfig, InventoryError, compute_digest, generate_inventory};

mod cli;

use cli::Invocation;

#[derive(Parser)]
#[command(
    name = "tallyfile",
    version,
    about = "Generate an inventory of files with their hash (sha256 by default)",
    long_about = "tallyfile lists every file of a directory with its content hash, size in \
                  bytes and modification time, tab-separated. A crc32, md5 or sha1 hash \
                  can be chosen instead of sha256.",
    after_help = "Options:\n  \
                  ?     Show this help. Also shown when run without arguments.\n  \
                  -da   Inventory the files of the current directory.\n  \
                  -de   Inventory the files of <directory>.\n  \
                  -der  Inventory <directory> and its subdirectories.\n  \
                  -t    Print the hash of <text>.",
    override_usage = "tallyfile ?\n       \
                      tallyfile -da [crc32|md5|sha1]\n       \
                      tallyfile -de <directory> [crc32|md5|sha1]\n       \
                      tallyfile -der <directory> [crc32|md5|sha1]\n       \
                      tallyfile -t <text> [crc32|md5|sha1]"
)]
struct Cli {
    /// Diagnostics filter written to stderr (e.g. "info", "tallyfile_scan=debug")
    #[arg(long, env = "TALLYFILE_LOG", default_value = "warn")]
    log_level: String,

    /// Option, target and algorithm tokens
    #[arg(allow_hyphen_values = true, trailing_var_arg = true, num_args = 0..)]
    args: Vec<String>,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let invocation = match Invocation::parse(&cli.args) {
        Ok(invocation) => invocation,
        Err(err) => return Ok(report_failure(&err)),
    };

    match invocation {
        Invocation::Help => match write_help(&mut io::stdout().lock()) {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(err) => Ok(report_failure(&err)),
        },
        Invocation::Text { text, algorithm } => {
            let hex = compute_digest(DigestSource::Text(text.as_bytes()), algorithm)?;
            match writeln!(io::stdout().lock(), "{hex}") {
                Ok(()) => Ok(ExitCode::SUCCESS),
                Err(err) => Ok(report_failure(&err.into())),
            }
        }
        Invocation::Inventory {
            target,
            mode,
            algorithm,
        } => {
            let root = match cli::resolve_target(target.as_deref()) {
                Ok(root) => root,
                Err(err) => return Ok(report_failure(&err)),
            };

            let config = InventoryConfig::builder()
                .root(root)
                .algorithm(algorithm)
                .mode(mode)
                .build()
                .context("Invalid inventory configuration")?;

            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            match generate_inventory(&config, &mut out) {
                Ok(_) => Ok(ExitCode::SUCCESS),
                Err(err) => Ok(report_failure(&err)),
            }
        }
    }
}

/// Write the name and version line followed by the long help.
fn write_help<W: Write>(out: &mut W) -> Result<(), InventoryError> {
    let mut command = Cli::command();
    writeln!(out, "{} {}", command.get_name(), env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    write!(out, "{}", command.render_long_help())?;
    out.flush()?;
    Ok(())
}

/// Print a fatal error and pick the matching exit code.
fn report_failure(err: &InventoryError) -> ExitCode {
    tracing::debug!(code = err.exit_code(), "aborting");
    match err {
        // stdout is gone; stderr is the only place left
        InventoryError::Output { .. } => eprintln!("{err}"),
        _ => println!("{err}"),
    }
    ExitCode::from(err.exit_code())
}

/// Send diagnostics to stderr so stdout carries only the inventory.
fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}
