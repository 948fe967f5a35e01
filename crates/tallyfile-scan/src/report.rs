//! Report header and footer around the inventory lines.

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};

use tallyfile_core::{Algorithm, InventoryConfig, InventoryError, InventoryStats, format_timestamp};

use crate::walker::InventoryWalker;

/// Separator rule between the framing and the inventory lines.
pub const RULE: &str = "----------------------------------------------------------------";

/// Column header line.
pub const COLUMNS: &str = "HASH\tBYTES\tFECHA_MODIFICADO\tARCHIVO";

/// Write the five-line report header.
pub fn emit_header<W: Write>(
    out: &mut W,
    target: &Path,
    algorithm: Algorithm,
    user: &str,
    started: &DateTime<Local>,
) -> io::Result<()> {
    writeln!(out, "Inventory ({algorithm}) generated by: {user}")?;
    writeln!(out, "For: {}", target.display())?;
    writeln!(out, "Start: {}", format_timestamp(started))?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{COLUMNS}")
}

/// Write the closing rule and end timestamp.
pub fn emit_footer<W: Write>(out: &mut W, ended: &DateTime<Local>) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "End: {}", format_timestamp(ended))
}

/// Login name of the invoking user.
///
/// The usual environment variables win; the password database entry for the
/// effective uid is the fallback.
pub fn current_user() -> String {
    resolve_user(|var| std::env::var(var).ok())
}

fn resolve_user(env: impl Fn(&str) -> Option<String>) -> String {
    ["LOGNAME", "USER", "LNAME", "USERNAME"]
        .iter()
        .filter_map(|var| env(var))
        .find(|name| !name.is_empty())
        .or_else(account_name)
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(unix)]
fn account_name() -> Option<String> {
    use std::ffi::CStr;

    let uid = unsafe { libc::geteuid() };
    let pw = unsafe { libc::getpwuid(uid) };
    if pw.is_null() {
        tracing::debug!(uid, "no password entry for effective uid");
        return None;
    }

    // SAFETY: getpwuid returned a valid non-null pointer, pw_name is a valid C string
    let name = unsafe { CStr::from_ptr((*pw).pw_name) };
    Some(name.to_string_lossy().into_owned()).filter(|name| !name.is_empty())
}

#[cfg(not(unix))]
fn account_name() -> Option<String> {
    None
}

/// Run a complete framed inventory for `config`, writing it to `out`.
///
/// The root is expected to be an existing directory; callers validate the
/// target before the header is written.
pub fn generate_inventory<W: Write>(
    config: &InventoryConfig,
    out: &mut W,
) -> Result<InventoryStats, InventoryError> {
    let user = config.user.clone().unwrap_or_else(current_user);
    let started = Local::now();
    tracing::info!(
        root = %config.root.display(),
        algorithm = %config.algorithm,
        mode = ?config.mode,
        "starting inventory"
    );

    emit_header(out, &config.root, config.algorithm, &user, &started)?;
    let stats = InventoryWalker::from_config(config).walk(&config.root, config.mode, out)?;
    emit_footer(out, &Local::now())?;
    out.flush()?;

    tracing::info!(
        files = stats.files,
        bytes = stats.bytes,
        dirs = stats.dirs,
        locked = stats.locked,
        errors = stats.errors,
        "inventory complete"
    );
    if !stats.is_clean() {
        tracing::warn!(
            locked = stats.locked,
            errors = stats.errors,
            "some entries could not be inventoried"
        );
    }
    Ok(stats)
}
