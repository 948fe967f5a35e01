//! Interpretation of the command tokens.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tallyfile_core::{Algorithm, InventoryError, TraversalMode};

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print usage help.
    Help,
    /// Inventory a directory (None = current directory).
    Inventory {
        target: Option<PathBuf>,
        mode: TraversalMode,
        algorithm: Algorithm,
    },
    /// Digest a text string.
    Text { text: String, algorithm: Algorithm },
}

impl Invocation {
    /// Parse the positional tokens.
    ///
    /// ```text
    /// ?                           usage help (also with no tokens)
    /// -da [algorithm]             current directory
    /// -de <directory> [algorithm] named directory
    /// -der <directory> [algorithm] named directory and subdirectories
    /// -t <text> [algorithm]       digest of a text string
    /// ```
    pub fn parse(args: &[String]) -> Result<Self, InventoryError> {
        let Some((option, rest)) = args.split_first() else {
            return Ok(Self::Help);
        };

        match option.as_str() {
            "?" => Ok(Self::Help),
            "-da" => Ok(Self::Inventory {
                target: None,
                mode: TraversalMode::Flat,
                algorithm: parse_algorithm(rest)?,
            }),
            "-de" | "-der" => {
                let (target, rest) = rest.split_first().ok_or(InventoryError::MissingDirectory)?;
                let mode = if option == "-der" {
                    TraversalMode::Recursive
                } else {
                    TraversalMode::Flat
                };
                Ok(Self::Inventory {
                    target: Some(PathBuf::from(target)),
                    mode,
                    algorithm: parse_algorithm(rest)?,
                })
            }
            "-t" => {
                let (text, rest) = rest.split_first().ok_or(InventoryError::MissingText)?;
                Ok(Self::Text {
                    text: text.clone(),
                    algorithm: parse_algorithm(rest)?,
                })
            }
            other => Err(InventoryError::UnrecognizedOption {
                option: other.to_string(),
            }),
        }
    }
}

/// Optional trailing algorithm token; anything after it is rejected.
///
/// Only `crc32`, `md5` and `sha1` can be named. SHA-256 is chosen by
/// leaving the token out.
fn parse_algorithm(rest: &[String]) -> Result<Algorithm, InventoryError> {
    match rest {
        [] => Ok(Algorithm::default()),
        [token] => match Algorithm::from_str(token) {
            Ok(algorithm) if algorithm != Algorithm::default() => Ok(algorithm),
            _ => Err(InventoryError::UnexpectedArgument {
                argument: token.clone(),
            }),
        },
        [_, extra, ..] => Err(InventoryError::UnexpectedArgument {
            argument: extra.clone(),
        }),
    }
}

/// Validate the inventory target and return its absolute form.
pub fn resolve_target(target: Option<&Path>) -> Result<PathBuf, InventoryError> {
    let Some(target) = target else {
        return std::env::current_dir().map_err(|e| InventoryError::target(".", &e));
    };

    let metadata = std::fs::metadata(target).map_err(|e| InventoryError::target(target, &e))?;
    if !metadata.is_dir() {
        return Err(InventoryError::NotADirectory {
            path: target.to_path_buf(),
        });
    }
    target
        .canonicalize()
        .map_err(|e| InventoryError::target(target, &e))
}
