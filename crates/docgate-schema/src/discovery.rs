//! # File Discovery
//!
//! Expands a glob pattern into the list of candidate data files. Paths are
//! returned in the order the glob engine yields them (alphabetical within
//! each directory) and are not filtered by extension here.

use std::path::PathBuf;

use crate::error::CheckError;

/// Expand `pattern` into matching filesystem paths.
///
/// Entries that cannot be read while walking (e.g. permission denied) are
/// logged and skipped.
///
/// # Errors
///
/// - [`CheckError::InvalidPattern`] if the pattern does not parse.
/// - [`CheckError::NoMatches`] if nothing matches.
pub fn resolve_pattern(pattern: &str) -> Result<Vec<PathBuf>, CheckError> {
    let entries = glob::glob(pattern).map_err(|e| CheckError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => {
                tracing::warn!(
                    path = %e.path().display(),
                    error = %e.error(),
                    "skipping unreadable glob entry"
                );
            }
        }
    }

    if files.is_empty() {
        return Err(CheckError::NoMatches {
            pattern: pattern.to_string(),
        });
    }

    tracing::info!(pattern, count = files.len(), "resolved data files");
    Ok(files)
}
