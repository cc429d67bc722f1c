//! Case-insensitive repair of paths recorded with Windows semantics.
//!
//! Names stored in the registry or config may differ in case from the
//! on-disk Linux spelling; each missing segment is re-matched against
//! its parent directory listing.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Fix the case of every `/`-separated segment of `candidate` after
/// byte position `pos`, which marks the end of a prefix already known
/// to exist with correct case.
///
/// A segment that exists as spelled is accepted as-is; otherwise the
/// parent directory is listed and the segment matched ignoring case.
/// Trailing whitespace, `.`, and `/` are stripped from a segment before
/// matching. A segment with no match fails the whole resolution.
pub fn repair_case(candidate: &str, pos: usize) -> Result<PathBuf> {
    let mut resolved = candidate[..pos].trim_end_matches('/').to_string();

    for segment in candidate[pos..].split('/') {
        let segment = segment.trim_end_matches([' ', '.', '/']);
        if segment.is_empty() {
            continue;
        }

        let attempt = format!("{resolved}/{segment}");
        if Path::new(&attempt).exists() {
            resolved = attempt;
            continue;
        }

        let on_disk = match_entry(Path::new(&resolved), segment)?;
        resolved = format!("{resolved}/{on_disk}");
    }

    Ok(PathBuf::from(resolved))
}

fn match_entry(parent: &Path, segment: &str) -> Result<String> {
    let want = segment.to_lowercase();

    let entries = fs::read_dir(parent).map_err(|_| not_found(parent, segment))?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if let Some(name) = name.to_str()
            && name.to_lowercase() == want
        {
            return Ok(name.to_string());
        }
    }

    Err(not_found(parent, segment))
}

fn not_found(parent: &Path, segment: &str) -> Error {
    Error::PathResolveFailed(format!(
        "no entry matching {segment:?} under {}",
        parent.display()
    ))
}
