//! Drive-letter translation through the prefix's `dosdevices` tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::casefix::repair_case;

/// Map a Windows drive-letter path onto the Linux filesystem.
///
/// `C:\Games\osu!` becomes `<prefix>/dosdevices/c:/Games/osu!`, gets
/// its case repaired against the disk, and is canonicalized so the
/// drive-letter symlink resolves to its real target. Doubled
/// backslashes from registry escaping collapse harmlessly into extra
/// slashes on the way.
pub fn map_windows_path(prefix: &Path, windows_path: &str) -> Result<PathBuf> {
    let bytes = windows_path.as_bytes();
    if bytes.len() < 2 || !bytes[0].is_ascii_alphabetic() || bytes[1] != b':' {
        return Err(Error::PathResolveFailed(format!(
            "not a drive-letter path: {windows_path:?}"
        )));
    }

    let drive = bytes[0].to_ascii_lowercase() as char;
    let rest = windows_path[2..].replace('\\', "/");

    let mount = format!("{}/dosdevices/{drive}:", prefix.display());
    let candidate = format!("{mount}{rest}");

    let repaired = repair_case(&candidate, mount.len())?;
    let canonical = fs::canonicalize(&repaired).map_err(|e| {
        Error::PathResolveFailed(format!(
            "cannot canonicalize {}: {e}",
            repaired.display()
        ))
    })?;

    Ok(canonical)
}
