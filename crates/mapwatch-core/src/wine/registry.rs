//! Install path extraction from Wine registry hives.
//!
//! The hives are not treated as INI: a line-oriented scan with a small
//! armed/disarmed state matches the observed layout and tolerates both
//! CRLF and LF. Key paths inside the hive files carry escaped (doubled)
//! backslashes, and so does the extracted value; the dosdevices mapping
//! collapses them later.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Subkeys whose command value names the executable, lowercased for
/// case-insensitive matching.
const COMMAND_SUBKEYS: [&str; 2] = [
    r"osu\\shell\\open\\command",
    r"osustable.file.osz\\shell\\open\\command",
];

const EXECUTABLE: &str = "osu!.exe";

/// Find the Windows install path recorded in the prefix's registry.
///
/// `system.reg` is consulted first, then `user.reg`; the first finding
/// wins. A missing hive file is skipped.
pub fn install_path(prefix: &Path) -> Result<String> {
    for hive in ["system.reg", "user.reg"] {
        let Ok(file) = File::open(prefix.join(hive)) else {
            continue;
        };

        let lines = BufReader::new(file).lines().map_while(|line| line.ok());
        if let Some(found) = scan_hive(lines) {
            debug!(hive, path = found, "install path found");
            return Ok(found);
        }
    }

    Err(Error::PathResolveFailed(
        "install path not present in registry hives".to_string(),
    ))
}

/// Scan hive lines for a command subkey, then extract the install path
/// from the value lines that follow it.
pub fn scan_hive<I>(lines: I) -> Option<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut armed = false;

    for line in lines {
        let line = line.as_ref().trim_end_matches('\r');
        let lower = line.to_lowercase();

        if COMMAND_SUBKEYS.iter().any(|key| lower.contains(key)) {
            armed = true;
            continue;
        }

        if armed && let Some(path) = extract_install_path(line) {
            return Some(path);
        }
    }

    None
}

/// Cut a command line down to the drive-letter path before the
/// executable name.
///
/// The line is truncated at the first `osu!.exe` (case-sensitive); the
/// result starts one character before the last `:\` of the remaining
/// head, i.e. at the drive letter.
pub fn extract_install_path(line: &str) -> Option<String> {
    let exe = line.find(EXECUTABLE)?;
    let head = &line[..exe];

    let colon = head.rfind(":\\")?;
    if colon == 0 {
        return None;
    }

    let drive = head.as_bytes()[colon - 1];
    if !drive.is_ascii_alphabetic() {
        return None;
    }

    Some(head[colon - 1..].to_string())
}
