//! Wine prefix and user discovery for the target process.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;

/// Value the kernel reports in `loginuid` when no login session exists.
const NO_LOGIN_UID: &str = "4294967295";
/// UID assumed when the target has no login session. Kept for
/// compatibility with existing deployments; real systems may not run
/// the client as uid 1000.
const FALLBACK_UID: &str = "1000";

/// Extract `WINEPREFIX` from a `/proc/<pid>/environ` blob
/// (NUL-separated `KEY=VALUE` records).
pub fn wineprefix_from_environ(environ: &[u8]) -> Option<PathBuf> {
    environ
        .split(|&b| b == 0)
        .filter_map(|record| std::str::from_utf8(record).ok())
        .find_map(|record| record.strip_prefix("WINEPREFIX="))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// The target's login UID as a string, read from procfs.
pub fn login_uid(proc_root: &Path, pid: i32) -> Result<String> {
    let raw = fs::read_to_string(proc_root.join(pid.to_string()).join("loginuid"))?;
    let uid = raw.trim();

    if uid == NO_LOGIN_UID {
        warn!("target has no login session, assuming uid {FALLBACK_UID}");
        return Ok(FALLBACK_UID.to_string());
    }

    Ok(uid.to_string())
}

/// Look up `(name, home)` for `uid` in passwd-format content.
pub fn user_entry(passwd: &str, uid: &str) -> Option<(String, PathBuf)> {
    for line in passwd.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < 6 {
            continue;
        }
        if fields[2] == uid {
            return Some((fields[0].to_string(), PathBuf::from(fields[5])));
        }
    }
    None
}
