//! Resolution of the game's Windows-style paths into real Linux paths.
//!
//! The client runs under Wine and reports paths rooted in its emulated
//! Windows installation. Resolving them means finding the Wine prefix,
//! pulling the install directory out of the registry hives, translating
//! drive letters through `dosdevices`, and reading the per-user config
//! for the beatmap root.

pub mod casefix;
pub mod config;
pub mod dosdevices;
pub mod prefix;
pub mod registry;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

pub use casefix::repair_case;

/// Resolves the songs root directory for a target PID.
///
/// The procfs root and passwd path are injectable so tests can run
/// against fixture trees. Resolution is expected to run once per
/// process incarnation; every input it reads is stable for the life of
/// the process.
pub struct SongsResolver {
    proc_root: PathBuf,
    passwd_path: PathBuf,
}

impl Default for SongsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SongsResolver {
    pub fn new() -> Self {
        Self::with_roots("/proc", "/etc/passwd")
    }

    pub fn with_roots(proc_root: impl AsRef<Path>, passwd_path: impl AsRef<Path>) -> Self {
        Self {
            proc_root: proc_root.as_ref().to_path_buf(),
            passwd_path: passwd_path.as_ref().to_path_buf(),
        }
    }

    /// Resolve the absolute beatmap root directory for `pid`.
    pub fn resolve(&self, pid: i32) -> Result<PathBuf> {
        let environ = fs::read(self.proc_root.join(pid.to_string()).join("environ"))
            .unwrap_or_default();
        let env_prefix = prefix::wineprefix_from_environ(&environ);

        let uid = prefix::login_uid(&self.proc_root, pid)?;
        let passwd = fs::read_to_string(&self.passwd_path)?;
        let (user, home) = prefix::user_entry(&passwd, &uid)
            .ok_or_else(|| Error::PathResolveFailed(format!("uid {uid} not found in passwd")))?;

        let wine_prefix = env_prefix.unwrap_or_else(|| home.join(".wine"));
        debug!(prefix = %wine_prefix.display(), user = %user, "resolving through wine prefix");

        let install_windows = registry::install_path(&wine_prefix)?;
        let install = dosdevices::map_windows_path(&wine_prefix, &install_windows)?;

        let cfg_path = install.join(format!("osu!.{user}.cfg"));
        let beatmap_dir = config::beatmap_directory(&cfg_path)?;

        let songs = if beatmap_dir.chars().nth(1) == Some(':') {
            dosdevices::map_windows_path(&wine_prefix, &beatmap_dir)?
        } else {
            let candidate = format!("{}/{}", install.display(), beatmap_dir);
            let repaired = repair_case(&candidate, install.as_os_str().len())?;
            fs::canonicalize(&repaired)?
        };

        debug!(songs = %songs.display(), "songs root resolved");
        Ok(songs)
    }
}
