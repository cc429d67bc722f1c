//! Target process discovery over procfs.
//!
//! A cached PID is revalidated cheaply with signal 0; only when that
//! fails is the process table walked again.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::bridge;

/// Outcome of the most recent [`ProcessLocator::locate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanStatus {
    #[default]
    Unknown,
    /// The target was found during this tick; caches must be rebuilt.
    Discovered,
    /// The cached PID is still running.
    StillAlive,
    Missing,
}

/// Per-tick handle tracking the target PID and how it was obtained.
#[derive(Debug, Clone, Default)]
pub struct ScanContext {
    pub pid: i32,
    pub status: ScanStatus,
}

pub struct ProcessLocator {
    proc_root: PathBuf,
    target: String,
}

impl ProcessLocator {
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_proc_root("/proc", target)
    }

    /// Use an alternative procfs root, letting tests run against a
    /// fixture tree.
    pub fn with_proc_root(proc_root: impl AsRef<Path>, target: impl Into<String>) -> Self {
        Self {
            proc_root: proc_root.as_ref().to_path_buf(),
            target: target.into(),
        }
    }

    /// Refresh `ctx` with the current location of the target process.
    ///
    /// A cached PID that still answers signal 0 is kept as-is. Otherwise
    /// every numeric procfs entry is checked against the target name via
    /// its `comm` file. Entries that vanish mid-scan are skipped.
    pub fn locate(&self, ctx: &mut ScanContext) {
        if ctx.pid != 0 && bridge::is_alive(ctx.pid) {
            ctx.status = ScanStatus::StillAlive;
            return;
        }

        ctx.pid = 0;
        ctx.status = ScanStatus::Missing;

        let Ok(entries) = fs::read_dir(&self.proc_root) else {
            return;
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(pid) = name.to_str().and_then(|s| s.parse::<i32>().ok()) else {
                continue;
            };
            if pid <= 0 {
                continue;
            }

            let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
                continue;
            };

            if comm.trim_end() == self.target {
                debug!(pid, "found {}", self.target);
                ctx.pid = pid;
                ctx.status = ScanStatus::Discovered;
                return;
            }
        }
    }
}
