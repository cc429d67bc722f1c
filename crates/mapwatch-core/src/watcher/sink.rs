//! Mirror file for the currently selected beatmap.

use std::fs;
use std::path::PathBuf;

use crate::error::Result;

/// Writes the current path to a single file for external consumers.
///
/// Each change replaces the file with the line `0 <path>` (no trailing
/// newline). The write goes through a temporary sibling followed by a
/// rename, so a reader never observes a partial line.
pub struct ChangeSink {
    enabled: bool,
    path: PathBuf,
}

impl ChangeSink {
    pub fn new(enabled: bool, path: impl Into<PathBuf>) -> Self {
        Self {
            enabled,
            path: path.into(),
        }
    }

    pub fn write(&self, full_path: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let mut tmp_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);

        fs::write(&tmp, format!("0 {full_path}"))?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
