//! Per-user client configuration.
//!
//! Only one key is consumed from `osu!.<user>.cfg`: the beatmap root.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

const BEATMAP_DIRECTORY_KEY: &str = "BeatmapDirectory = ";

/// Read the `BeatmapDirectory` value from a config file.
///
/// The value is trimmed and backslash-normalized. It is either a
/// drive-letter path or relative to the install directory; the caller
/// decides which.
pub fn beatmap_directory(cfg_path: &Path) -> Result<String> {
    let file = File::open(cfg_path)?;

    for line in BufReader::new(file).lines() {
        let line = line?;
        if let Some(value) = parse_beatmap_directory(&line) {
            return Ok(value);
        }
    }

    Err(Error::PathResolveFailed(format!(
        "BeatmapDirectory missing from {}",
        cfg_path.display()
    )))
}

pub fn parse_beatmap_directory(line: &str) -> Option<String> {
    line.strip_prefix(BEATMAP_DIRECTORY_KEY)
        .map(|value| value.trim().replace('\\', "/"))
}
