//! Polling loop that tracks the selected beatmap of a running client.
//!
//! One driver owns all state. Each tick sequences discovery, a
//! one-time signature scan, the pointer walk, and emission; a cached
//! PID, anchor, and songs root live and die together with the observed
//! process incarnation.

mod sink;

pub use sink::ChangeSink;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::game::{BEATMAP_SIGNATURE, TARGET_PROCESS, read_current_beatmap};
use crate::process::{
    BufferPool, ProcessLocator, ProcessMemory, ScanContext, ScanStatus, find_signature, maps,
};
use crate::wine::SongsResolver;

/// Tick pacing.
pub mod timing {
    /// Interval between readings while anchored to a live target.
    pub const POLL_INTERVAL_MS: u64 = 500;
    /// Interval while waiting for the target to appear.
    pub const IDLE_INTERVAL_MS: u64 = 300;
    /// Backoff after a signature scan that found nothing.
    pub const SCAN_BACKOFF_MS: u64 = 3000;
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Stop after the first successful reading.
    pub run_once: bool,
    /// Mirror each change into `file_path`.
    pub write_to_file: bool,
    pub file_path: PathBuf,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            run_once: false,
            write_to_file: false,
            file_path: PathBuf::from("/tmp/osu_path"),
        }
    }
}

pub struct MapWatcher {
    options: WatchOptions,
    locator: ProcessLocator,
    resolver: SongsResolver,
    sink: ChangeSink,
    pool: BufferPool,
    ctx: ScanContext,
    anchor: Option<u64>,
    songs_root: Option<PathBuf>,
    songs_root_resolved: bool,
    last_emitted: Option<String>,
    waiting_logged: bool,
}

impl MapWatcher {
    pub fn new(options: WatchOptions) -> Self {
        let sink = ChangeSink::new(options.write_to_file, options.file_path.clone());

        Self {
            locator: ProcessLocator::new(TARGET_PROCESS),
            resolver: SongsResolver::new(),
            sink,
            pool: BufferPool::new(),
            ctx: ScanContext::default(),
            anchor: None,
            songs_root: None,
            songs_root_resolved: false,
            last_emitted: None,
            waiting_logged: false,
            options,
        }
    }

    /// Drive ticks until `stop` is set. Returns the last observed path.
    ///
    /// In run-once mode the first successful reading sets `stop` itself
    /// and the loop returns immediately after.
    pub fn run(&mut self, stop: &AtomicBool) -> Option<String> {
        while !stop.load(Ordering::SeqCst) {
            let delay = self.tick();

            if self.options.run_once && self.last_emitted.is_some() {
                stop.store(true, Ordering::SeqCst);
                break;
            }
            if stop.load(Ordering::SeqCst) {
                break;
            }
            thread::sleep(delay);
        }

        self.last_emitted.clone()
    }

    fn tick(&mut self) -> Duration {
        self.locator.locate(&mut self.ctx);

        match self.ctx.status {
            ScanStatus::Unknown | ScanStatus::Missing => {
                if !self.waiting_logged {
                    info!("waiting for {TARGET_PROCESS}...");
                    self.waiting_logged = true;
                }
                self.drop_target_caches();
                Duration::from_millis(timing::IDLE_INTERVAL_MS)
            }
            ScanStatus::Discovered => {
                info!(pid = self.ctx.pid, "found {TARGET_PROCESS}");
                self.waiting_logged = false;
                self.drop_target_caches();
                self.read_target()
            }
            ScanStatus::StillAlive => self.read_target(),
        }
    }

    fn read_target(&mut self) -> Duration {
        let pid = self.ctx.pid;

        if !self.songs_root_resolved {
            self.songs_root_resolved = true;
            match self.resolver.resolve(pid) {
                Ok(root) => {
                    info!(root = %root.display(), "songs directory resolved");
                    self.songs_root = Some(root);
                }
                // Readings are still emitted without a prefix; downstream
                // consumers can find the songs folder on their own.
                Err(e) => warn!("songs directory not resolved: {e}"),
            }
        }

        let memory = ProcessMemory::new(pid);

        let anchor = match self.anchor {
            Some(anchor) => anchor,
            None => match self.scan_for_anchor(&memory, pid) {
                Ok(anchor) => anchor,
                Err(delay) => return delay,
            },
        };

        match read_current_beatmap(&memory, anchor, &self.pool) {
            Ok(relative) => {
                self.emit(&relative);
                Duration::from_millis(timing::POLL_INTERVAL_MS)
            }
            Err(e) => {
                debug!("beatmap read failed: {e}");
                self.reset_target();
                Duration::from_millis(timing::IDLE_INTERVAL_MS)
            }
        }
    }

    /// Locate the signature anchor, or return how long to wait before
    /// the next attempt.
    fn scan_for_anchor(&mut self, memory: &ProcessMemory, pid: i32) -> Result<u64, Duration> {
        let regions = match maps::readable_regions(pid) {
            Ok(regions) => regions,
            Err(e) => {
                debug!("cannot enumerate regions: {e}");
                self.reset_target();
                return Err(Duration::from_millis(timing::IDLE_INTERVAL_MS));
            }
        };

        match find_signature(memory, regions, &BEATMAP_SIGNATURE, &self.pool) {
            Ok(address) => {
                debug!("beatmap anchor located at {address:#x}");
                self.anchor = Some(address);
                Ok(address)
            }
            Err(_) => {
                debug!("signature scan missed, backing off");
                Err(Duration::from_millis(timing::SCAN_BACKOFF_MS))
            }
        }
    }

    /// Emit `relative` if it differs from the previous reading.
    fn emit(&mut self, relative: &str) -> bool {
        let full = self.full_path(relative);
        if self.last_emitted.as_deref() == Some(full.as_str()) {
            return false;
        }

        info!("{full}");
        if let Err(e) = self.sink.write(&full) {
            warn!("sink write failed: {e}");
        }

        self.last_emitted = Some(full);
        true
    }

    fn full_path(&self, relative: &str) -> String {
        match &self.songs_root {
            Some(root) => format!("{}/{relative}", root.display()),
            None => relative.to_string(),
        }
    }

    /// Invalidate the PID together with everything derived from the
    /// current process incarnation.
    fn reset_target(&mut self) {
        self.ctx = ScanContext::default();
        self.drop_target_caches();
    }

    fn drop_target_caches(&mut self) {
        self.anchor = None;
        self.songs_root = None;
        self.songs_root_resolved = false;
    }
}

/// Watch for the client and report beatmap changes until `stop` is set.
///
/// Returns the last observed full path, or `None` if nothing was read.
pub fn start(options: WatchOptions, stop: Arc<AtomicBool>) -> Option<String> {
    MapWatcher::new(options).run(&stop)
}
