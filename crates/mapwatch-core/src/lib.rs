pub mod error;
pub mod game;
pub mod process;
pub mod watcher;
pub mod wine;

pub use error::{Error, Result};
pub use game::{BEATMAP_SIGNATURE, TARGET_PROCESS, read_current_beatmap};
pub use process::{
    BufferPool, MemRegion, ProcessLocator, ProcessMemory, ReadMemory, ScanContext, ScanStatus,
    find_signature,
};
pub use watcher::{ChangeSink, MapWatcher, WatchOptions, start};
pub use wine::SongsResolver;
