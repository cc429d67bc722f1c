pub mod beatmap;

pub use beatmap::{BEATMAP_SIGNATURE, TARGET_PROCESS, read_current_beatmap};
