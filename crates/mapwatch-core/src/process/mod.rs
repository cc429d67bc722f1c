pub mod bridge;
pub mod locator;
pub mod maps;
pub mod pattern;
pub mod pool;
mod reader;
pub mod scanner;

#[cfg(test)]
pub mod mock;

pub use locator::{ProcessLocator, ScanContext, ScanStatus};
pub use maps::MemRegion;
pub use pool::{BufferPool, PooledBuf};
pub use reader::{ProcessMemory, ReadMemory};
pub use scanner::{SCAN_CHUNK_SIZE, find_signature};

#[cfg(test)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
