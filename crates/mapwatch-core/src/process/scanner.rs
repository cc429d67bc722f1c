//! Signature scanning over a process's readable regions.
//!
//! Regions are read in fixed-size windows that over-read by
//! `pattern.len() - 1` bytes, so a match straddling a window boundary is
//! still seen by the window that starts before it.

use tracing::debug;

use crate::error::{Error, Result};
use crate::process::pattern::find_first_pattern;
use crate::process::{BufferPool, MemRegion, ReadMemory};

/// Window size for region scans.
pub const SCAN_CHUNK_SIZE: usize = 64 * 1024;

/// Find the remote address of the first occurrence of `pattern`.
///
/// Regions are visited in order; the first hit wins. Windows that fail
/// to read are skipped, since regions can race with the target's own
/// allocator between enumeration and read.
pub fn find_signature<R, I>(
    reader: &R,
    regions: I,
    pattern: &[u8],
    pool: &BufferPool,
) -> Result<u64>
where
    R: ReadMemory,
    I: IntoIterator<Item = MemRegion>,
{
    if pattern.is_empty() {
        return Err(Error::SignatureNotFound);
    }

    for region in regions {
        if let Some(address) = scan_region(reader, region, pattern, pool) {
            debug!("signature matched at {address:#x}");
            return Ok(address);
        }
    }

    Err(Error::SignatureNotFound)
}

fn scan_region<R: ReadMemory>(
    reader: &R,
    region: MemRegion,
    pattern: &[u8],
    pool: &BufferPool,
) -> Option<u64> {
    let overlap = (pattern.len() - 1) as u64;
    let mut offset = 0u64;

    while offset < region.len {
        let want = (SCAN_CHUNK_SIZE as u64 + overlap).min(region.len - offset);
        if want < pattern.len() as u64 {
            break;
        }

        let mut window = pool.rent(want as usize);
        if reader.read_into(region.start + offset, &mut window).is_ok()
            && let Some(index) = find_first_pattern(&window, pattern)
        {
            return Some(region.start + offset + index as u64);
        }

        offset += SCAN_CHUNK_SIZE as u64;
    }

    None
}
