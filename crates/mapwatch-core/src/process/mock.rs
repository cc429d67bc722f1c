//! Mock memory reader for tests.
//!
//! Reads from in-memory segments instead of a real process, so pointer
//! chains spanning distant addresses can be modeled without one huge
//! buffer. Reads touching unmapped addresses fail like a real short
//! read would.

use crate::error::{Error, Result};
use crate::process::{MemRegion, ReadMemory};

#[derive(Debug, Clone)]
struct Segment {
    base: u64,
    data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MockMemoryReader {
    segments: Vec<Segment>,
}

impl MockMemoryReader {
    /// The segments as readable regions, for driving the scanner.
    pub fn regions(&self) -> Vec<MemRegion> {
        self.segments
            .iter()
            .map(|s| MemRegion {
                start: s.base,
                len: s.data.len() as u64,
            })
            .collect()
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        for segment in &self.segments {
            if address < segment.base {
                continue;
            }
            let offset = (address - segment.base) as usize;
            if offset + buf.len() <= segment.data.len() {
                buf.copy_from_slice(&segment.data[offset..offset + buf.len()]);
                return Ok(());
            }
        }

        Err(Error::MemoryReadFailed {
            address,
            len: buf.len(),
        })
    }
}

/// Builder for mock memory layouts.
///
/// Starts with a single segment at `0x1000`; `segment` opens a new one
/// and subsequent writes land there, at offsets relative to its base.
#[derive(Debug, Clone)]
pub struct MockMemoryBuilder {
    segments: Vec<Segment>,
}

impl Default for MockMemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self {
            segments: vec![Segment {
                base: 0x1000,
                data: Vec::new(),
            }],
        }
    }

    /// Open a new segment at `base`.
    pub fn segment(mut self, base: u64) -> Self {
        self.segments.push(Segment {
            base,
            data: Vec::new(),
        });
        self
    }

    /// Grow the current segment with zeros up to `size` bytes.
    pub fn with_size(mut self, size: usize) -> Self {
        let data = &mut self.current().data;
        if data.len() < size {
            data.resize(size, 0);
        }
        self
    }

    /// Write raw bytes at `offset` from the current segment's base.
    pub fn write_bytes(mut self, offset: usize, bytes: &[u8]) -> Self {
        let data = &mut self.current().data;
        if data.len() < offset + bytes.len() {
            data.resize(offset + bytes.len(), 0);
        }
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self
    }

    /// Write an unsigned 32-bit little-endian integer.
    pub fn write_u32(self, offset: usize, value: u32) -> Self {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    /// Write a signed 32-bit little-endian integer.
    pub fn write_i32(self, offset: usize, value: i32) -> Self {
        self.write_bytes(offset, &value.to_le_bytes())
    }

    /// Write `text` as UTF-16LE code units.
    pub fn write_utf16(self, offset: usize, text: &str) -> Self {
        let bytes: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
        self.write_bytes(offset, &bytes)
    }

    pub fn build(self) -> MockMemoryReader {
        MockMemoryReader {
            segments: self.segments,
        }
    }

    fn current(&mut self) -> &mut Segment {
        self.segments.last_mut().expect("builder has a segment")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reader_basic() {
        let reader = MockMemoryBuilder::new()
            .write_bytes(0, &[0x78, 0x56, 0x34, 0x12])
            .build();

        assert_eq!(reader.read_u32(0x1000).unwrap(), 0x12345678);
    }

    #[test]
    fn test_mock_reader_second_segment() {
        let reader = MockMemoryBuilder::new()
            .segment(0x600000)
            .write_u32(0, 42)
            .build();

        assert_eq!(reader.read_u32(0x600000).unwrap(), 42);
    }

    #[test]
    fn test_mock_reader_unmapped_address() {
        let reader = MockMemoryBuilder::new().write_u32(0, 1).build();

        assert!(reader.read_u32(0x9000_0000).is_err());
    }

    #[test]
    fn test_mock_reader_out_of_bounds() {
        let reader = MockMemoryBuilder::new().write_bytes(0, &[1, 2]).build();

        assert!(reader.read_u32(0x1000).is_err());
    }

    #[test]
    fn test_write_utf16() {
        let reader = MockMemoryBuilder::new().write_utf16(0, "ab").build();

        let mut buf = [0u8; 4];
        reader.read_into(0x1000, &mut buf).unwrap();
        assert_eq!(buf, [0x61, 0x00, 0x62, 0x00]);
    }

    #[test]
    fn test_regions_reflect_segments() {
        let reader = MockMemoryBuilder::new()
            .with_size(8)
            .segment(0x400000)
            .with_size(16)
            .build();

        let regions = reader.regions();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].start, 0x400000);
        assert_eq!(regions[1].len, 16);
    }
}
