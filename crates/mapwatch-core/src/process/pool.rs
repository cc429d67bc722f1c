//! Reusable scratch buffers for remote reads.
//!
//! The polling loop reads the same handful of buffer shapes every tick
//! (scan windows, string payloads); the pool recycles those allocations.
//! Buffers return to the pool when their guard drops, so every exit
//! path, including failed reads, releases them.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

#[derive(Default)]
pub struct BufferPool {
    free: RefCell<Vec<Vec<u8>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rent a zeroed buffer of exactly `len` bytes.
    pub fn rent(&self, len: usize) -> PooledBuf<'_> {
        let mut free = self.free.borrow_mut();
        let mut buf = match free.iter().position(|b| b.capacity() >= len) {
            Some(idx) => free.swap_remove(idx),
            None => Vec::with_capacity(len),
        };

        buf.clear();
        buf.resize(len, 0);

        PooledBuf {
            pool: self,
            buf: Some(buf),
        }
    }

    #[cfg(test)]
    fn idle_count(&self) -> usize {
        self.free.borrow().len()
    }
}

/// A rented buffer; dereferences to `[u8]` and returns itself to the
/// pool on drop.
pub struct PooledBuf<'a> {
    pool: &'a BufferPool,
    buf: Option<Vec<u8>>,
}

impl Deref for PooledBuf<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buf.as_deref().unwrap_or(&[])
    }
}

impl DerefMut for PooledBuf<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buf.as_deref_mut().unwrap_or(&mut [])
    }
}

impl Drop for PooledBuf<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.free.borrow_mut().push(buf);
        }
    }
}
