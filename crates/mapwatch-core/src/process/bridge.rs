//! Thin wrappers over the two kernel primitives the observer depends on:
//! signal-0 liveness probing and scatter/gather cross-process reads.

use std::io::IoSliceMut;

use nix::sys::signal::kill;
use nix::sys::uio::{RemoteIoVec, process_vm_readv};
use nix::unistd::Pid;
use tracing::trace;

use crate::error::{Error, Result};

/// Check whether `pid` is still running by delivering the null signal.
pub fn is_alive(pid: i32) -> bool {
    kill(Pid::from_raw(pid), None).is_ok()
}

/// Read `buf.len()` bytes from `address` in the target's address space.
///
/// Succeeds only if the kernel reports the full length; short reads and
/// errors collapse into a single failure. The errno is not surfaced to
/// callers beyond a trace line.
pub fn read_process_memory(pid: i32, address: u64, buf: &mut [u8]) -> Result<()> {
    let len = buf.len();
    let remote = [RemoteIoVec {
        base: address as usize,
        len,
    }];
    let mut local = [IoSliceMut::new(buf)];

    match process_vm_readv(Pid::from_raw(pid), &mut local, &remote) {
        Ok(read) if read == len => Ok(()),
        Ok(read) => {
            trace!(pid, address, "short read: {read} of {len} bytes");
            Err(Error::MemoryReadFailed { address, len })
        }
        Err(errno) => {
            trace!(pid, address, %errno, "process_vm_readv failed");
            Err(Error::MemoryReadFailed { address, len })
        }
    }
}
