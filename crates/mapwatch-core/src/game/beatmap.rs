//! In-memory beatmap record of the stable client.
//!
//! The currently selected beatmap is reached from a code-signature
//! anchor through a fixed pointer chain. The record holds the folder
//! and file names as length-prefixed UTF-16LE strings: a 4-byte
//! character count at `ptr + 4` followed by the payload at `ptr + 8`.
//! The client is a 32-bit process, so every pointer read is an unsigned
//! 32-bit value widened to `u64`; remote addresses are never treated as
//! local pointers.

use encoding_rs::UTF_16LE;
use tracing::debug;

use crate::error::{Error, Result};
use crate::process::{BufferPool, ReadMemory};

/// Name the client reports in its `comm` file.
pub const TARGET_PROCESS: &str = "osu!.exe";

/// Code bytes anchoring the current-beatmap pointer. Stable across
/// ASLR because they sit inside the executable image.
pub const BEATMAP_SIGNATURE: [u8; 6] = [0xF8, 0x01, 0x74, 0x04, 0x83, 0x65];

/// Distance back from the signature to the beatmap base pointer.
const BASE_POINTER_OFFSET: u64 = 0x0C;
/// Folder-name string pointer within the beatmap record.
const FOLDER_OFFSET: u64 = 0x78;
/// File-name string pointer within the beatmap record.
const FILE_OFFSET: u64 = 0x90;
/// Longest plausible name, in UTF-16 code units. Anything larger means
/// the chain dereferenced garbage.
const MAX_STRING_CHARS: i32 = 256;

/// Walk the pointer chain from `anchor` and return the beatmap's
/// `folder/file` path, with backslashes normalized to `/`.
///
/// Any failed read or null pointer along the chain aborts with
/// [`Error::PointerInvalid`]; an implausible string length aborts with
/// [`Error::StringInvalid`] before its payload is read. Either result
/// tells the caller to drop the anchor and rescan.
pub fn read_current_beatmap<R: ReadMemory>(
    reader: &R,
    anchor: u64,
    pool: &BufferPool,
) -> Result<String> {
    let base = read_pointer(reader, anchor.wrapping_sub(BASE_POINTER_OFFSET))?;
    let record = read_pointer(reader, base)?;

    let folder_ptr = read_pointer(reader, record + FOLDER_OFFSET)?;
    let file_ptr = read_pointer(reader, record + FILE_OFFSET)?;

    let folder = read_remote_string(reader, folder_ptr, pool)?;
    let file = read_remote_string(reader, file_ptr, pool)?;

    Ok(format!("{folder}/{file}").replace('\\', "/"))
}

fn read_pointer<R: ReadMemory>(reader: &R, address: u64) -> Result<u64> {
    let value = reader.read_u32(address).map_err(|_| Error::PointerInvalid)?;
    if value == 0 {
        return Err(Error::PointerInvalid);
    }
    Ok(u64::from(value))
}

fn read_remote_string<R: ReadMemory>(reader: &R, ptr: u64, pool: &BufferPool) -> Result<String> {
    let chars = reader.read_i32(ptr + 4).map_err(|_| Error::PointerInvalid)?;
    if chars <= 0 || chars > MAX_STRING_CHARS {
        return Err(Error::StringInvalid(chars));
    }

    let mut payload = pool.rent(chars as usize * 2);
    reader
        .read_into(ptr + 8, &mut payload)
        .map_err(|_| Error::PointerInvalid)?;

    let (text, _, had_errors) = UTF_16LE.decode(&payload);
    if had_errors {
        debug!(ptr, "UTF-16 payload contained invalid code units");
    }

    Ok(text.into_owned())
}
