use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read process memory at {address:#x} ({len} bytes)")]
    MemoryReadFailed { address: u64, len: usize },

    #[error("signature not found in any readable region")]
    SignatureNotFound,

    #[error("pointer chain invalid")]
    PointerInvalid,

    #[error("string length {0} out of range")]
    StringInvalid(i32),

    #[error("path resolution failed: {0}")]
    PathResolveFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
