use redisk_store::StoreError;
use thiserror::Error;

/// Result type for stream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while using a stream
#[derive(Debug, Error)]
pub enum Error {
    /// No further data exists past the cursor.
    #[error("end of stream reached")]
    EndOfStream,

    /// A positioning argument was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored line could not be decoded as text.
    #[error("line is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Error from the backing store, passed through as-is.
    #[error(transparent)]
    Store(#[from] StoreError),
}
