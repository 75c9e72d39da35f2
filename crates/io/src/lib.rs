//! File-like streams of text lines stored in an ordered-list store.
//!
//! A stream is bound to one list, named `{namespace}:list:{name}`, and reads
//! and writes it the way code expects to use a log file: line by line, byte
//! by byte, with seeking, truncation and end-of-stream detection. The list
//! lives in a shared [`ListStore`](redisk_store::ListStore), so any number
//! of processes can open the same stream, each with its own cursor.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod error;
mod redisk;
mod stat;
mod stream;

pub use config::{DEFAULT_NAMESPACE, RediskConfig, RediskOptions};
pub use error::{Error, Result};
pub use redisk::Redisk;
pub use stat::Stat;
pub use stream::{IoStream, Whence};
