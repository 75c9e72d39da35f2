use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot describing a stream at the moment it was taken.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Stat {
    /// Byte length of the joined content.
    pub size: u64,

    /// When the snapshot was captured.
    pub atime: DateTime<Utc>,
}

impl Stat {
    /// Captures a snapshot of the given size, stamped with the current time.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            atime: Utc::now(),
        }
    }
}
