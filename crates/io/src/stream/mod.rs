//! Cursor-addressed stream over a stored list of lines.
//!
//! The stream's logical content is every entry of the backing list joined by
//! a single `\n`. Two cursors address it: a line index, used by the
//! line-oriented operations, and a byte position, used by the byte-oriented
//! ones. Both are private to each [`IoStream`] and always kept in step.

mod read;
mod write;

use crate::stat::Stat;
use crate::{Error, Result};

use bytes::Bytes;
use redisk_store::ListStore;
use tracing::trace;

/// Reference point for [`IoStream::seek`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Whence {
    /// Offset from the first line.
    Start,

    /// Offset from the current line.
    Current,

    /// Offset from the end of the stream.
    End,
}

impl TryFrom<i32> for Whence {
    type Error = Error;

    /// Maps the conventional `SEEK_SET`, `SEEK_CUR` and `SEEK_END` values.
    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            other => Err(Error::InvalidArgument(format!(
                "unsupported whence value {other}"
            ))),
        }
    }
}

/// A file-like view of one stored list.
///
/// Opening a stream performs no store mutation and the list need not exist
/// yet. Dropping the stream leaves the list in place.
///
/// Nothing here is locked across calls: the list length is re-read from the
/// store whenever an operation depends on it, and the tail-merge performed
/// by the write operations (read the tail, then replace it) can lose updates
/// if another writer appends in between.
#[derive(Clone, Debug)]
pub struct IoStream<S>
where
    S: ListStore,
{
    store: S,
    name: String,
    key: String,

    line_index: u64,
    byte_pos: u64,
    line_offset: u64,
    // The cursor sits on the separator that would precede `line_index`, which
    // is where the end of a non-empty stream lies in byte terms.
    before_separator: bool,

    last_line: Option<String>,
    open_line: bool,
    pushback: Option<u8>,
}

impl<S> IoStream<S>
where
    S: ListStore,
{
    pub(crate) const fn new(store: S, name: String, key: String) -> Self {
        Self {
            store,
            name,
            key,
            line_index: 0,
            byte_pos: 0,
            line_offset: 0,
            before_separator: false,
            last_line: None,
            open_line: false,
            pushback: None,
        }
    }

    /// Returns the name the stream was opened with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the key of the backing list.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the current line index.
    #[must_use]
    pub const fn lineno(&self) -> u64 {
        self.line_index
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn pos(&self) -> u64 {
        self.byte_pos
    }

    /// Alias for [`pos`](Self::pos).
    #[must_use]
    pub const fn tell(&self) -> u64 {
        self.byte_pos
    }

    /// Returns the most recently read line, if any.
    #[must_use]
    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }

    /// Returns the number of lines currently stored.
    pub async fn length(&self) -> Result<u64> {
        Ok(self.store.len(&self.key).await?)
    }

    /// Whether the line cursor is at the end of the stream.
    pub async fn eof(&self) -> Result<bool> {
        Ok(self.line_index >= self.length().await?)
    }

    /// Moves the line cursor to `lineno`, clamped to the number of lines.
    ///
    /// Returns the resulting line index.
    pub async fn set_lineno(&mut self, lineno: u64) -> Result<u64> {
        let total = self.length().await?;
        let lineno = lineno.min(total);

        self.move_to_line(lineno, total).await?;

        Ok(lineno)
    }

    /// Moves the byte cursor to `pos`.
    ///
    /// Positions at or past the end of the content land on the end of the
    /// stream. Returns the resulting byte position.
    pub async fn set_pos(&mut self, pos: u64) -> Result<u64> {
        let lines = self.all_lines().await?;
        let total = lines.len() as u64;

        let mut line_start = 0;
        for (index, line) in lines.iter().enumerate() {
            let line_end = line_start + line.len() as u64;

            let is_final = index as u64 + 1 == total;
            if pos < line_end || (pos == line_end && !is_final) {
                self.line_index = index as u64;
                self.line_offset = pos - line_start;
                self.byte_pos = pos;
                self.before_separator = false;

                trace!(key = %self.key, line = self.line_index, pos, "moved byte cursor");
                return Ok(pos);
            }

            line_start = line_end + 1;
        }

        self.place_at_end(total, joined_len(&lines));

        trace!(key = %self.key, pos = self.byte_pos, "moved byte cursor to end");
        Ok(self.byte_pos)
    }

    /// Moves the line cursor by `offset` lines relative to `whence`.
    ///
    /// The result is clamped to `0..=length`, so offsets reaching before the
    /// first line land on it. Returns the resulting line index.
    pub async fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let total = self.length().await?;

        let base = match whence {
            Whence::Start => 0,
            Whence::Current => self.line_index,
            Whence::End => total,
        };

        let target = i64::try_from(base)
            .unwrap_or(i64::MAX)
            .saturating_add(offset)
            .clamp(0, i64::try_from(total).unwrap_or(i64::MAX));
        let target = u64::try_from(target).unwrap_or(0);

        self.move_to_line(target, total).await?;

        trace!(key = %self.key, ?whence, offset, line = target, "seeked");
        Ok(target)
    }

    /// Moves both cursors back to the start. Always returns 0.
    pub const fn rewind(&mut self) -> u64 {
        self.line_index = 0;
        self.byte_pos = 0;
        self.line_offset = 0;
        self.before_separator = false;

        0
    }

    /// Takes a snapshot of the stream's size.
    pub async fn stat(&self) -> Result<Stat> {
        let lines = self.all_lines().await?;

        Ok(Stat::new(joined_len(&lines)))
    }

    async fn move_to_line(&mut self, lineno: u64, total: u64) -> Result<()> {
        let preceding = if lineno == 0 {
            Vec::new()
        } else {
            self.store.range(&self.key, 0, lineno - 1).await?
        };

        let line_start: u64 = preceding.iter().map(|line| line.len() as u64 + 1).sum();

        if lineno > 0 && lineno == total {
            self.place_at_end(total, line_start - 1);
        } else {
            self.line_index = lineno;
            self.byte_pos = line_start;
            self.line_offset = 0;
            self.before_separator = false;
        }

        Ok(())
    }

    const fn place_at_end(&mut self, total: u64, joined_len: u64) {
        self.line_index = total;
        self.byte_pos = joined_len;
        self.line_offset = 0;
        self.before_separator = total > 0;
    }

    async fn all_lines(&self) -> Result<Vec<Bytes>> {
        let total = self.length().await?;
        if total == 0 {
            return Ok(Vec::new());
        }

        Ok(self.store.range(&self.key, 0, total - 1).await?)
    }

    async fn fetch_line(&self, index: u64) -> Result<Option<Bytes>> {
        Ok(self
            .store
            .range(&self.key, index, index)
            .await?
            .into_iter()
            .next())
    }
}

/// Length of `lines` joined by single-byte separators.
fn joined_len(lines: &[Bytes]) -> u64 {
    let bytes: u64 = lines.iter().map(|line| line.len() as u64).sum();

    bytes + (lines.len() as u64).saturating_sub(1)
}
