use super::IoStream;
use crate::{Error, Result};

use std::fmt;

use bytes::{Bytes, BytesMut};
use redisk_store::ListStore;
use tracing::debug;

impl<S> IoStream<S>
where
    S: ListStore,
{
    /// Writes `text`, returning the number of bytes written.
    ///
    /// Text that does not end with `\n` leaves the line open: the next write
    /// extends the same stored line instead of starting a new one.
    pub async fn write(&mut self, text: impl AsRef<str>) -> Result<usize> {
        self.write_text(text.as_ref()).await
    }

    /// Writes all `parts` as one piece of text.
    ///
    /// With no parts, writes the most recently read line instead.
    pub async fn print(&mut self, parts: &[&str]) -> Result<()> {
        let text = if parts.is_empty() {
            self.last_line.clone().unwrap_or_default()
        } else {
            parts.concat()
        };

        self.write_text(&text).await?;

        Ok(())
    }

    /// Writes formatted text, e.g. `io.printf(format_args!("{} lines", n))`.
    pub fn printf(
        &mut self,
        args: fmt::Arguments<'_>,
    ) -> impl Future<Output = Result<()>> + Send + '_ {
        let text = args.to_string();

        async move {
            self.write_text(&text).await?;
            Ok(())
        }
    }

    /// Writes each of `lines` as its own terminated line.
    ///
    /// A `\n` is added to every line that lacks one. With no lines, writes a
    /// bare `\n`.
    pub async fn puts(&mut self, lines: &[&str]) -> Result<()> {
        if lines.is_empty() {
            self.write_text("\n").await?;
            return Ok(());
        }

        for line in lines {
            if line.ends_with('\n') {
                self.write_text(line).await?;
            } else {
                self.write_text(&format!("{line}\n")).await?;
            }
        }

        Ok(())
    }

    /// Writes `text` verbatim and returns the stream, so calls chain:
    ///
    /// ```ignore
    /// io.append("whu ").await?.append("zuh").await?;
    /// ```
    pub async fn append(&mut self, text: impl AsRef<str>) -> Result<&mut Self> {
        self.write_text(text.as_ref()).await?;

        Ok(self)
    }

    /// Keeps only the last `size` lines, returning `size`.
    ///
    /// Truncating to zero removes the backing list. The line cursor is
    /// clamped to the remaining lines.
    pub async fn truncate(&mut self, size: u64) -> Result<u64> {
        self.store.retain_last(&self.key, size).await?;
        debug!(key = %self.key, size, "truncated");

        let total = self.length().await?;
        if total == 0 {
            self.open_line = false;
        }
        self.move_to_line(self.line_index.min(total), total).await?;

        Ok(size)
    }

    /// Removes every line, leaving the stream empty and ready for writing.
    ///
    /// Equivalent to `truncate(0)`.
    pub async fn clear(&mut self) -> Result<()> {
        self.truncate(0).await?;

        Ok(())
    }

    /// Holds `byte` back until the next [`flush`](Self::flush), which writes
    /// it as a line of its own at the end of the stream.
    ///
    /// Only ASCII bytes are accepted; a lone byte outside that range would
    /// leave an entry that is not valid UTF-8.
    pub fn ungetc(&mut self, byte: u8) -> Result<()> {
        if !byte.is_ascii() {
            return Err(Error::InvalidArgument(format!(
                "cannot push back non-ASCII byte {byte:#04x}"
            )));
        }

        self.pushback = Some(byte);

        Ok(())
    }

    /// Writes out a byte held back by [`ungetc`](Self::ungetc), if any.
    pub async fn flush(&mut self) -> Result<()> {
        if let Some(byte) = self.pushback {
            self.store
                .push_back(&self.key, Bytes::copy_from_slice(&[byte]))
                .await?;
            debug!(key = %self.key, byte, "flushed pushback");

            self.pushback = None;
            self.open_line = false;
        }

        Ok(())
    }

    /// Removes the backing list and resets the stream.
    pub async fn delete(&mut self) -> Result<()> {
        self.store.delete(&self.key).await?;
        debug!(key = %self.key, "deleted");

        self.rewind();
        self.open_line = false;
        self.pushback = None;

        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> Result<usize> {
        if text.is_empty() {
            return Ok(0);
        }

        let total = self.length().await?;
        let tail = if self.open_line && total > 0 {
            self.fetch_line(total - 1).await?
        } else {
            None
        };

        if let Some(tail) = tail {
            // A cursor parked at the end moves inside the growing tail.
            if self.line_index == total && self.before_separator {
                self.line_index = total - 1;
                self.line_offset = tail.len() as u64;
                self.before_separator = false;
            }

            let mut merged = BytesMut::with_capacity(tail.len() + text.len());
            merged.extend_from_slice(&tail);
            merged.extend_from_slice(text.as_bytes());

            self.store.set(&self.key, total - 1, merged.freeze()).await?;
            debug!(key = %self.key, index = total - 1, bytes = text.len(), "extended open line");
        } else {
            let len = self
                .store
                .push_back(&self.key, Bytes::copy_from_slice(text.as_bytes()))
                .await?;
            debug!(key = %self.key, index = len - 1, bytes = text.len(), "appended line");
        }

        self.open_line = !text.ends_with('\n');

        Ok(text.len())
    }
}
