use super::IoStream;
use crate::{Error, Result};

use std::collections::VecDeque;

use async_stream::try_stream;
use bytes::Bytes;
use redisk_store::ListStore;
use tokio_stream::Stream;

/// Lines fetched per range read when walking bytes.
const READ_BATCH: u64 = 128;

const SEPARATOR: &[u8] = b"\n";

impl<S> IoStream<S>
where
    S: ListStore,
{
    /// Reads the line at the line cursor and advances past it.
    ///
    /// Every line but the final one comes back with its `\n` separator.
    /// Returns `None` at the end of the stream.
    pub async fn gets(&mut self) -> Result<Option<String>> {
        let total = self.length().await?;
        if self.line_index >= total {
            if self.line_index > total {
                self.move_to_line(total, total).await?;
            }
            return Ok(None);
        }

        let Some(entry) = self.fetch_line(self.line_index).await? else {
            return Ok(None);
        };

        let line_start = if self.before_separator {
            self.byte_pos + 1
        } else {
            self.byte_pos - self.line_offset
        };
        let line_end = line_start + entry.len() as u64;

        let mut line = String::from_utf8(entry.to_vec())?;

        if self.line_index + 1 >= total {
            self.place_at_end(total, line_end);
        } else {
            if !line.ends_with('\n') {
                line.push('\n');
            }
            self.line_index += 1;
            self.byte_pos = line_end + 1;
            self.line_offset = 0;
            self.before_separator = false;
        }

        self.last_line = Some(line.clone());

        Ok(Some(line))
    }

    /// Like [`gets`](Self::gets), but fails with [`Error::EndOfStream`] at the
    /// end of the stream.
    pub async fn readline(&mut self) -> Result<String> {
        self.gets().await?.ok_or(Error::EndOfStream)
    }

    /// Reads every remaining line.
    pub async fn readlines(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.gets().await? {
            lines.push(line);
        }

        Ok(lines)
    }

    /// Calls `f` with each line from the line cursor to the end of the stream.
    ///
    /// Iteration starts wherever the cursor is; it is not rewound first.
    pub async fn each<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(String),
    {
        while let Some(line) = self.gets().await? {
            f(line);
        }

        Ok(())
    }

    /// Lazily yields each line from the line cursor to the end of the stream.
    pub fn lines(&mut self) -> impl Stream<Item = Result<String>> + '_ {
        try_stream! {
            while let Some(line) = self.gets().await? {
                yield line;
            }
        }
    }

    /// Calls `f` with each byte from the byte cursor to the end of the
    /// content, separators included.
    pub async fn each_byte<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(u8),
    {
        self.walk_bytes(None, |chunk| chunk.iter().copied().for_each(&mut f))
            .await?;

        Ok(())
    }

    /// Lazily yields each byte from the byte cursor to the end of the content.
    pub fn bytes(&mut self) -> impl Stream<Item = Result<u8>> + '_ {
        try_stream! {
            while let Some(byte) = self.getc().await? {
                yield byte;
            }
        }
    }

    /// Reads the byte at the byte cursor and advances past it.
    ///
    /// Returns `None` at the end of the stream.
    pub async fn getc(&mut self) -> Result<Option<u8>> {
        let mut byte = None;
        self.walk_bytes(Some(1), |chunk| byte = chunk.first().copied())
            .await?;

        Ok(byte)
    }

    /// Reads from the byte cursor.
    ///
    /// Without a `length`, returns everything up to the end of the content,
    /// which is empty (not `None`) once the end has been reached. With a
    /// `length`, returns at most that many bytes, or `None` at the end.
    pub async fn read(&mut self, length: Option<usize>) -> Result<Option<Bytes>> {
        let mut buffer = Vec::new();
        let read = self.read_into(length, &mut buffer).await?;

        Ok(read.map(|_| Bytes::from(buffer)))
    }

    /// Same contract as [`read`](Self::read), appending what was read to
    /// `buffer` and returning the number of bytes appended.
    pub async fn read_into(
        &mut self,
        length: Option<usize>,
        buffer: &mut Vec<u8>,
    ) -> Result<Option<usize>> {
        if length == Some(0) {
            return Ok(Some(0));
        }

        let read = self
            .walk_bytes(length, |chunk| buffer.extend_from_slice(chunk))
            .await?;

        if read == 0 && length.is_some() {
            return Ok(None);
        }

        Ok(Some(read))
    }

    /// Reads at most `n` bytes, failing with [`Error::EndOfStream`] when none
    /// are left.
    pub async fn readbytes(&mut self, n: usize) -> Result<Bytes> {
        self.read(Some(n)).await?.ok_or(Error::EndOfStream)
    }

    /// Feeds up to `limit` bytes of joined content to `sink`, advancing the
    /// cursors as it goes. Returns the number of bytes fed.
    async fn walk_bytes<F>(&mut self, limit: Option<usize>, mut sink: F) -> Result<usize>
    where
        F: FnMut(&[u8]),
    {
        let total = self.length().await?;
        let mut remaining = limit.unwrap_or(usize::MAX);
        let mut fed = 0;
        let mut batch: VecDeque<Bytes> = VecDeque::new();

        while remaining > 0 && self.line_index < total {
            if self.before_separator {
                sink(SEPARATOR);
                self.byte_pos += 1;
                self.before_separator = false;
                fed += 1;
                remaining -= 1;
                continue;
            }

            if batch.is_empty() {
                let end = self
                    .line_index
                    .saturating_add(READ_BATCH - 1)
                    .min(total - 1);
                batch = self.store.range(&self.key, self.line_index, end).await?.into();

                // The list shrank underneath us.
                if batch.is_empty() {
                    break;
                }
            }

            let Some(line) = batch.front() else {
                break;
            };
            let offset = usize::try_from(self.line_offset)
                .unwrap_or(usize::MAX)
                .min(line.len());

            let available = &line[offset..];
            let take = available.len().min(remaining);
            if take > 0 {
                sink(&available[..take]);
                self.byte_pos += take as u64;
                self.line_offset += take as u64;
                fed += take;
                remaining -= take;
            }

            if offset + take < line.len() {
                break;
            }

            if self.line_index + 1 >= total {
                self.place_at_end(total, self.byte_pos);
                break;
            }

            if remaining == 0 {
                break;
            }

            sink(SEPARATOR);
            self.byte_pos += 1;
            self.line_index += 1;
            self.line_offset = 0;
            fed += 1;
            remaining -= 1;
            batch.pop_front();
        }

        Ok(fed)
    }
}
