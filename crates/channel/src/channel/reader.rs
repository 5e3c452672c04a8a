use std::future::poll_fn;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use tracing::info;
use triomphe::Arc;

use super::shared::Shared;
use crate::error::{Cause, ChannelDropped, StreamError};

/// The consumer half of a byte channel.
///
/// Reads hand out everything currently buffered as one [`Bytes`] chunk, so a chunk is never larger
/// than the channel capacity. The reader may also cancel the channel, which fails the producer's
/// pending and future writes with the same cause.
///
/// Dropping a reader cancels the channel with [`ChannelDropped::ReaderDropped`] unless the
/// channel has already been closed.
#[derive(Debug)]
pub struct ByteReader {
    shared: Arc<Shared>,
}

impl ByteReader {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Waits for buffered bytes and takes all of them.
    ///
    /// Returns `Ok(None)` once the stream was closed normally and everything written before the
    /// close has been read.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Cancelled`] as soon as the channel is cancelled, even if bytes that
    /// were written earlier are still buffered; those bytes are never delivered.
    pub async fn read_available(&mut self) -> Result<Option<Bytes>, StreamError> {
        poll_fn(|cx| self.poll_read_available(cx)).await
    }

    pub fn poll_read_available(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Bytes>, StreamError>> {
        self.shared.poll_read(cx)
    }

    /// Reads until end of stream and returns all bytes in order.
    pub async fn read_to_end(&mut self) -> Result<Bytes, StreamError> {
        let mut buf = BytesMut::new();
        while let Some(bytes) = self.read_available().await? {
            buf.extend_from_slice(&bytes);
        }
        Ok(buf.freeze())
    }

    /// Reads and drops everything until end of stream, returning how many bytes were skipped.
    pub async fn discard(&mut self) -> Result<u64, StreamError> {
        let mut size: u64 = 0;
        while let Some(bytes) = self.read_available().await? {
            size += bytes.len() as u64;
        }

        if size > 0 {
            info!(size = size, "discard byte stream");
        }
        Ok(size)
    }

    /// Terminates the stream with `cause`. Has no effect if the stream is already closed.
    pub fn cancel(&self, cause: Cause) {
        self.shared.cancel(cause);
    }

    /// True once no further bytes will ever be returned: the stream was cancelled, or it was
    /// closed normally and fully drained.
    pub fn is_closed_for_read(&self) -> bool {
        self.shared.is_closed_for_read()
    }

    /// The cause the channel was cancelled with, if any.
    pub fn closed_cause(&self) -> Option<Cause> {
        self.shared.closed_cause()
    }

    pub fn available_for_read(&self) -> usize {
        self.shared.available_for_read()
    }

    pub fn total_bytes_read(&self) -> u64 {
        self.shared.total_read()
    }

    pub(crate) fn is_end_of_stream(&self) -> bool {
        self.shared.is_end_of_stream()
    }
}

impl Drop for ByteReader {
    fn drop(&mut self) {
        self.shared.cancel(Cause::new(ChannelDropped::ReaderDropped));
    }
}
