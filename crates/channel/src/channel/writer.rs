use std::future::poll_fn;
use std::task::{Context, Poll};

use triomphe::Arc;

use super::shared::Shared;
use crate::error::{Cause, ChannelDropped, StreamError};

/// The producer half of a byte channel.
///
/// `ByteWriter` is the only party that can put bytes into its channel. Writes suspend while the
/// channel buffer is full and fail once the channel has been cancelled, no matter which side
/// cancelled it.
///
/// Dropping a writer that has not been closed cancels the channel with
/// [`ChannelDropped::WriterDropped`], so a reader never mistakes a vanished producer for a
/// complete stream.
#[derive(Debug)]
pub struct ByteWriter {
    shared: Arc<Shared>,
}

impl ByteWriter {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Writes all of `buf` into the channel.
    ///
    /// Suspends while the buffer is at capacity; a `buf` larger than the capacity is handed over
    /// piece by piece as the reader drains the channel.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Cancelled`] if the channel is cancelled before or during the call. Bytes
    ///   taken by the channel before the cancellation are discarded with the rest of the buffer.
    /// - [`StreamError::ClosedForWrite`] if the writer was already closed.
    pub async fn write(&mut self, buf: &[u8]) -> Result<(), StreamError> {
        let mut written = 0;
        loop {
            let size = poll_fn(|cx| self.poll_write(cx, &buf[written..])).await?;
            written += size;
            if written == buf.len() {
                return Ok(());
            }
        }
    }

    /// Attempts to move bytes from `buf` into the channel, returning how many were taken.
    ///
    /// On `Poll::Pending` the current task is woken once the reader frees buffer space or the
    /// channel is terminated.
    pub fn poll_write(&mut self, cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, StreamError>> {
        self.shared.poll_write(cx, buf)
    }

    /// Ends the stream normally. The reader drains whatever is buffered, then sees end of stream.
    pub fn close(&self) {
        self.shared.close();
    }

    /// Terminates the stream with `cause`. Has no effect if the stream is already closed.
    pub fn cancel(&self, cause: Cause) {
        self.shared.cancel(cause);
    }

    pub fn is_closed_for_write(&self) -> bool {
        self.shared.is_closed_for_write()
    }

    /// The cause the channel was cancelled with, if any.
    pub fn closed_cause(&self) -> Option<Cause> {
        self.shared.closed_cause()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.capacity()
    }

    pub fn total_bytes_written(&self) -> u64 {
        self.shared.total_written()
    }
}

impl Drop for ByteWriter {
    fn drop(&mut self) {
        self.shared.cancel(Cause::new(ChannelDropped::WriterDropped));
    }
}

#[cfg(test)]
mod tests {
    use crate::channel::{ChannelConfig, byte_channel, byte_channel_with_config};
    use crate::error::{Cause, ChannelDropped, StreamError};
    use bytes::Bytes;
    use futures::FutureExt;

    #[tokio::test]
    async fn write_suspends_until_reader_drains() {
        let (mut writer, mut reader) = byte_channel_with_config(ChannelConfig::with_capacity(4));

        let mut write = Box::pin(writer.write(b"0123456789"));
        assert!(futures::poll!(write.as_mut()).is_pending());
        assert_eq!(reader.available_for_read(), 4);

        assert_eq!(reader.read_available().await.unwrap(), Some(Bytes::from_static(b"0123")));
        assert!(futures::poll!(write.as_mut()).is_pending());

        assert_eq!(reader.read_available().await.unwrap(), Some(Bytes::from_static(b"4567")));
        assert!(matches!(futures::poll!(write.as_mut()), std::task::Poll::Ready(Ok(()))));
        drop(write);

        assert_eq!(reader.read_available().await.unwrap(), Some(Bytes::from_static(b"89")));
        assert_eq!(writer.total_bytes_written(), 10);
        assert_eq!(reader.total_bytes_read(), 10);
    }

    #[tokio::test]
    async fn write_after_close_is_rejected() {
        let (mut writer, _reader) = byte_channel();
        writer.close();

        assert!(writer.is_closed_for_write());
        assert!(matches!(writer.write(b"late").await, Err(StreamError::ClosedForWrite)));
        assert!(writer.closed_cause().is_none());
    }

    #[tokio::test]
    async fn pending_write_fails_with_reader_cause() {
        let (mut writer, reader) = byte_channel_with_config(ChannelConfig::with_capacity(2));
        let cause = Cause::msg("consumer gave up");

        let mut write = Box::pin(writer.write(b"abcd"));
        assert!(futures::poll!(write.as_mut()).is_pending());

        reader.cancel(cause.clone());

        match write.await {
            Err(StreamError::Cancelled(c)) => assert!(c.ptr_eq(&cause)),
            other => panic!("unexpected write result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_write_reports_cancellation() {
        let (mut writer, _reader) = byte_channel();
        writer.cancel(Cause::msg("stop"));

        let err = writer.write(b"").await.unwrap_err();
        assert_eq!(err.to_string(), "stop");
    }

    #[tokio::test]
    async fn dropped_reader_unblocks_writer() {
        let (mut writer, reader) = byte_channel_with_config(ChannelConfig::with_capacity(1));
        writer.write(b"a").await.unwrap();

        assert!(writer.write(b"b").now_or_never().is_none());
        drop(reader);

        let err = writer.write(b"b").await.unwrap_err();
        let cause = err.cause().expect("dropped reader should cancel the channel");
        assert_eq!(cause.downcast_ref::<ChannelDropped>(), Some(&ChannelDropped::ReaderDropped));
    }
}
