//! Bridges between byte channels and the tokio / futures I/O traits.
//!
//! - [`ByteWriter`] implements [`AsyncWrite`], shutting down closes the channel normally
//! - [`ByteReader`] implements [`Stream`] of [`Bytes`] chunks and converts into an [`AsyncRead`]
//! - [`pump_reader`] feeds any [`AsyncRead`], e.g. one half of a socket, into a [`ByteWriter`]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::io::{ReaderStream, StreamReader};
use tracing::error;

use crate::channel::{ByteReader, ByteWriter};
use crate::error::{Cause, StreamError};

impl AsyncWrite for ByteWriter {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        self.get_mut().poll_write(cx, buf).map_err(io::Error::from)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        // written bytes are visible to the reader immediately
        match self.closed_cause() {
            Some(cause) => Poll::Ready(Err(StreamError::Cancelled(cause).into())),
            None => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.close();
        Poll::Ready(Ok(()))
    }
}

/// Yields each chunk returned by [`ByteReader::read_available`] until end of stream.
///
/// A cancelled channel yields its error on every poll; callers stop at the first one.
impl Stream for ByteReader {
    type Item = Result<Bytes, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_read_available(cx).map(Result::transpose)
    }
}

impl ByteReader {
    /// Adapts this reader into an [`AsyncRead`]. Cancellation surfaces as an [`io::Error`]
    /// wrapping the cause.
    pub fn into_async_read(self) -> StreamReader<ByteReader, Bytes> {
        StreamReader::new(self)
    }
}

/// Copies `reader` into `writer` until EOF, then closes the writer.
///
/// Returns the number of bytes copied. An I/O error from `reader` cancels the writer with that
/// error as the cause; a cancelled writer stops the copy.
pub async fn pump_reader<R>(reader: R, mut writer: ByteWriter) -> Result<u64, StreamError>
where
    R: AsyncRead + Unpin,
{
    let mut stream = ReaderStream::with_capacity(reader, writer.capacity());
    let mut size: u64 = 0;

    while let Some(item) = stream.next().await {
        match item {
            Ok(bytes) => {
                writer.write(&bytes).await?;
                size += bytes.len() as u64;
            }
            Err(e) => {
                error!(cause = %e, "failed to read from source, cancel byte stream");
                let cause = Cause::from(e);
                writer.cancel(cause.clone());
                return Err(StreamError::Cancelled(cause));
            }
        }
    }

    writer.close();
    Ok(size)
}
