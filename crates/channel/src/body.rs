//! HTTP body integration.
//!
//! A [`ByteReader`] is an [`http_body::Body`], so either copy returned by [`split`](crate::split)
//! can be handed to anything that consumes a body. [`pump_body`] goes the other way and streams
//! an existing body into a [`ByteWriter`].

use std::error::Error;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use http_body::{Body, Frame};
use http_body_util::BodyExt;
use tracing::{error, trace};

use crate::channel::{ByteReader, ByteWriter};
use crate::error::{Cause, StreamError};

impl Body for ByteReader {
    type Data = Bytes;
    type Error = StreamError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.get_mut().poll_read_available(cx) {
            Poll::Ready(Ok(Some(bytes))) => Poll::Ready(Some(Ok(Frame::data(bytes)))),
            Poll::Ready(Ok(None)) => Poll::Ready(None),
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.is_end_of_stream()
    }
}

/// Streams `body` into `writer`, then closes the writer.
///
/// Data frames are written in order and trailers are skipped. If the body fails, the writer is
/// cancelled with the body's error as the cause. Returns the number of bytes written.
pub async fn pump_body<B>(mut body: B, mut writer: ByteWriter) -> Result<u64, StreamError>
where
    B: Body + Unpin,
    B::Error: Into<Box<dyn Error + Send + Sync>>,
{
    let mut size: u64 = 0;

    loop {
        match body.frame().await {
            Some(Ok(frame)) => match frame.into_data() {
                Ok(mut data) => {
                    let bytes = data.copy_to_bytes(data.remaining());
                    writer.write(&bytes).await?;
                    size += bytes.len() as u64;
                }
                Err(_frame) => {
                    trace!("skip non-data frame of body");
                }
            },

            Some(Err(e)) => {
                let cause = Cause::from_boxed(e.into());
                error!(cause = %cause, "failed to read body frame, cancel byte stream");
                writer.cancel(cause.clone());
                return Err(StreamError::Cancelled(cause));
            }

            None => {
                writer.close();
                return Ok(size);
            }
        }
    }
}
