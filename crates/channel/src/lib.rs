//! Backpressured async byte channels and a stream duplicator
//!
//! This crate provides a small set of primitives for moving bytes between async tasks with
//! bounded memory, and for handing one byte stream to two independent consumers. It is built on
//! top of tokio and integrates with `http_body` and the tokio I/O traits.
//!
//! # Features
//!
//! - Single-producer, single-consumer byte channels with a bounded buffer
//! - Close with end of stream, or cancel with an arbitrary error as the cause
//! - Cancellation observable from both ends, including by suspended reads and writes
//! - Duplication of one stream into two with per-chunk lock-step delivery
//! - `http_body::Body`, `futures::Stream`, `AsyncRead` and `AsyncWrite` adapters
//!
//! # Example
//!
//! ```no_run
//! use micro_channel::{byte_channel, split, StreamError};
//! use tracing::{info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StreamError> {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     let (mut writer, reader) = byte_channel();
//!     let (mut first, mut second) = split(reader);
//!
//!     tokio::spawn(async move {
//!         writer.write(b"hello world").await?;
//!         writer.close();
//!         Ok::<_, StreamError>(())
//!     });
//!
//!     // both copies must be read concurrently
//!     let (first, second) = tokio::join!(first.read_to_end(), second.read_to_end());
//!     let (first, second) = (first?, second?);
//!     info!(size = first.len(), identical = first == second, "received both copies");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`channel`]: the byte channel, a [`ByteWriter`] / [`ByteReader`] pair over a shared buffer
//! - [`tee`]: [`duplicate`] and [`split`], driven by the [`Duplicator`](tee::Duplicator) copy loop
//! - [`io`]: tokio and futures I/O adapters
//! - [`body`]: `http_body` adapters
//!
//! # Cancellation
//!
//! Every abnormal termination carries a [`Cause`]. Causes are propagated as the same value, never
//! wrapped: if a consumer of one copy returned by [`split`] cancels it, the producer's pending
//! write and the other consumer's next read fail with a cause that is
//! [`ptr_eq`](Cause::ptr_eq) to the one the consumer supplied.
//!
//! ## Error Handling
//!
//! - [`StreamError`]: error returned by channel operations
//! - [`Cause`]: the reason a stream was cancelled
//! - [`ChannelDropped`]: the cause used when a channel half is dropped before close
//!
//! # Limitations
//!
//! - Exactly one producer and one consumer per channel
//! - [`split`] produces two copies; a copy that is never read stalls the other one once its
//!   buffer is full

pub mod body;
pub mod channel;
pub mod io;
pub mod tee;

mod error;
pub use error::Cause;
pub use error::ChannelDropped;
pub use error::StreamError;

pub use channel::{ByteReader, ByteWriter, ChannelConfig, byte_channel, byte_channel_with_config};
pub use tee::{duplicate, split, split_with_config};

#[cfg(test)]
mod test_util;
