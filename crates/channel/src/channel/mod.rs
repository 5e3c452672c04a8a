//! Single-producer, single-consumer async byte channels.
//!
//! A byte channel is an ordered, bounded pipe of bytes with two halves:
//!
//! - [`ByteWriter`]: the producer side, the only party allowed to write
//! - [`ByteReader`]: the consumer side, which reads whatever is buffered
//!
//! # Backpressure
//!
//! The channel buffers at most [`ChannelConfig::capacity`] bytes. A write that does not fit
//! suspends until the reader drains the buffer, and a read suspends until at least one byte is
//! available or the channel is closed.
//!
//! # Termination
//!
//! Every channel ends exactly once, in one of two ways:
//!
//! - [`ByteWriter::close`] ends it normally. The reader first drains what is buffered and then
//!   observes end of stream.
//! - `cancel(cause)` (available on both halves) ends it with a [`Cause`]. Buffered bytes are
//!   discarded and both sides observe the cause on their next operation, including operations that
//!   are already suspended.
//!
//! The first close or cancel wins; later calls are no-ops. Dropping a half before the channel is
//! closed cancels it with [`ChannelDropped`], so neither side can wait forever on a peer that is
//! gone.
//!
//! [`Cause`]: crate::Cause
//! [`ChannelDropped`]: crate::ChannelDropped

mod reader;
mod shared;
mod writer;

pub use reader::ByteReader;
pub use writer::ByteWriter;

use shared::Shared;
use triomphe::Arc;

/// Default number of bytes a channel buffers before writes are suspended.
pub const DEFAULT_CAPACITY: usize = 4 * 1024;

/// Construction parameters of a byte channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    capacity: usize,
}

impl ChannelConfig {
    /// Creates a config buffering at most `capacity` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0, a zero sized buffer could never accept a write.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "byte channel capacity must be greater than 0");
        Self { capacity }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY }
    }
}

/// Creates a byte channel with [`DEFAULT_CAPACITY`].
pub fn byte_channel() -> (ByteWriter, ByteReader) {
    byte_channel_with_config(ChannelConfig::default())
}

pub fn byte_channel_with_config(config: ChannelConfig) -> (ByteWriter, ByteReader) {
    let shared = Arc::new(Shared::new(config.capacity()));
    (ByteWriter::new(Arc::clone(&shared)), ByteReader::new(shared))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn zero_capacity_is_rejected() {
        let _ = ChannelConfig::with_capacity(0);
    }

    #[test]
    fn default_config_uses_default_capacity() {
        let (writer, reader) = byte_channel();
        assert_eq!(writer.capacity(), DEFAULT_CAPACITY);
        assert_eq!(reader.available_for_read(), 0);
    }

    fn check_send<T: Send + Sync>() {}

    #[test]
    fn halves_are_send() {
        check_send::<ByteWriter>();
        check_send::<ByteReader>();
    }
}
