use tokio::task::JoinHandle;

use super::duplicator::{Duplicator, Termination};
use crate::channel::{ByteReader, ChannelConfig, byte_channel_with_config};

/// Splits `source` into two independent readers that each receive every byte of it.
///
/// Equivalent to creating two channels with the default config and passing their writers to
/// [`duplicate`](super::duplicate).
///
/// ```no_run
/// # async fn run() -> Result<(), micro_channel::StreamError> {
/// use micro_channel::{byte_channel, split};
///
/// let (mut writer, reader) = byte_channel();
/// let (mut first, mut second) = split(reader);
///
/// writer.write(b"hello").await?;
/// writer.close();
///
/// let (a, b) = tokio::join!(first.read_to_end(), second.read_to_end());
/// assert_eq!(a?, b?);
/// # Ok(())
/// # }
/// ```
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn split(source: ByteReader) -> (ByteReader, ByteReader) {
    split_with_config(source, ChannelConfig::default())
}

/// Like [`split`], with `config` applied to both returned streams.
pub fn split_with_config(source: ByteReader, config: ChannelConfig) -> (ByteReader, ByteReader) {
    let (first, second, _handle) = spawn_split(source, config);
    (first, second)
}

pub(crate) fn spawn_split(source: ByteReader, config: ChannelConfig) -> (ByteReader, ByteReader, JoinHandle<Termination>) {
    let (first_writer, first) = byte_channel_with_config(config);
    let (second_writer, second) = byte_channel_with_config(config);
    let handle = Duplicator::new(source, first_writer, second_writer).spawn();
    (first, second, handle)
}

impl ByteReader {
    /// Consumes this reader and returns two readers with identical content, see [`split`].
    pub fn split(self) -> (ByteReader, ByteReader) {
        split(self)
    }
}
