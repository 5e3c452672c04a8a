use futures::future::try_join;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span, warn};

use crate::channel::{ByteReader, ByteWriter};
use crate::error::Cause;

/// How a duplication ended. Each [`Duplicator`] reaches exactly one of these states.
#[derive(Debug, Clone)]
pub enum Termination {
    /// The source ended normally and every chunk reached both sinks, which were then closed.
    AllDelivered,
    /// The source was cancelled; both sinks were cancelled with the same cause.
    SourceFailed(Cause),
    /// A sink rejected a chunk; the source and the other sink were cancelled with its cause.
    SinkFailed(Cause),
}

impl Termination {
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Termination::AllDelivered)
    }

    /// The cause that was propagated to all three streams, if the duplication failed.
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            Termination::AllDelivered => None,
            Termination::SourceFailed(cause) | Termination::SinkFailed(cause) => Some(cause),
        }
    }
}

/// Copies one byte stream into two sinks, chunk by chunk.
///
/// The duplicator reads a chunk from the source, writes it to both sinks concurrently and only
/// reads the next chunk once both sinks accepted it. A slow sink therefore slows down the source
/// and the other sink, but the two consumers never drift apart by more than one chunk.
///
/// Failures travel in every direction:
///
/// | event                         | source            | first sink        | second sink       |
/// |-------------------------------|-------------------|-------------------|-------------------|
/// | source ends normally          | -                 | closed            | closed            |
/// | source cancelled with `c`     | -                 | cancelled with `c`| cancelled with `c`|
/// | first sink cancelled with `c` | cancelled with `c`| -                 | cancelled with `c`|
/// | second sink cancelled with `c`| cancelled with `c`| cancelled with `c`| -                 |
///
/// The cause is the same value everywhere, never a wrapper around it. If both sinks fail, the
/// failure observed first by the join wins; when both are already failed at the same poll, the
/// first sink's cause wins.
#[derive(Debug)]
pub struct Duplicator {
    source: ByteReader,
    first: ByteWriter,
    second: ByteWriter,
}

impl Duplicator {
    pub fn new(source: ByteReader, first: ByteWriter, second: ByteWriter) -> Self {
        Self { source, first, second }
    }

    /// Runs the copy loop to its terminal state.
    ///
    /// Every path out of the loop closes or cancels each stream that is not already terminated,
    /// so no party is left waiting.
    pub async fn run(mut self) -> Termination {
        let mut chunks: u64 = 0;
        let mut size: u64 = 0;

        loop {
            let chunk = match self.source.read_available().await {
                Ok(Some(chunk)) => chunk,

                Ok(None) => {
                    self.first.close();
                    self.second.close();
                    debug!(chunks = chunks, size = size, "source exhausted, closed both sinks");
                    return Termination::AllDelivered;
                }

                Err(e) => {
                    let cause = e.into_cause();
                    warn!(cause = %cause, "source cancelled, cancelling both sinks");
                    self.first.cancel(cause.clone());
                    self.second.cancel(cause.clone());
                    return Termination::SourceFailed(cause);
                }
            };

            // both writes make progress together; the first failure aborts the other one
            if let Err(e) = try_join(self.first.write(&chunk), self.second.write(&chunk)).await {
                let cause = e.into_cause();
                warn!(cause = %cause, chunks = chunks, size = size, "sink rejected chunk, cancelling source and both sinks");
                self.source.cancel(cause.clone());
                self.first.cancel(cause.clone());
                self.second.cancel(cause.clone());
                return Termination::SinkFailed(cause);
            }

            chunks += 1;
            size += chunk.len() as u64;
        }
    }

    /// Spawns [`Duplicator::run`] on the current tokio runtime.
    pub(crate) fn spawn(self) -> JoinHandle<Termination> {
        tokio::spawn(self.run().instrument(debug_span!("duplicate")))
    }
}

/// Copies `source` into `first` and `second` on a background task.
///
/// Returns immediately. The outcome is only observable through the three streams: both sinks see
/// every byte of the source in order followed by end of stream, or all streams fail with the same
/// cause.
///
/// The two sinks must be read concurrently. A sink that nobody reads eventually fills up and
/// stalls the source and the other sink with it.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn duplicate(source: ByteReader, first: ByteWriter, second: ByteWriter) {
    drop(Duplicator::new(source, first, second).spawn());
}
