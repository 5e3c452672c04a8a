use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// The reason a byte stream was terminated abnormally.
///
/// A `Cause` is an opaque, cheaply cloneable handle around any error value. Cloning it never
/// re-wraps the inner error: every clone displays the same message and [`Cause::ptr_eq`] holds
/// between them, so a cancellation that travels through several streams can still be traced back
/// to the party that issued it.
#[derive(Clone)]
pub struct Cause {
    inner: Arc<dyn Error + Send + Sync + 'static>,
}

impl Cause {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self { inner: Arc::new(error) }
    }

    /// Creates a cause that only carries a message.
    pub fn msg<S: ToString>(message: S) -> Self {
        Self::new(CauseMessage(message.to_string()))
    }

    pub fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self { inner: Arc::from(error) }
    }

    /// Returns true if both causes originate from the same cancellation.
    #[inline]
    pub fn ptr_eq(&self, other: &Cause) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn get_ref(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.inner
    }

    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl Debug for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cause").field(&self.inner).finish()
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&*self.inner, f)
    }
}

impl Error for Cause {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

impl From<io::Error> for Cause {
    fn from(e: io::Error) -> Self {
        Self::new(e)
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
struct CauseMessage(String);

#[derive(Error, Debug, Clone)]
pub enum StreamError {
    /// The stream was cancelled; displays exactly as its cause.
    #[error(transparent)]
    Cancelled(Cause),

    #[error("byte stream was closed for write")]
    ClosedForWrite,
}

impl StreamError {
    pub fn cause(&self) -> Option<&Cause> {
        match self {
            StreamError::Cancelled(cause) => Some(cause),
            StreamError::ClosedForWrite => None,
        }
    }

    /// Converts this error into the cause that should be propagated to linked streams.
    pub fn into_cause(self) -> Cause {
        match self {
            StreamError::Cancelled(cause) => cause,
            e @ StreamError::ClosedForWrite => Cause::new(e),
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Cancelled(cause) => io::Error::other(cause),
            StreamError::ClosedForWrite => io::Error::new(io::ErrorKind::BrokenPipe, e),
        }
    }
}

/// Cause used when one half of a byte channel is dropped before the stream was closed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelDropped {
    #[error("byte stream writer was dropped before close")]
    WriterDropped,

    #[error("byte stream reader was dropped")]
    ReaderDropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_clone_keeps_identity_and_message() {
        let cause = Cause::msg("Expected reason");
        let cloned = cause.clone();

        assert!(cause.ptr_eq(&cloned));
        assert_eq!(cloned.to_string(), "Expected reason");
        assert!(!cause.ptr_eq(&Cause::msg("Expected reason")));
    }

    #[test]
    fn cancelled_error_displays_as_its_cause() {
        let cause = Cause::new(io::Error::new(io::ErrorKind::ConnectionReset, "peer reset"));
        let error = StreamError::Cancelled(cause.clone());

        assert_eq!(error.to_string(), "peer reset");
        assert!(error.cause().is_some_and(|c| c.ptr_eq(&cause)));
        assert!(error.into_cause().downcast_ref::<io::Error>().is_some());
    }

    #[test]
    fn closed_for_write_converts_to_broken_pipe() {
        let io_error = io::Error::from(StreamError::ClosedForWrite);
        assert_eq!(io_error.kind(), io::ErrorKind::BrokenPipe);

        let cause = StreamError::ClosedForWrite.into_cause();
        assert!(matches!(cause.downcast_ref::<StreamError>(), Some(StreamError::ClosedForWrite)));
    }

    #[test]
    fn boxed_errors_keep_their_type() {
        let boxed: Box<dyn Error + Send + Sync> = Box::new(ChannelDropped::ReaderDropped);
        let cause = Cause::from_boxed(boxed);

        assert_eq!(cause.downcast_ref::<ChannelDropped>(), Some(&ChannelDropped::ReaderDropped));
    }
}
