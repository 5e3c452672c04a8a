use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::{Cause, StreamError};

/// Terminal state of a byte stream. Set once, never reset.
#[derive(Debug, Clone)]
enum Closed {
    Normally,
    Cancelled(Cause),
}

#[derive(Debug)]
struct State {
    buffer: BytesMut,
    closed: Option<Closed>,
    read_waker: Option<Waker>,
    write_waker: Option<Waker>,
    total_written: u64,
    total_read: u64,
}

/// State shared by the [`ByteWriter`](super::ByteWriter) and [`ByteReader`](super::ByteReader) of one channel.
///
/// Every operation takes the lock for a short, non-blocking critical section. Wakers are always
/// woken after the lock is released.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<State>,
    capacity: usize,
}

impl Shared {
    pub(crate) fn new(capacity: usize) -> Self {
        let state = State {
            buffer: BytesMut::with_capacity(capacity),
            closed: None,
            read_waker: None,
            write_waker: None,
            total_written: 0,
            total_read: 0,
        };
        Self { state: Mutex::new(state), capacity }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // critical sections never leave the state half-updated
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends as many bytes of `buf` as currently fit, returning how many were taken.
    ///
    /// Returns `Poll::Pending` only when the buffer is full; an empty `buf` is accepted
    /// immediately as long as the stream is still open.
    pub(crate) fn poll_write(&self, cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, StreamError>> {
        let mut state = self.lock();
        state.ensure_writable()?;

        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }

        let space = self.capacity - state.buffer.len();
        if space == 0 {
            register(&mut state.write_waker, cx);
            return Poll::Pending;
        }

        let size = space.min(buf.len());
        state.buffer.extend_from_slice(&buf[..size]);
        state.total_written += size as u64;
        let waker = state.read_waker.take();
        drop(state);

        if let Some(waker) = waker {
            waker.wake();
        }
        Poll::Ready(Ok(size))
    }

    /// Takes everything currently buffered.
    ///
    /// `Ok(None)` means the stream was closed normally and the buffer is drained. A cancelled
    /// stream fails immediately, whatever is still buffered.
    pub(crate) fn poll_read(&self, cx: &mut Context<'_>) -> Poll<Result<Option<Bytes>, StreamError>> {
        let mut state = self.lock();

        if let Some(Closed::Cancelled(cause)) = &state.closed {
            return Poll::Ready(Err(StreamError::Cancelled(cause.clone())));
        }

        if !state.buffer.is_empty() {
            let chunk = state.buffer.split().freeze();
            state.total_read += chunk.len() as u64;
            let waker = state.write_waker.take();
            drop(state);

            if let Some(waker) = waker {
                waker.wake();
            }
            return Poll::Ready(Ok(Some(chunk)));
        }

        if state.closed.is_some() {
            return Poll::Ready(Ok(None));
        }

        register(&mut state.read_waker, cx);
        Poll::Pending
    }

    /// Closes the stream normally. Returns false if it was already closed or cancelled.
    pub(crate) fn close(&self) -> bool {
        self.terminate(Closed::Normally)
    }

    /// Cancels the stream, discarding buffered bytes. Returns false if it was already closed or cancelled.
    pub(crate) fn cancel(&self, cause: Cause) -> bool {
        let cancelled = self.terminate(Closed::Cancelled(cause.clone()));
        if cancelled {
            debug!(cause = %cause, "byte stream cancelled");
        }
        cancelled
    }

    fn terminate(&self, closed: Closed) -> bool {
        let (read_waker, write_waker) = {
            let mut state = self.lock();
            if state.closed.is_some() {
                return false;
            }

            if matches!(closed, Closed::Cancelled(_)) {
                state.buffer.clear();
            }
            state.closed = Some(closed);
            (state.read_waker.take(), state.write_waker.take())
        };

        if let Some(waker) = read_waker {
            waker.wake();
        }
        if let Some(waker) = write_waker {
            waker.wake();
        }
        true
    }

    pub(crate) fn closed_cause(&self) -> Option<Cause> {
        match &self.lock().closed {
            Some(Closed::Cancelled(cause)) => Some(cause.clone()),
            _ => None,
        }
    }

    pub(crate) fn is_closed_for_write(&self) -> bool {
        self.lock().closed.is_some()
    }

    pub(crate) fn is_closed_for_read(&self) -> bool {
        let state = self.lock();
        match state.closed {
            Some(Closed::Cancelled(_)) => true,
            Some(Closed::Normally) => state.buffer.is_empty(),
            None => false,
        }
    }

    /// True only when the stream ended normally and every byte has been read.
    pub(crate) fn is_end_of_stream(&self) -> bool {
        let state = self.lock();
        matches!(state.closed, Some(Closed::Normally)) && state.buffer.is_empty()
    }

    pub(crate) fn available_for_read(&self) -> usize {
        self.lock().buffer.len()
    }

    pub(crate) fn total_written(&self) -> u64 {
        self.lock().total_written
    }

    pub(crate) fn total_read(&self) -> u64 {
        self.lock().total_read
    }
}

impl State {
    fn ensure_writable(&self) -> Result<(), StreamError> {
        match &self.closed {
            None => Ok(()),
            Some(Closed::Cancelled(cause)) => Err(StreamError::Cancelled(cause.clone())),
            Some(Closed::Normally) => Err(StreamError::ClosedForWrite),
        }
    }
}

fn register(slot: &mut Option<Waker>, cx: &Context<'_>) {
    match slot {
        Some(waker) if waker.will_wake(cx.waker()) => {}
        _ => *slot = Some(cx.waker().clone()),
    }
}
