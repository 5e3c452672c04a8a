//! Duplication of one byte stream into two.
//!
//! - [`duplicate`] copies a source into two sinks the caller already owns
//! - [`split`] allocates the two sinks itself and hands back their readers
//!
//! Both run the copy loop of [`Duplicator`] on a background task and report failures only through
//! the streams themselves: a cancellation anywhere reaches all three streams with the identical
//! [`Cause`](crate::Cause).

mod duplicator;
mod split;

pub use duplicator::Duplicator;
pub use duplicator::Termination;
pub use duplicator::duplicate;
pub use split::split;
pub use split::split_with_config;
