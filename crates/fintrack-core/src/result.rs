//! Result type aliases for fintrack.

use crate::FintrackError;

/// A specialized `Result` type for fintrack operations.
pub type FintrackResult<T> = Result<T, FintrackError>;

/// A boxed future returning a `FintrackResult`.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = FintrackResult<T>> + Send + 'a>>;
