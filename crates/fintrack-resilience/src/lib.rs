//! # Fintrack Resilience
//!
//! Retry and timeout wrappers for calls that leave the process,
//! primarily the AI advisor's upstream requests.

pub mod retry;
pub mod timeout;

pub use retry::RetryPolicy;
pub use timeout::with_timeout;
