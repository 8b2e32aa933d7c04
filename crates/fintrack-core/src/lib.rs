//! # Fintrack Core
//!
//! Core types, domain entities, and error definitions for fintrack.
//! This crate provides the foundational abstractions used across all layers
//! of the application: the unified error type, typed entity IDs, pagination,
//! validation glue, telemetry initialization, and the finance domain model.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use telemetry::TelemetryConfig;
pub use traits::*;
pub use validation::*;
