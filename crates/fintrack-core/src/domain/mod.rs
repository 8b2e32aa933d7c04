//! # Fintrack Domain
//!
//! Domain entities and value objects for personal finance tracking.
//! This module contains the core business concepts of the application.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
