//! # Fintrack Security
//!
//! Security module for fintrack providing JWT authentication and
//! password hashing.

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;
