//! # Fintrack Repository
//!
//! MySQL data access for fintrack built on SQLx. One repository trait
//! per aggregate in [`traits`], implemented in [`mysql`] against a
//! shared [`DatabasePool`]. Spent amounts for budgets and all reporting
//! sums are aggregated in SQL rather than in application code.

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
