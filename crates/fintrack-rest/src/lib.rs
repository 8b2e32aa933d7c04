//! # Fintrack REST
//!
//! REST API layer using Axum for fintrack. Provides HTTP endpoints for
//! authentication, finances (categories, transactions, budgets, goals,
//! recurring templates), analytics, the advisor, and job administration.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use router::*;
pub use state::*;
