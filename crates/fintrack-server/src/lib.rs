//! # Fintrack Server
//!
//! Service wiring, background job registration, and startup utilities
//! for the `fintrack-server` binary.

pub mod bootstrap;
pub mod jobs;
pub mod startup;
