//! Test utilities for Smarttech services.
//!
//! Provides a manually advanced clock and request header builders.
//! Import from `[dev-dependencies]` only, never in production code.

pub mod auth;
pub mod clock;
