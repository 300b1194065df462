//! Service plumbing shared by every Smarttech HTTP service.

pub mod health;
pub mod middleware;
pub mod tracing;
