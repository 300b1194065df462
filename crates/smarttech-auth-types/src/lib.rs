//! Auth types shared across Smarttech services.
//!
//! Provides JWT claim decoding, the refresh-token cookie builders, and the
//! `BearerToken` extractor.

pub mod bearer;
pub mod cookie;
pub mod token;
