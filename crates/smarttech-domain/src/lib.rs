//! Domain types shared across all Smarttech services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod clock;
pub mod id;
pub mod user;
