//! Provide the shared, dependency-free vocabulary for the classtype registry.
//!
//! This crate holds the pieces that both the registry and its tooling need to agree on without pulling in
//! the type model itself:
//! - builtin type spellings and aliases ([`lang::types`]), and
//! - dotted qualified names ([`QualifiedName`]) used to identify classes, interfaces and methods.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no registry-specific types.

pub mod lang;
pub mod names;

pub use names::{QualifiedName, QualifiedNameError};
