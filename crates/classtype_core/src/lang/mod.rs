//! Language vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. [`types::ScalarTypeId`]) and look up spellings via registry tables
//! instead of scattering string comparisons across the type parser and the renderers.
//!
//! ## Examples
//! ```rust
//! use classtype_core::lang::types::scalars::{self, ScalarTypeId};
//!
//! assert_eq!(scalars::from_str("float"), Some(ScalarTypeId::Float));
//! assert_eq!(scalars::as_str(ScalarTypeId::Float), "float");
//! ```

pub mod conventions;
pub mod types;
