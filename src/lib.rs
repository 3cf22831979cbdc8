#![forbid(unsafe_code)]
//! Structural class types for a statically-typed scripting layer.
//!
//! This crate provides the type-level view of user-defined classes: named types with a slot table of
//! attributes and constants, a method table, an optional module flag with per-attribute parameter
//! tracking, and a structural subtype check against interfaces. A small JSON front end and CLI load
//! declarations and run assignability checks.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` or an
//!   `assert!` whose message starts with `INVARIANT:`. Misusing `ClassType::refine` and resolving the compilation
//!   unit of a type that outlived it fall in this category.

pub mod cli;
pub mod config;
pub mod frontend;
pub mod registry;
pub mod types;

pub use config::CheckConfig;
pub use frontend::{DeclError, Declarations, load_declarations, parse_type};
pub use registry::{CompilationUnit, CompilationUnitHandle, RegistryError};
pub use types::{
    Argument, ClassType, ClassTypeError, FieldKind, Function, FunctionSchema, IValue, InterfaceType, SubtypeDiagnostics,
    Type, TypeKind,
};
