//! Builtin type vocabularies.
//!
//! ## Notes
//! - These registries are vocabulary only: they define spellings + metadata, not subtyping rules.
//! - `scalars` covers leaf types (`int`, `Tensor`, `None`, ...); `generics` covers type constructors that
//!   take bracketed arguments (`Optional[T]`, `List[T]`, `Tuple[...]`).

pub mod generics;
pub mod scalars;

pub use generics::{GENERIC_BASES, GenericBaseId, GenericBaseInfo};
pub use scalars::{SCALAR_TYPES, ScalarTypeId, ScalarTypeInfo};
