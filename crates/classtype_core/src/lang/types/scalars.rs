//! Scalar (leaf) builtin type vocabulary.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; lowercase and host-language spellings are registered as
//!   aliases instead.
//! - `Any` is registered here so the parser can recognise it, even though class attributes reject it.
//!
//! ## Examples
//! ```rust
//! use classtype_core::lang::types::scalars::{self, ScalarTypeId};
//!
//! assert_eq!(scalars::from_str("Tensor"), Some(ScalarTypeId::Tensor));
//! assert_eq!(scalars::from_str("NoneType"), Some(ScalarTypeId::None));
//! assert_eq!(scalars::as_str(ScalarTypeId::Int), "int");
//! ```

/// Stable identifier for scalar builtin types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarTypeId {
    Any,
    None,
    Bool,
    Int,
    Float,
    Str,
    Tensor,
}

/// Metadata for a scalar builtin type.
#[derive(Debug, Clone, Copy)]
pub struct ScalarTypeInfo {
    pub id: ScalarTypeId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

/// Registry of scalar builtin types.
pub const SCALAR_TYPES: &[ScalarTypeInfo] = &[
    info(
        ScalarTypeId::Any,
        "Any",
        &[],
        "Catch-all type; every type is a subtype of it. Not allowed as attribute storage.",
    ),
    info(
        ScalarTypeId::None,
        "None",
        &["NoneType"],
        "Type of the `None` singleton.",
    ),
    info(ScalarTypeId::Bool, "bool", &[], "Boolean type."),
    info(ScalarTypeId::Int, "int", &["i64"], "Signed integer type."),
    info(ScalarTypeId::Float, "float", &["f64"], "Floating-point type."),
    info(ScalarTypeId::Str, "str", &["string"], "Text string type."),
    info(
        ScalarTypeId::Tensor,
        "Tensor",
        &["tensor"],
        "Dense n-dimensional array. The only storage type a module parameter may have (besides `None`).",
    ),
];

/// Resolve a type name to a [`ScalarTypeId`].
///
/// ## Returns
/// - `Some(ScalarTypeId)` if the spelling is a canonical name or alias in this registry.
/// - `None` otherwise.
pub fn from_str(name: &str) -> Option<ScalarTypeId> {
    SCALAR_TYPES
        .iter()
        .find(|t| t.canonical == name || t.aliases.contains(&name))
        .map(|t| t.id)
}

/// Return the canonical spelling for a scalar builtin type.
pub fn as_str(id: ScalarTypeId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a scalar builtin type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: ScalarTypeId) -> &'static ScalarTypeInfo {
    SCALAR_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("scalar type info missing")
}

const fn info(
    id: ScalarTypeId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
) -> ScalarTypeInfo {
    ScalarTypeInfo {
        id,
        canonical,
        aliases,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_canonical() {
        assert_eq!(from_str("tensor"), Some(ScalarTypeId::Tensor));
        assert_eq!(from_str("f64"), Some(ScalarTypeId::Float));
        assert_eq!(from_str("Float"), None);
    }
}
