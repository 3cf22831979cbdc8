//! Generic type-constructor vocabulary (`Optional[T]`, `List[T]`, `Tuple[...]`).
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**; lowercase aliases exist for ergonomics.
//! - `arity` is `None` for variadic constructors (`Tuple`).

/// Stable identifier for generic type constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericBaseId {
    Optional,
    List,
    Tuple,
}

/// Metadata for a generic type constructor.
#[derive(Debug, Clone, Copy)]
pub struct GenericBaseInfo {
    pub id: GenericBaseId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Number of type arguments, or `None` when any number is accepted.
    pub arity: Option<usize>,
    pub description: &'static str,
}

/// Registry of generic type constructors.
pub const GENERIC_BASES: &[GenericBaseInfo] = &[
    GenericBaseInfo {
        id: GenericBaseId::Optional,
        canonical: "Optional",
        aliases: &["optional"],
        arity: Some(1),
        description: "Either a value of the element type or `None`.",
    },
    GenericBaseInfo {
        id: GenericBaseId::List,
        canonical: "List",
        aliases: &["list"],
        arity: Some(1),
        description: "Homogeneous growable list. Invariant in its element type.",
    },
    GenericBaseInfo {
        id: GenericBaseId::Tuple,
        canonical: "Tuple",
        aliases: &["tuple"],
        arity: None,
        description: "Fixed-size heterogeneous tuple. Covariant element-wise.",
    },
];

/// Resolve a constructor name to a [`GenericBaseId`].
pub fn from_str(name: &str) -> Option<GenericBaseId> {
    GENERIC_BASES
        .iter()
        .find(|t| t.canonical == name || t.aliases.contains(&name))
        .map(|t| t.id)
}

/// Return the canonical spelling for a generic type constructor.
pub fn as_str(id: GenericBaseId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a generic type constructor.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: GenericBaseId) -> &'static GenericBaseInfo {
    GENERIC_BASES
        .iter()
        .find(|t| t.id == id)
        .expect("generic base info missing")
}
