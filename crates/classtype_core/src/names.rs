//! Dotted qualified names (`pkg.module.Class`).
//!
//! A [`QualifiedName`] identifies a named type or a method globally. It is a non-empty list of
//! non-empty atoms; the last atom is the short name.
//!
//! ## Examples
//! ```rust
//! use classtype_core::QualifiedName;
//!
//! let name: QualifiedName = "shapes.Square".parse().unwrap();
//! assert_eq!(name.name(), "Square");
//! assert_eq!(name.prefix(), "shapes");
//! assert_eq!(name.child("area").to_string(), "shapes.Square.area");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::lang::conventions::QUALIFIED_NAME_SEPARATOR;

/// Error produced when a string is not a valid qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedNameError {
    pub input: String,
}

impl fmt::Display for QualifiedNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is not a valid qualified name (expected non-empty atoms separated by '{}')",
            self.input, QUALIFIED_NAME_SEPARATOR
        )
    }
}

impl std::error::Error for QualifiedNameError {}

/// A dotted, globally unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    atoms: Vec<String>,
}

impl QualifiedName {
    /// Build a name from its atoms.
    ///
    /// ## Returns
    /// - `None` if `atoms` is empty or any atom is empty or contains the separator.
    pub fn from_atoms<I, S>(atoms: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let atoms: Vec<String> = atoms.into_iter().map(Into::into).collect();
        if atoms.is_empty()
            || atoms
                .iter()
                .any(|a| a.is_empty() || a.contains(QUALIFIED_NAME_SEPARATOR))
        {
            return None;
        }
        Some(Self { atoms })
    }

    /// The short (unqualified) name: the last atom.
    pub fn name(&self) -> &str {
        // `atoms` is never empty (checked on construction).
        &self.atoms[self.atoms.len() - 1]
    }

    /// Everything before the last atom, joined with the separator. Empty for single-atom names.
    pub fn prefix(&self) -> String {
        let sep = QUALIFIED_NAME_SEPARATOR.to_string();
        self.atoms[..self.atoms.len() - 1].join(sep.as_str())
    }

    /// The full dotted spelling.
    pub fn qualified_name(&self) -> String {
        let sep = QUALIFIED_NAME_SEPARATOR.to_string();
        self.atoms.join(sep.as_str())
    }

    pub fn atoms(&self) -> &[String] {
        &self.atoms
    }

    /// Append one atom, e.g. a method name to its owning class name.
    ///
    /// ## Panics
    /// - If `atom` is empty or contains the separator (a caller bug, not user input).
    pub fn child(&self, atom: &str) -> Self {
        assert!(
            !atom.is_empty() && !atom.contains(QUALIFIED_NAME_SEPARATOR),
            "INVARIANT: qualified name atom must be non-empty and undotted, got '{atom}'"
        );
        let mut atoms = self.atoms.clone();
        atoms.push(atom.to_string());
        Self { atoms }
    }
}

impl FromStr for QualifiedName {
    type Err = QualifiedNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_atoms(s.split(QUALIFIED_NAME_SEPARATOR)).ok_or_else(|| QualifiedNameError { input: s.to_string() })
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, atom) in self.atoms.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", QUALIFIED_NAME_SEPARATOR)?;
            }
            write!(f, "{}", atom)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_atom() {
        let name: QualifiedName = "Point".parse().unwrap();
        assert_eq!(name.name(), "Point");
        assert_eq!(name.prefix(), "");
        assert_eq!(name.atoms().len(), 1);
    }

    #[test]
    fn test_parse_rejects_empty_atoms() {
        assert!("".parse::<QualifiedName>().is_err());
        assert!("a..b".parse::<QualifiedName>().is_err());
        assert!(".a".parse::<QualifiedName>().is_err());
    }

    #[test]
    fn test_display_round_trips_spelling() {
        let name: QualifiedName = "models.nn.Linear".parse().unwrap();
        assert_eq!(name.to_string(), "models.nn.Linear");
        assert_eq!(name.qualified_name(), "models.nn.Linear");
    }

    #[test]
    #[should_panic(expected = "INVARIANT")]
    fn test_child_rejects_dotted_atom() {
        let name: QualifiedName = "a".parse().unwrap();
        let _ = name.child("b.c");
    }
}
