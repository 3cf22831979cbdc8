//! Call signatures of methods and interface requirements.

use std::fmt;

use super::{SubtypeDiagnostics, Type};

/// One formal argument of a signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub ty: Type,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self { name: name.into(), ty }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// The call signature of a function or method: name, ordered arguments and return type.
///
/// For methods the first argument is the receiver (`self`).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSchema {
    name: String,
    arguments: Vec<Argument>,
    returns: Type,
}

impl FunctionSchema {
    pub fn new(name: impl Into<String>, arguments: Vec<Argument>, returns: Type) -> Self {
        Self {
            name: name.into(),
            arguments,
            returns,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn returns(&self) -> &Type {
        &self.returns
    }

    /// Whether a callable with this signature can be used where `rhs` is expected.
    ///
    /// ## Parameters
    /// - `as_method`: skip the receiver argument on both sides.
    /// - `why_not`: optional sink for nested type mismatch reasons.
    ///
    /// ## Notes
    /// - Arguments are contravariant and must agree in count and name; the return type is covariant.
    pub fn is_subtype_of(&self, rhs: &FunctionSchema, as_method: bool, mut why_not: Option<&mut SubtypeDiagnostics>) -> bool {
        let start = usize::from(as_method);
        let lhs_args = self.arguments.get(start..).unwrap_or_default();
        let rhs_args = rhs.arguments.get(start..).unwrap_or_default();
        if lhs_args.len() != rhs_args.len() {
            return false;
        }
        for (mine, theirs) in lhs_args.iter().zip(rhs_args) {
            if mine.name != theirs.name {
                return false;
            }
            if !theirs.ty.is_subtype_of_ext(&mine.ty, why_not.as_deref_mut()) {
                return false;
            }
        }
        self.returns.is_subtype_of_ext(&rhs.returns, why_not)
    }
}

impl fmt::Display for FunctionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ") -> {}", self.returns)
    }
}
