//! Type descriptors for the statically-typed scripting layer.
//!
//! [`Type`] is the tagged union every descriptor is expressed in. Named types (classes, interfaces,
//! functions) are shared behind `Rc` because the owning [`CompilationUnit`](crate::registry::CompilationUnit)
//! and any number of other types refer to them.
//!
//! ## Subtyping
//!
//! [`Type::is_subtype_of_ext`] is the single entry point. It dispatches on the shape of both sides:
//! - a class on the left is handed to [`ClassType::is_subtype_of_ext`], which runs the structural
//!   interface check or falls back to the generic rule;
//! - two interfaces are compared method by method;
//! - everything else uses the generic rule (`Any` is top, `Optional` and `Tuple` are covariant, `List` is
//!   invariant, named types compare by qualified name).

use std::fmt;
use std::rc::Rc;

use classtype_core::QualifiedName;
use classtype_core::lang::conventions;
use classtype_core::lang::types::generics::{self, GenericBaseId};
use classtype_core::lang::types::scalars::{self, ScalarTypeId};

pub mod class;
pub mod diagnostics;
pub mod errors;
pub mod function;
pub mod interface;
pub mod ivalue;
pub mod schema;

pub use class::ClassType;
pub use diagnostics::SubtypeDiagnostics;
pub use errors::{ClassTypeError, FieldKind};
pub use function::Function;
pub use interface::InterfaceType;
pub use ivalue::IValue;
pub use schema::{Argument, FunctionSchema};

/// Kind tag of a [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Any,
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    Tensor,
    Optional,
    List,
    Tuple,
    SelfType,
    Class,
    Interface,
    Function,
}

/// A type descriptor.
#[derive(Debug, Clone)]
pub enum Type {
    Any,
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    Tensor,
    Optional(Box<Type>),
    List(Box<Type>),
    Tuple(Vec<Type>),
    /// The receiver type inside method signatures.
    SelfType,
    Class(Rc<ClassType>),
    Interface(Rc<InterfaceType>),
    Function(Rc<Function>),
}

impl Type {
    pub fn optional(elem: Type) -> Self {
        Type::Optional(Box::new(elem))
    }

    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Any => TypeKind::Any,
            Type::NoneType => TypeKind::NoneType,
            Type::Bool => TypeKind::Bool,
            Type::Int => TypeKind::Int,
            Type::Float => TypeKind::Float,
            Type::Str => TypeKind::Str,
            Type::Tensor => TypeKind::Tensor,
            Type::Optional(_) => TypeKind::Optional,
            Type::List(_) => TypeKind::List,
            Type::Tuple(_) => TypeKind::Tuple,
            Type::SelfType => TypeKind::SelfType,
            Type::Class(_) => TypeKind::Class,
            Type::Interface(_) => TypeKind::Interface,
            Type::Function(_) => TypeKind::Function,
        }
    }

    /// Qualified name of a named type. Anonymous classes and structural types have none.
    pub fn name(&self) -> Option<&QualifiedName> {
        match self {
            Type::Class(class) => class.name(),
            Type::Interface(iface) => Some(iface.name()),
            Type::Function(function) => Some(function.qualname()),
            _ => None,
        }
    }

    /// Element type of `Optional[T]`.
    pub fn optional_elem(&self) -> Option<&Type> {
        match self {
            Type::Optional(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn is_subtype_of(&self, rhs: &Type) -> bool {
        self.is_subtype_of_ext(rhs, None)
    }

    /// Whether a value of this type may be used where `rhs` is expected.
    ///
    /// Reasons for a negative answer are appended to `why_not` when one is supplied.
    pub fn is_subtype_of_ext(&self, rhs: &Type, why_not: Option<&mut SubtypeDiagnostics>) -> bool {
        match (self, rhs) {
            (Type::Class(class), _) => class.is_subtype_of_ext(rhs, why_not),
            (Type::Interface(lhs), Type::Interface(rhs)) => lhs.is_subtype_of_interface(rhs, why_not),
            _ => self.base_is_subtype_of(rhs, why_not),
        }
    }

    /// The generic subtyping rule, shared by every kind. Class types fall back to it for targets that are
    /// not interfaces.
    pub(crate) fn base_is_subtype_of(&self, rhs: &Type, mut why_not: Option<&mut SubtypeDiagnostics>) -> bool {
        if matches!(rhs, Type::Any) || self == rhs {
            return true;
        }
        match (self, rhs) {
            (Type::NoneType, Type::Optional(_)) => true,
            (Type::Optional(lhs), Type::Optional(rhs)) => lhs.is_subtype_of_ext(rhs, why_not),
            (_, Type::Optional(elem)) => self.is_subtype_of_ext(elem, why_not),
            (Type::Tuple(lhs), Type::Tuple(rhs)) => {
                if lhs.len() != rhs.len() {
                    if let Some(why_not) = why_not {
                        why_not.push(format!(
                            "'{}' has {} elements but '{}' has {}",
                            self,
                            lhs.len(),
                            Type::Tuple(rhs.clone()),
                            rhs.len()
                        ));
                    }
                    return false;
                }
                lhs.iter()
                    .zip(rhs)
                    .all(|(l, r)| l.is_subtype_of_ext(r, why_not.as_deref_mut()))
            }
            _ => false,
        }
    }

    fn is_scalar(&self) -> bool {
        matches!(
            self,
            Type::Any
                | Type::NoneType
                | Type::Bool
                | Type::Int
                | Type::Float
                | Type::Str
                | Type::Tensor
                | Type::SelfType
        )
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Optional(a), Type::Optional(b)) | (Type::List(a), Type::List(b)) => a == b,
            (Type::Tuple(a), Type::Tuple(b)) => a == b,
            // Named classes compare by name, so a refined class equals the class it was refined from.
            (Type::Class(a), Type::Class(b)) => match (a.name(), b.name()) {
                (Some(a), Some(b)) => a == b,
                _ => Rc::ptr_eq(a, b),
            },
            (Type::Interface(a), Type::Interface(b)) => a.name() == b.name(),
            (Type::Function(a), Type::Function(b)) => Rc::ptr_eq(a, b) || a.qualname() == b.qualname(),
            _ => self.is_scalar() && self.kind() == other.kind(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "{}", scalars::as_str(ScalarTypeId::Any)),
            Type::NoneType => write!(f, "{}", scalars::as_str(ScalarTypeId::None)),
            Type::Bool => write!(f, "{}", scalars::as_str(ScalarTypeId::Bool)),
            Type::Int => write!(f, "{}", scalars::as_str(ScalarTypeId::Int)),
            Type::Float => write!(f, "{}", scalars::as_str(ScalarTypeId::Float)),
            Type::Str => write!(f, "{}", scalars::as_str(ScalarTypeId::Str)),
            Type::Tensor => write!(f, "{}", scalars::as_str(ScalarTypeId::Tensor)),
            Type::Optional(elem) => write!(f, "{}[{}]", generics::as_str(GenericBaseId::Optional), elem),
            Type::List(elem) => write!(f, "{}[{}]", generics::as_str(GenericBaseId::List), elem),
            Type::Tuple(elems) => {
                write!(f, "{}[", generics::as_str(GenericBaseId::Tuple))?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, "]")
            }
            Type::SelfType => write!(f, "{}", conventions::SELF_TYPE_NAME),
            Type::Class(class) => write!(f, "{}", class.python_str()),
            Type::Interface(iface) => write!(f, "{}", iface.python_str()),
            Type::Function(function) => write!(f, "{}", function.qualname()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Type::optional(Type::Tensor).to_string(), "Optional[Tensor]");
        assert_eq!(Type::Tuple(vec![Type::Int, Type::Str]).to_string(), "Tuple[int, str]");
        assert_eq!(Type::list(Type::Float).to_string(), "List[float]");
        assert_eq!(Type::NoneType.to_string(), "None");
    }

    #[test]
    fn test_any_is_top() {
        assert!(Type::Int.is_subtype_of(&Type::Any));
        assert!(Type::list(Type::Str).is_subtype_of(&Type::Any));
        assert!(!Type::Any.is_subtype_of(&Type::Int));
    }

    #[test]
    fn test_optional_accepts_none_and_element() {
        let opt = Type::optional(Type::Tensor);
        assert!(Type::NoneType.is_subtype_of(&opt));
        assert!(Type::Tensor.is_subtype_of(&opt));
        assert!(!opt.is_subtype_of(&Type::Tensor));
        assert!(Type::optional(Type::Tensor).is_subtype_of(&Type::optional(Type::optional(Type::Tensor))));
    }

    #[test]
    fn test_list_is_invariant() {
        let narrow = Type::list(Type::Int);
        let wide = Type::list(Type::optional(Type::Int));
        assert!(!narrow.is_subtype_of(&wide));
        assert!(narrow.is_subtype_of(&Type::list(Type::Int)));
    }

    #[test]
    fn test_tuple_is_covariant_with_equal_arity() {
        let narrow = Type::Tuple(vec![Type::Int, Type::NoneType]);
        let wide = Type::Tuple(vec![Type::Int, Type::optional(Type::Float)]);
        assert!(narrow.is_subtype_of(&wide));

        let mut why = SubtypeDiagnostics::new();
        assert!(!narrow.is_subtype_of_ext(&Type::Tuple(vec![Type::Int]), Some(&mut why)));
        assert_eq!(why.len(), 1);
        assert!(why.reasons()[0].contains("has 2 elements"));
    }

    #[test]
    fn test_int_is_not_float() {
        assert!(!Type::Int.is_subtype_of(&Type::Float));
        assert_ne!(Type::Int, Type::Float);
    }
}
