//! Constant values stored in a class type's constant table.

use std::fmt;

use super::Type;

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq)]
pub enum IValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<IValue>),
}

impl IValue {
    /// The static type of this value.
    pub fn ty(&self) -> Type {
        match self {
            IValue::None => Type::NoneType,
            IValue::Bool(_) => Type::Bool,
            IValue::Int(_) => Type::Int,
            IValue::Float(_) => Type::Float,
            IValue::Str(_) => Type::Str,
            IValue::Tuple(elems) => Type::Tuple(elems.iter().map(IValue::ty).collect()),
        }
    }
}

impl fmt::Display for IValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IValue::None => write!(f, "None"),
            IValue::Bool(true) => write!(f, "True"),
            IValue::Bool(false) => write!(f, "False"),
            IValue::Int(v) => write!(f, "{}", v),
            // Keep a trailing `.0` so floats never read back as ints.
            IValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            IValue::Float(v) => write!(f, "{}", v),
            IValue::Str(s) => write!(f, "{:?}", s),
            IValue::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                if elems.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_script_spelling() {
        assert_eq!(IValue::None.to_string(), "None");
        assert_eq!(IValue::Bool(true).to_string(), "True");
        assert_eq!(IValue::Float(2.0).to_string(), "2.0");
        assert_eq!(IValue::Float(0.5).to_string(), "0.5");
        assert_eq!(IValue::Str("hi".to_string()).to_string(), "\"hi\"");
        assert_eq!(IValue::Tuple(vec![IValue::Int(1)]).to_string(), "(1,)");
        assert_eq!(
            IValue::Tuple(vec![IValue::Int(1), IValue::Bool(false)]).to_string(),
            "(1, False)"
        );
    }

    #[test]
    fn test_tuple_type_is_element_wise() {
        let v = IValue::Tuple(vec![IValue::Int(1), IValue::Str("a".to_string())]);
        assert_eq!(v.ty(), Type::Tuple(vec![Type::Int, Type::Str]));
    }
}
