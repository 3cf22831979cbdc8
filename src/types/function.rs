//! Compiled methods as seen by the type layer.
//!
//! Method bodies live in the owning [`CompilationUnit`](crate::registry::CompilationUnit); class types only
//! hold shared references to them and look at their name and signature.

use std::fmt;

use classtype_core::QualifiedName;

use super::{Argument, FunctionSchema, Type};

/// A function or method registered with a compilation unit.
#[derive(Debug)]
pub struct Function {
    qualname: QualifiedName,
    schema: FunctionSchema,
}

impl Function {
    /// The schema name is always the last atom of `qualname`.
    pub fn new(qualname: QualifiedName, arguments: Vec<Argument>, returns: Type) -> Self {
        let schema = FunctionSchema::new(qualname.name(), arguments, returns);
        Self { qualname, schema }
    }

    /// Unqualified name, used for method lookup on class types.
    pub fn name(&self) -> &str {
        self.qualname.name()
    }

    pub fn qualname(&self) -> &QualifiedName {
        &self.qualname
    }

    pub fn schema(&self) -> &FunctionSchema {
        &self.schema
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualname)
    }
}
