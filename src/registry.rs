//! Compilation units: the owners of method bodies and named types.
//!
//! A [`CompilationUnit`] is always handled through `Rc`. Class types keep a [`CompilationUnitHandle`]
//! (a weak pointer) back to the unit that created them, so the unit and its types never form an
//! ownership cycle. Resolving a handle after the unit is gone is a compiler bug and panics.
//!
//! ## Notes
//! - Registration goes through `RefCell`; a unit is built and queried from a single thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use miette::Diagnostic;
use thiserror::Error;

use classtype_core::QualifiedName;

use crate::types::{Argument, ClassType, Function, InterfaceType, Type};

/// Errors raised while registering functions or types with a compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RegistryError {
    #[error("function '{0}' is already defined in this compilation unit")]
    #[diagnostic(code(classtype::registry::duplicate_function))]
    DuplicateFunction(String),

    #[error("type '{0}' is already defined in this compilation unit")]
    #[diagnostic(code(classtype::registry::duplicate_type))]
    DuplicateType(String),

    #[error("cannot register an unnamed {0} type")]
    #[diagnostic(
        code(classtype::registry::unnamed_type),
        help("only classes, interfaces and functions with a qualified name can be registered")
    )]
    UnnamedType(String),
}

/// Owner of method bodies and named types.
#[derive(Debug, Default)]
pub struct CompilationUnit {
    functions: RefCell<Vec<Rc<Function>>>,
    types: RefCell<Vec<Type>>,
}

impl CompilationUnit {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// A weak handle for class types created in this unit.
    pub fn handle(self: &Rc<Self>) -> CompilationUnitHandle {
        CompilationUnitHandle(Rc::downgrade(self))
    }

    /// Define a new function (typically a method body) owned by this unit.
    pub fn create_function(
        &self,
        qualname: QualifiedName,
        arguments: Vec<Argument>,
        returns: Type,
    ) -> Result<Rc<Function>, RegistryError> {
        if self.find_function(&qualname).is_some() {
            return Err(RegistryError::DuplicateFunction(qualname.qualified_name()));
        }
        let function = Rc::new(Function::new(qualname, arguments, returns));
        self.functions.borrow_mut().push(Rc::clone(&function));
        tracing::trace!(function = %function.qualname(), "registered function");
        Ok(function)
    }

    pub fn find_function(&self, qualname: &QualifiedName) -> Option<Rc<Function>> {
        self.functions
            .borrow()
            .iter()
            .find(|f| f.qualname() == qualname)
            .cloned()
    }

    pub fn functions(&self) -> Vec<Rc<Function>> {
        self.functions.borrow().clone()
    }

    /// Register a finished named type. Names are unique across all kinds.
    pub fn register_type(&self, ty: Type) -> Result<(), RegistryError> {
        let Some(name) = ty.name().cloned() else {
            return Err(RegistryError::UnnamedType(format!("{:?}", ty.kind()).to_lowercase()));
        };
        if self.get_type(&name).is_some() {
            return Err(RegistryError::DuplicateType(name.qualified_name()));
        }
        tracing::trace!(name = %name, kind = ?ty.kind(), "registered type");
        self.types.borrow_mut().push(ty);
        Ok(())
    }

    pub fn get_type(&self, name: &QualifiedName) -> Option<Type> {
        self.types
            .borrow()
            .iter()
            .find(|t| t.name() == Some(name))
            .cloned()
    }

    pub fn get_class(&self, name: &QualifiedName) -> Option<Rc<ClassType>> {
        match self.get_type(name)? {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn get_interface(&self, name: &QualifiedName) -> Option<Rc<InterfaceType>> {
        match self.get_type(name)? {
            Type::Interface(iface) => Some(iface),
            _ => None,
        }
    }

    /// Registered class types, in registration order.
    pub fn classes(&self) -> Vec<Rc<ClassType>> {
        self.types
            .borrow()
            .iter()
            .filter_map(|t| match t {
                Type::Class(class) => Some(Rc::clone(class)),
                _ => None,
            })
            .collect()
    }

    /// Registered interface types, in registration order.
    pub fn interfaces(&self) -> Vec<Rc<InterfaceType>> {
        self.types
            .borrow()
            .iter()
            .filter_map(|t| match t {
                Type::Interface(iface) => Some(Rc::clone(iface)),
                _ => None,
            })
            .collect()
    }
}

/// Non-owning back-reference from a type to its compilation unit.
#[derive(Clone)]
pub struct CompilationUnitHandle(Weak<CompilationUnit>);

impl CompilationUnitHandle {
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    /// Resolve the handle.
    ///
    /// ## Panics
    /// - If the compilation unit has been dropped. A type outliving its unit is a use-after-teardown bug.
    pub fn upgrade(&self) -> Rc<CompilationUnit> {
        self.0
            .upgrade()
            .expect("INVARIANT: compilation unit was dropped while a type still refers to it")
    }

    /// Whether both handles point at the same unit.
    pub fn same_unit(&self, other: &CompilationUnitHandle) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CompilationUnitHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilationUnitHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qn(s: &str) -> QualifiedName {
        s.parse().unwrap()
    }

    #[test]
    fn test_duplicate_function_rejected() {
        let cu = CompilationUnit::new();
        cu.create_function(qn("Point.dist"), vec![], Type::Float).unwrap();
        let err = cu.create_function(qn("Point.dist"), vec![], Type::Int).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateFunction("Point.dist".to_string()));
        assert_eq!(cu.functions().len(), 1);
    }

    #[test]
    fn test_register_and_lookup_types() {
        let cu = CompilationUnit::new();
        let class = ClassType::create(Some(qn("Point")), cu.handle(), false);
        cu.register_type(Type::Class(Rc::new(class))).unwrap();
        cu.register_type(Type::Interface(Rc::new(InterfaceType::new(qn("Shaped"), false))))
            .unwrap();

        assert!(cu.get_class(&qn("Point")).is_some());
        assert!(cu.get_class(&qn("Shaped")).is_none());
        assert!(cu.get_interface(&qn("Shaped")).is_some());
        assert_eq!(cu.classes().len(), 1);
        assert_eq!(cu.interfaces().len(), 1);
    }

    #[test]
    fn test_names_are_unique_across_kinds() {
        let cu = CompilationUnit::new();
        cu.register_type(Type::Interface(Rc::new(InterfaceType::new(qn("Thing"), false))))
            .unwrap();
        let class = ClassType::create(Some(qn("Thing")), cu.handle(), false);
        let err = cu.register_type(Type::Class(Rc::new(class))).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateType("Thing".to_string()));
    }

    #[test]
    fn test_unnamed_types_rejected() {
        let cu = CompilationUnit::new();
        assert!(matches!(
            cu.register_type(Type::Int),
            Err(RegistryError::UnnamedType(_))
        ));
        let anon = ClassType::create(None, cu.handle(), false);
        assert!(matches!(
            cu.register_type(Type::Class(Rc::new(anon))),
            Err(RegistryError::UnnamedType(_))
        ));
    }

    #[test]
    fn test_handle_liveness() {
        let cu = CompilationUnit::new();
        let handle = cu.handle();
        assert!(handle.is_alive());
        assert!(handle.same_unit(&cu.handle()));
        drop(cu);
        assert!(!handle.is_alive());
    }

    #[test]
    #[should_panic(expected = "INVARIANT")]
    fn test_dangling_handle_is_fatal() {
        let handle = CompilationUnit::new().handle();
        let _ = handle.upgrade();
    }
}
