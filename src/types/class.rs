//! Class types: named structural types with attribute slots, constant slots and methods.
//!
//! A [`ClassType`] is built incrementally while a class declaration is processed, then wrapped in `Rc`
//! and registered. Attributes and constants share one namespace and are addressed by *slot*, the
//! position in their table at the time of the query.
//!
//! ## Slots
//!
//! Slots are plain indices. [`ClassType::remove_attribute`] and [`ClassType::remove_constant`] shift every
//! later slot down by one, so a slot obtained before a removal must not be reused after it.
//!
//! ## Module classes
//!
//! A class created with `is_module = true` additionally records, per attribute slot, whether the attribute
//! is a learnable parameter. Parameters must be stored as `Tensor`, `Optional[Tensor]` or `None`.

use std::rc::Rc;

use classtype_core::QualifiedName;
use classtype_core::lang::conventions::ANONYMOUS_CLASS_NAME;

use super::errors::{ClassTypeError, FieldKind};
use super::interface::{InterfaceType, check_required_methods};
use super::{Function, IValue, SubtypeDiagnostics, Type};
use crate::registry::{CompilationUnit, CompilationUnitHandle};

#[derive(Debug)]
pub struct ClassType {
    name: Option<QualifiedName>,
    compilation_unit: CompilationUnitHandle,
    attribute_names: Vec<String>,
    attribute_types: Vec<Type>,
    /// `Some` exactly when the class is a module; one flag per attribute slot.
    parameter_slots: Option<Vec<bool>>,
    constant_names: Vec<String>,
    constant_values: Vec<IValue>,
    methods: Vec<Rc<Function>>,
}

impl ClassType {
    /// Create an empty class type. The module flag is fixed for the lifetime of the type.
    pub fn create(name: Option<QualifiedName>, compilation_unit: CompilationUnitHandle, is_module: bool) -> Self {
        Self {
            name,
            compilation_unit,
            attribute_names: Vec::new(),
            attribute_types: Vec::new(),
            parameter_slots: is_module.then(Vec::new),
            constant_names: Vec::new(),
            constant_values: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&QualifiedName> {
        self.name.as_ref()
    }

    /// Dotted name, or `None` for anonymous classes.
    pub fn qualified_name(&self) -> Option<String> {
        self.name.as_ref().map(QualifiedName::qualified_name)
    }

    /// Name used in diagnostics.
    pub fn python_str(&self) -> String {
        match &self.name {
            Some(name) => name.qualified_name(),
            None => ANONYMOUS_CLASS_NAME.to_string(),
        }
    }

    pub fn is_module(&self) -> bool {
        self.parameter_slots.is_some()
    }

    /// The compilation unit this class belongs to.
    ///
    /// ## Panics
    /// - If the unit has already been dropped.
    pub fn compilation_unit(&self) -> Rc<CompilationUnit> {
        self.compilation_unit.upgrade()
    }

    pub fn compilation_unit_handle(&self) -> &CompilationUnitHandle {
        &self.compilation_unit
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    pub fn num_attributes(&self) -> usize {
        self.assert_attribute_tables();
        self.attribute_names.len()
    }

    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    pub fn attribute_types(&self) -> &[Type] {
        &self.attribute_types
    }

    /// Add an attribute (or, on module classes, a parameter) and return its slot.
    ///
    /// ## Errors
    /// - `NameConflict` if an attribute or constant already uses `name`.
    /// - `TypeRejected` if `ty` is `Any`, or a parameter is not `Tensor`, `Optional[Tensor]` or `None`.
    /// - `InvariantViolation` if `is_parameter` is set on a non-module class.
    pub fn add_attribute(&mut self, name: &str, ty: Type, is_parameter: bool) -> Result<usize, ClassTypeError> {
        let what = if is_parameter {
            FieldKind::Parameter
        } else {
            FieldKind::Attribute
        };
        self.check_not_exist(name, what)?;
        self.check_storable(name, &ty, what)?;
        if is_parameter {
            if !self.is_module() {
                return Err(ClassTypeError::InvariantViolation(format!(
                    "adding parameter '{}' to {}, which is not a module",
                    name,
                    self.python_str()
                )));
            }
            if !is_parameter_storage(&ty) {
                return Err(ClassTypeError::TypeRejected {
                    what,
                    name: name.to_string(),
                    owner: self.python_str(),
                    ty: ty.to_string(),
                    reason: "expecting parameter to have either None, Tensor or Optional[Tensor] type".to_string(),
                });
            }
        }

        let slot = self.attribute_names.len();
        self.attribute_names.push(name.to_string());
        self.attribute_types.push(ty);
        if let Some(parameter_slots) = &mut self.parameter_slots {
            parameter_slots.push(is_parameter);
        }
        tracing::debug!(class = %self.python_str(), %what, name, slot, "added attribute");
        Ok(slot)
    }

    /// Add the attribute, or check that an existing attribute of that name matches.
    ///
    /// An existing attribute matches when `ty` is a subtype of its type and its parameter flag agrees.
    pub fn add_or_check_attribute(
        &mut self,
        name: &str,
        ty: Type,
        is_parameter: bool,
    ) -> Result<usize, ClassTypeError> {
        let Some(slot) = self.find_attribute_slot(name) else {
            return self.add_attribute(name, ty, is_parameter);
        };
        let what = if is_parameter {
            FieldKind::Parameter
        } else {
            FieldKind::Attribute
        };
        let existing = &self.attribute_types[slot];
        if !ty.is_subtype_of(existing) {
            return Err(ClassTypeError::TypeRejected {
                what,
                name: name.to_string(),
                owner: self.python_str(),
                ty: ty.to_string(),
                reason: format!("it already exists with type {}", existing),
            });
        }
        let existing_is_parameter = self.is_parameter(slot)?;
        if existing_is_parameter != is_parameter {
            let existing_kind = if existing_is_parameter {
                FieldKind::Parameter
            } else {
                FieldKind::Attribute
            };
            return Err(ClassTypeError::NameConflict {
                what,
                name: name.to_string(),
                owner: self.python_str(),
                existing: format!("it already exists as a {}", existing_kind),
            });
        }
        Ok(slot)
    }

    /// Remove an attribute by name.
    ///
    /// Every attribute slot after the removed one shifts down by one; callers must drop any slot numbers
    /// they obtained earlier.
    pub fn remove_attribute(&mut self, name: &str) -> Result<(), ClassTypeError> {
        let slot = self.get_attribute_slot(name)?;
        self.attribute_names.remove(slot);
        self.attribute_types.remove(slot);
        if let Some(parameter_slots) = &mut self.parameter_slots {
            parameter_slots.remove(slot);
        }
        tracing::debug!(class = %self.python_str(), name, slot, "removed attribute");
        Ok(())
    }

    pub fn find_attribute_slot(&self, name: &str) -> Option<usize> {
        self.attribute_names.iter().position(|n| n == name)
    }

    pub fn get_attribute_slot(&self, name: &str) -> Result<usize, ClassTypeError> {
        self.find_attribute_slot(name).ok_or_else(|| ClassTypeError::NotFound {
            owner: self.python_str(),
            what: FieldKind::Attribute,
            name: name.to_string(),
        })
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.find_attribute_slot(name).is_some()
    }

    /// Type of the attribute called `name`, if any.
    pub fn find_attribute(&self, name: &str) -> Option<&Type> {
        self.find_attribute_slot(name).map(|slot| &self.attribute_types[slot])
    }

    pub fn get_attribute(&self, name: &str) -> Result<&Type, ClassTypeError> {
        let slot = self.get_attribute_slot(name)?;
        Ok(&self.attribute_types[slot])
    }

    pub fn attribute_type(&self, slot: usize) -> Result<&Type, ClassTypeError> {
        self.attribute_types
            .get(slot)
            .ok_or_else(|| self.slot_error(FieldKind::Attribute, slot))
    }

    pub fn attribute_name(&self, slot: usize) -> Result<&str, ClassTypeError> {
        self.attribute_names
            .get(slot)
            .map(String::as_str)
            .ok_or_else(|| self.slot_error(FieldKind::Attribute, slot))
    }

    /// Whether the attribute in `slot` is a parameter. Always `false` on non-module classes.
    pub fn is_parameter(&self, slot: usize) -> Result<bool, ClassTypeError> {
        if slot >= self.num_attributes() {
            return Err(self.slot_error(FieldKind::Attribute, slot));
        }
        Ok(self.parameter_slots.as_ref().is_some_and(|p| p[slot]))
    }

    // ========================================================================
    // Constants
    // ========================================================================

    pub fn num_constants(&self) -> usize {
        self.assert_constant_tables();
        self.constant_names.len()
    }

    pub fn constant_names(&self) -> &[String] {
        &self.constant_names
    }

    pub fn constant_values(&self) -> &[IValue] {
        &self.constant_values
    }

    /// Add a constant and return its slot.
    ///
    /// ## Errors
    /// - `NameConflict` if an attribute or constant already uses `name`.
    pub fn add_constant(&mut self, name: &str, value: IValue) -> Result<usize, ClassTypeError> {
        self.check_not_exist(name, FieldKind::Constant)?;
        let slot = self.constant_names.len();
        self.constant_names.push(name.to_string());
        self.constant_values.push(value);
        tracing::debug!(class = %self.python_str(), name, slot, "added constant");
        Ok(slot)
    }

    /// Remove a constant by name. Later constant slots shift down by one.
    pub fn remove_constant(&mut self, name: &str) -> Result<(), ClassTypeError> {
        let slot = self.get_constant_slot(name)?;
        self.constant_names.remove(slot);
        self.constant_values.remove(slot);
        tracing::debug!(class = %self.python_str(), name, slot, "removed constant");
        Ok(())
    }

    pub fn find_constant_slot(&self, name: &str) -> Option<usize> {
        self.assert_constant_tables();
        self.constant_names.iter().position(|n| n == name)
    }

    pub fn get_constant_slot(&self, name: &str) -> Result<usize, ClassTypeError> {
        self.find_constant_slot(name).ok_or_else(|| ClassTypeError::NotFound {
            owner: self.python_str(),
            what: FieldKind::Constant,
            name: name.to_string(),
        })
    }

    pub fn has_constant(&self, name: &str) -> bool {
        self.find_constant_slot(name).is_some()
    }

    /// Look up a constant without failing.
    pub fn find_constant(&self, name: &str) -> Option<&IValue> {
        self.find_constant_slot(name).map(|slot| &self.constant_values[slot])
    }

    pub fn get_constant(&self, name: &str) -> Result<&IValue, ClassTypeError> {
        let slot = self.get_constant_slot(name)?;
        Ok(&self.constant_values[slot])
    }

    pub fn get_constant_at(&self, slot: usize) -> Result<&IValue, ClassTypeError> {
        self.assert_constant_tables();
        self.constant_values
            .get(slot)
            .ok_or_else(|| self.slot_error(FieldKind::Constant, slot))
    }

    pub fn constant_name(&self, slot: usize) -> Result<&str, ClassTypeError> {
        self.constant_names
            .get(slot)
            .map(String::as_str)
            .ok_or_else(|| self.slot_error(FieldKind::Constant, slot))
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Methods in insertion order.
    pub fn methods(&self) -> &[Rc<Function>] {
        &self.methods
    }

    pub fn add_method(&mut self, method: Rc<Function>) -> Result<(), ClassTypeError> {
        self.check_method_not_exist(method.name())?;
        tracing::debug!(class = %self.python_str(), method = method.name(), "added method");
        self.methods.push(method);
        Ok(())
    }

    pub fn get_method(&self, name: &str) -> Option<&Rc<Function>> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Fails with the same `NameConflict` that [`ClassType::add_method`] would report for `name`.
    ///
    /// Lets a caller reject a duplicate before it creates the function body.
    pub fn check_method_not_exist(&self, name: &str) -> Result<(), ClassTypeError> {
        if self.get_method(name).is_some() {
            return Err(ClassTypeError::NameConflict {
                what: FieldKind::Method,
                name: name.to_string(),
                owner: self.python_str(),
                existing: "a method of the same name already exists".to_string(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Refinement
    // ========================================================================

    /// Build a new class type with the same name and compilation unit, whose attribute types are replaced
    /// slot by slot with `refined_slots`.
    ///
    /// The result keeps the module flag, but every attribute is re-added as a plain attribute: parameter
    /// flags are not carried over and must be re-marked by the caller. Constants are not copied. Methods are
    /// shared with `self` without re-validation.
    ///
    /// ## Panics
    /// - If `refined_slots` does not have one entry per attribute.
    /// - If a replacement type is not a subtype of the type it replaces.
    #[tracing::instrument(skip_all, fields(class = %self.python_str(), slots = refined_slots.len()))]
    pub fn refine(&self, refined_slots: &[Type]) -> ClassType {
        assert_eq!(
            self.num_attributes(),
            refined_slots.len(),
            "INVARIANT: refine expects one type per attribute slot of {}",
            self.python_str()
        );

        let mut refined = ClassType::create(self.name.clone(), self.compilation_unit.clone(), self.is_module());
        for ((name, current), replacement) in self
            .attribute_names
            .iter()
            .zip(&self.attribute_types)
            .zip(refined_slots)
        {
            assert!(
                replacement.is_subtype_of(current),
                "INVARIANT: refined type {} of attribute '{}' is not a subtype of {}",
                replacement,
                name,
                current
            );
            refined
                .add_attribute(name, replacement.clone(), false)
                .expect("INVARIANT: attributes of an existing class are unique and storable");
        }
        // Names are already unique here, so the table is copied as is.
        refined.methods = self.methods.clone();
        refined
    }

    // ========================================================================
    // Subtyping
    // ========================================================================

    pub fn is_subtype_of(self: &Rc<Self>, rhs: &Type) -> bool {
        self.is_subtype_of_ext(rhs, None)
    }

    /// Whether this class can be used where `rhs` is expected.
    ///
    /// Interface targets are checked structurally (see [`ClassType::satisfies_interface`]); every other
    /// target goes through the generic rule in [`Type::is_subtype_of_ext`].
    pub fn is_subtype_of_ext(self: &Rc<Self>, rhs: &Type, why_not: Option<&mut SubtypeDiagnostics>) -> bool {
        match rhs {
            Type::Interface(iface) => self.satisfies_interface(iface, why_not),
            _ => Type::Class(Rc::clone(self)).base_is_subtype_of(rhs, why_not),
        }
    }

    /// Structural check against an interface.
    ///
    /// A non-module class never satisfies a module interface. Otherwise every required method must be
    /// present, matched by name, with a signature that is a subtype of the required one (the receiver is
    /// not compared). Extra methods are ignored.
    pub fn satisfies_interface(&self, iface: &InterfaceType, mut why_not: Option<&mut SubtypeDiagnostics>) -> bool {
        if !self.is_module() && iface.is_module() {
            if let Some(why_not) = why_not.as_deref_mut() {
                why_not.push(format!(
                    "Class '{}' is not a module, but required interface '{}' is module-only; only module classes can be subtypes of a module interface",
                    self.python_str(),
                    iface.python_str()
                ));
            }
            return false;
        }
        let satisfied = check_required_methods(
            "Class",
            &self.python_str(),
            iface,
            |name| self.get_method(name).map(|m| m.schema()),
            why_not,
        );
        tracing::trace!(
            class = %self.python_str(),
            interface = %iface.python_str(),
            satisfied,
            "checked interface conformance"
        );
        satisfied
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn check_not_exist(&self, name: &str, what: FieldKind) -> Result<(), ClassTypeError> {
        if let Some(slot) = self.find_constant_slot(name) {
            return Err(ClassTypeError::NameConflict {
                what,
                name: name.to_string(),
                owner: self.python_str(),
                existing: format!(
                    "a constant field of the same name already exists with value {}",
                    self.constant_values[slot]
                ),
            });
        }
        if let Some(slot) = self.find_attribute_slot(name) {
            return Err(ClassTypeError::NameConflict {
                what,
                name: name.to_string(),
                owner: self.python_str(),
                existing: format!(
                    "an attribute field of the same name already exists with type {}",
                    self.attribute_types[slot]
                ),
            });
        }
        Ok(())
    }

    fn check_storable(&self, name: &str, ty: &Type, what: FieldKind) -> Result<(), ClassTypeError> {
        if contains_any(ty) {
            return Err(ClassTypeError::TypeRejected {
                what,
                name: name.to_string(),
                owner: self.python_str(),
                ty: ty.to_string(),
                reason: "Any is not a valid attribute type; use a concrete type".to_string(),
            });
        }
        Ok(())
    }

    fn slot_error(&self, what: FieldKind, slot: usize) -> ClassTypeError {
        ClassTypeError::IndexOutOfRange {
            owner: self.python_str(),
            what,
            slot,
        }
    }

    fn assert_attribute_tables(&self) {
        assert_eq!(
            self.attribute_names.len(),
            self.attribute_types.len(),
            "INVARIANT: attribute name and type tables of {} diverged",
            self.python_str()
        );
        if let Some(parameter_slots) = &self.parameter_slots {
            assert_eq!(
                parameter_slots.len(),
                self.attribute_names.len(),
                "INVARIANT: parameter table of {} diverged from its attributes",
                self.python_str()
            );
        }
    }

    fn assert_constant_tables(&self) {
        assert_eq!(
            self.constant_names.len(),
            self.constant_values.len(),
            "INVARIANT: constant name and value tables of {} diverged",
            self.python_str()
        );
    }
}

/// `Tensor`, `Optional[Tensor]` or `None`.
fn is_parameter_storage(ty: &Type) -> bool {
    matches!(ty, Type::Tensor | Type::NoneType) || matches!(ty.optional_elem(), Some(Type::Tensor))
}

/// `Any` anywhere inside a structural type. Named types are opaque here.
fn contains_any(ty: &Type) -> bool {
    match ty {
        Type::Any => true,
        Type::Optional(elem) | Type::List(elem) => contains_any(elem),
        Type::Tuple(elems) => elems.iter().any(contains_any),
        _ => false,
    }
}
