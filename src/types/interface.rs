//! Interface types: a named set of required method signatures.

use classtype_core::QualifiedName;

use super::errors::{ClassTypeError, FieldKind};
use super::{FunctionSchema, SubtypeDiagnostics};

/// A structural interface. A class (or another interface) satisfies it by providing a compatible method
/// for every required signature.
#[derive(Debug, Clone)]
pub struct InterfaceType {
    name: QualifiedName,
    methods: Vec<FunctionSchema>,
    is_module: bool,
}

impl InterfaceType {
    /// Create an interface with no required methods. `is_module` restricts implementors to module classes.
    pub fn new(name: QualifiedName, is_module: bool) -> Self {
        Self {
            name,
            methods: Vec::new(),
            is_module,
        }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn python_str(&self) -> String {
        self.name.qualified_name()
    }

    pub fn is_module(&self) -> bool {
        self.is_module
    }

    /// Required method signatures, in declaration order.
    pub fn methods(&self) -> &[FunctionSchema] {
        &self.methods
    }

    pub fn add_method(&mut self, schema: FunctionSchema) -> Result<(), ClassTypeError> {
        if self.get_method(schema.name()).is_some() {
            return Err(ClassTypeError::NameConflict {
                what: FieldKind::Method,
                name: schema.name().to_string(),
                owner: self.python_str(),
                existing: "a method of the same name already exists".to_string(),
            });
        }
        self.methods.push(schema);
        Ok(())
    }

    pub fn get_method(&self, name: &str) -> Option<&FunctionSchema> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Whether this interface provides everything `rhs` requires.
    pub fn is_subtype_of_interface(&self, rhs: &InterfaceType, mut why_not: Option<&mut SubtypeDiagnostics>) -> bool {
        if !self.is_module && rhs.is_module {
            if let Some(why_not) = why_not.as_deref_mut() {
                why_not.push(format!(
                    "Interface '{}' is not a module interface, but required interface '{}' is module-only",
                    self.python_str(),
                    rhs.python_str()
                ));
            }
            return false;
        }
        check_required_methods("Interface", &self.python_str(), rhs, |name| self.get_method(name), why_not)
    }
}

/// Match every method `iface` requires against the methods an implementor provides.
///
/// `lookup` resolves a method name on the implementor. Failures are appended to `why_not` in requirement
/// order; without a sink (or with a first-only sink) the check stops at the first failure.
pub(crate) fn check_required_methods<'a>(
    owner_kind: &str,
    owner: &str,
    iface: &InterfaceType,
    lookup: impl Fn(&str) -> Option<&'a FunctionSchema>,
    mut why_not: Option<&mut SubtypeDiagnostics>,
) -> bool {
    let keep_going = why_not.as_deref().is_some_and(SubtypeDiagnostics::keep_going);
    let mut satisfied = true;

    for required in iface.methods() {
        let Some(found) = lookup(required.name()) else {
            satisfied = false;
            if let Some(why_not) = why_not.as_deref_mut() {
                why_not.push(format!(
                    "{owner_kind} '{owner}' is missing method `{}` required by interface '{}'",
                    required.name(),
                    iface.python_str()
                ));
            }
            if keep_going {
                continue;
            }
            break;
        };

        if found.is_subtype_of(required, true, why_not.as_deref_mut()) {
            continue;
        }
        satisfied = false;
        if let Some(why_not) = why_not.as_deref_mut() {
            why_not.push(format!(
                "Method `{}` on {} '{owner}' (1) is not compatible with interface '{}' (2)\n  (1) {found}\n  (2) {required}",
                required.name(),
                owner_kind.to_lowercase(),
                iface.python_str()
            ));
        }
        if !keep_going {
            break;
        }
    }
    satisfied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Argument, Type};

    fn iface(name: &str, is_module: bool, methods: &[(&str, Type)]) -> InterfaceType {
        let mut i = InterfaceType::new(name.parse().unwrap(), is_module);
        for (m, ret) in methods {
            i.add_method(FunctionSchema::new(
                *m,
                vec![Argument::new("self", Type::SelfType)],
                ret.clone(),
            ))
            .unwrap();
        }
        i
    }

    #[test]
    fn test_duplicate_requirement_rejected() {
        let mut i = iface("Shaped", false, &[("area", Type::Float)]);
        let err = i
            .add_method(FunctionSchema::new("area", vec![], Type::Int))
            .unwrap_err();
        assert!(matches!(err, ClassTypeError::NameConflict { what: FieldKind::Method, .. }));
        assert_eq!(i.methods().len(), 1);
    }

    #[test]
    fn test_wider_interface_is_subtype_of_narrower() {
        let wide = iface("ShapedNamed", false, &[("area", Type::Float), ("name", Type::Str)]);
        let narrow = iface("Shaped", false, &[("area", Type::Float)]);
        assert!(wide.is_subtype_of_interface(&narrow, None));
        assert!(!narrow.is_subtype_of_interface(&wide, None));
    }

    #[test]
    fn test_plain_interface_not_subtype_of_module_interface() {
        let plain = iface("Fwd", false, &[]);
        let module = iface("ModFwd", true, &[]);
        let mut why = SubtypeDiagnostics::new();
        assert!(!plain.is_subtype_of_interface(&module, Some(&mut why)));
        assert!(why.reasons()[0].contains("module-only"));
        assert!(module.is_subtype_of_interface(&plain, None));
    }
}
