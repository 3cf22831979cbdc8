//! Loader for JSON declaration files.
//!
//! A declaration file describes interfaces, classes and assignability checks:
//!
//! ```json
//! {
//!   "interfaces": [
//!     { "name": "Shaped", "methods": [{ "name": "area", "args": [], "returns": "float" }] }
//!   ],
//!   "classes": [
//!     {
//!       "name": "Square",
//!       "attributes": [{ "name": "side", "type": "float" }],
//!       "constants": [{ "name": "SIDES", "value": 4 }],
//!       "methods": [{ "name": "area", "returns": "float" }]
//!     }
//!   ],
//!   "checks": [{ "type": "Square", "expected": "Shaped" }]
//! }
//! ```
//!
//! ## Notes
//! - Declarations are processed in file order: interfaces first, then classes. A type expression may only
//!   name types declared before it.
//! - Method `args` exclude the receiver; every declared method gets a leading `self: Self` argument.
//! - Constant values map from JSON: `null`, booleans, integers, floats, strings and arrays (as tuples).

use std::rc::Rc;

use miette::{Diagnostic, SourceSpan};
use serde_json::{Map, Value};
use thiserror::Error;

use classtype_core::QualifiedName;
use classtype_core::lang::conventions::SELF_ARG_NAME;

use super::type_expr::{TypeExprError, parse_type};
use crate::config::CheckConfig;
use crate::registry::{CompilationUnit, RegistryError};
use crate::types::{Argument, ClassType, ClassTypeError, FunctionSchema, IValue, InterfaceType, SubtypeDiagnostics, Type};

/// Errors raised while loading a declaration file.
#[derive(Debug, Error, Diagnostic)]
pub enum DeclError {
    #[error("invalid JSON: {message}")]
    #[diagnostic(code(classtype::decl::json))]
    Json {
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{path}: {message}")]
    #[diagnostic(code(classtype::decl::shape))]
    Shape { path: String, message: String },

    #[error("{path}: invalid type expression")]
    #[diagnostic(code(classtype::decl::type_expr))]
    TypeExpr {
        path: String,
        #[source]
        #[diagnostic_source]
        source: TypeExprError,
    },

    #[error("{path}: '{name}' is not a valid qualified name")]
    #[diagnostic(code(classtype::decl::name))]
    Name { path: String, name: String },

    #[error("{path}: cannot build class type")]
    #[diagnostic(code(classtype::decl::class))]
    Class {
        path: String,
        #[source]
        #[diagnostic_source]
        source: ClassTypeError,
    },

    #[error("{path}: cannot register declaration")]
    #[diagnostic(code(classtype::decl::registry))]
    Registry {
        path: String,
        #[source]
        #[diagnostic_source]
        source: RegistryError,
    },
}

/// One `checks` entry: is `ty` usable where `expected` is required?
#[derive(Debug, Clone)]
pub struct Check {
    pub ty: Type,
    pub expected: Type,
}

/// Result of running one [`Check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub ty: String,
    pub expected: String,
    pub passed: bool,
    pub reasons: Vec<String>,
}

/// Everything a declaration file defines.
#[derive(Debug)]
pub struct Declarations {
    unit: Rc<CompilationUnit>,
    checks: Vec<Check>,
}

impl Declarations {
    pub fn unit(&self) -> &Rc<CompilationUnit> {
        &self.unit
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Run every check in file order.
    #[tracing::instrument(skip_all, fields(checks = self.checks.len()))]
    pub fn run_checks(&self, config: &CheckConfig) -> Vec<CheckOutcome> {
        self.checks
            .iter()
            .map(|check| {
                let mut why_not = if config.collect_all {
                    SubtypeDiagnostics::new()
                } else {
                    SubtypeDiagnostics::first_only()
                };
                let passed = check.ty.is_subtype_of_ext(&check.expected, Some(&mut why_not));
                tracing::debug!(ty = %check.ty, expected = %check.expected, passed, "ran check");
                CheckOutcome {
                    ty: check.ty.to_string(),
                    expected: check.expected.to_string(),
                    passed,
                    reasons: why_not.into_reasons(),
                }
            })
            .collect()
    }
}

/// Parse and load a declaration file.
///
/// ## Errors
/// - The first problem found; loading stops there.
#[tracing::instrument(skip_all, fields(bytes = src.len()))]
pub fn load_declarations(src: &str) -> Result<Declarations, DeclError> {
    let root: Value = serde_json::from_str(src).map_err(|e| DeclError::Json {
        message: e.to_string(),
        src: src.to_string(),
        span: (offset_of(src, e.line(), e.column()), 0).into(),
    })?;
    let root = as_object(&root, "$")?;

    let unit = CompilationUnit::new();
    for (i, decl) in optional_array(root, "interfaces", "$")?.iter().enumerate() {
        load_interface(&unit, decl, &format!("interfaces[{i}]"))?;
    }
    for (i, decl) in optional_array(root, "classes", "$")?.iter().enumerate() {
        load_class(&unit, decl, &format!("classes[{i}]"))?;
    }
    let mut checks = Vec::new();
    for (i, decl) in optional_array(root, "checks", "$")?.iter().enumerate() {
        let path = format!("checks[{i}]");
        let obj = as_object(decl, &path)?;
        checks.push(Check {
            ty: type_field(&unit, obj, "type", &path)?,
            expected: type_field(&unit, obj, "expected", &path)?,
        });
    }

    tracing::debug!(
        classes = unit.classes().len(),
        interfaces = unit.interfaces().len(),
        checks = checks.len(),
        "loaded declarations"
    );
    Ok(Declarations { unit, checks })
}

fn load_interface(unit: &Rc<CompilationUnit>, decl: &Value, path: &str) -> Result<(), DeclError> {
    let obj = as_object(decl, path)?;
    let name = name_field(obj, path)?;
    let mut iface = InterfaceType::new(name, bool_field(obj, "module", path)?);
    for (i, method) in optional_array(obj, "methods", path)?.iter().enumerate() {
        let path = format!("{path}.methods[{i}]");
        let (name, arguments, returns) = load_signature(unit, method, &path)?;
        iface
            .add_method(FunctionSchema::new(name, arguments, returns))
            .map_err(|source| DeclError::Class { path, source })?;
    }
    unit.register_type(Type::Interface(Rc::new(iface)))
        .map_err(|source| DeclError::Registry {
            path: path.to_string(),
            source,
        })
}

fn load_class(unit: &Rc<CompilationUnit>, decl: &Value, path: &str) -> Result<(), DeclError> {
    let obj = as_object(decl, path)?;
    let name = name_field(obj, path)?;
    let mut class = ClassType::create(Some(name.clone()), unit.handle(), bool_field(obj, "module", path)?);

    for (i, attr) in optional_array(obj, "attributes", path)?.iter().enumerate() {
        let path = format!("{path}.attributes[{i}]");
        let attr = as_object(attr, &path)?;
        let attr_name = string_field(attr, "name", &path)?;
        let ty = type_field(unit, attr, "type", &path)?;
        let is_parameter = bool_field(attr, "parameter", &path)?;
        class
            .add_attribute(attr_name, ty, is_parameter)
            .map_err(|source| DeclError::Class { path, source })?;
    }

    for (i, constant) in optional_array(obj, "constants", path)?.iter().enumerate() {
        let path = format!("{path}.constants[{i}]");
        let constant = as_object(constant, &path)?;
        let const_name = string_field(constant, "name", &path)?;
        let value = constant.get("value").ok_or_else(|| DeclError::Shape {
            path: path.clone(),
            message: "missing field `value`".to_string(),
        })?;
        let value = to_ivalue(value, &format!("{path}.value"))?;
        class
            .add_constant(const_name, value)
            .map_err(|source| DeclError::Class { path, source })?;
    }

    for (i, method) in optional_array(obj, "methods", path)?.iter().enumerate() {
        let path = format!("{path}.methods[{i}]");
        let (method_name, arguments, returns) = load_signature(unit, method, &path)?;
        if let Err(source) = class.check_method_not_exist(&method_name) {
            return Err(DeclError::Class { path, source });
        }
        let function = unit
            .create_function(name.child(&method_name), arguments, returns)
            .map_err(|source| DeclError::Registry {
                path: path.clone(),
                source,
            })?;
        class
            .add_method(function)
            .map_err(|source| DeclError::Class { path, source })?;
    }

    unit.register_type(Type::Class(Rc::new(class)))
        .map_err(|source| DeclError::Registry {
            path: path.to_string(),
            source,
        })
}

/// `{ "name", "args": [[name, type], ...], "returns" }`, with the receiver prepended.
fn load_signature(unit: &Rc<CompilationUnit>, decl: &Value, path: &str) -> Result<(String, Vec<Argument>, Type), DeclError> {
    let obj = as_object(decl, path)?;
    let name = string_field(obj, "name", path)?.to_string();
    if QualifiedName::from_atoms([name.as_str()]).is_none() {
        return Err(DeclError::Name {
            path: format!("{path}.name"),
            name,
        });
    }

    let mut arguments = vec![Argument::new(SELF_ARG_NAME, Type::SelfType)];
    for (i, arg) in optional_array(obj, "args", path)?.iter().enumerate() {
        let path = format!("{path}.args[{i}]");
        let pair = match arg {
            Value::Array(pair) if pair.len() == 2 => pair,
            _ => return Err(shape(&path, "expected a `[name, type]` pair")),
        };
        let (Value::String(arg_name), Value::String(ty)) = (&pair[0], &pair[1]) else {
            return Err(shape(&path, "expected a `[name, type]` pair of strings"));
        };
        let ty = parse_type(ty, unit).map_err(|source| DeclError::TypeExpr { path, source })?;
        arguments.push(Argument::new(arg_name.as_str(), ty));
    }

    let returns = match obj.get("returns") {
        None => Type::NoneType,
        Some(_) => type_field(unit, obj, "returns", path)?,
    };
    Ok((name, arguments, returns))
}

fn to_ivalue(value: &Value, path: &str) -> Result<IValue, DeclError> {
    Ok(match value {
        Value::Null => IValue::None,
        Value::Bool(b) => IValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => IValue::Int(i),
            None => IValue::Float(
                n.as_f64()
                    .ok_or_else(|| shape(path, "number is out of range"))?,
            ),
        },
        Value::String(s) => IValue::Str(s.clone()),
        Value::Array(elems) => IValue::Tuple(
            elems
                .iter()
                .enumerate()
                .map(|(i, e)| to_ivalue(e, &format!("{path}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(_) => return Err(shape(path, "objects are not valid constant values")),
    })
}

// ============================================================================
// JSON shape helpers
// ============================================================================

fn shape(path: &str, message: &str) -> DeclError {
    DeclError::Shape {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, DeclError> {
    value.as_object().ok_or_else(|| shape(path, "expected an object"))
}

fn optional_array<'v>(obj: &'v Map<String, Value>, field: &str, path: &str) -> Result<&'v [Value], DeclError> {
    match obj.get(field) {
        None => Ok(&[][..]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(shape(&format!("{path}.{field}"), "expected an array")),
    }
}

fn string_field<'v>(obj: &'v Map<String, Value>, field: &str, path: &str) -> Result<&'v str, DeclError> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(shape(&format!("{path}.{field}"), "expected a string")),
        None => Err(shape(path, &format!("missing field `{field}`"))),
    }
}

fn bool_field(obj: &Map<String, Value>, field: &str, path: &str) -> Result<bool, DeclError> {
    match obj.get(field) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(shape(&format!("{path}.{field}"), "expected a boolean")),
    }
}

fn name_field(obj: &Map<String, Value>, path: &str) -> Result<QualifiedName, DeclError> {
    let name = string_field(obj, "name", path)?;
    name.parse().map_err(|_| DeclError::Name {
        path: format!("{path}.name"),
        name: name.to_string(),
    })
}

fn type_field(unit: &Rc<CompilationUnit>, obj: &Map<String, Value>, field: &str, path: &str) -> Result<Type, DeclError> {
    let src = string_field(obj, field, path)?;
    parse_type(src, unit).map_err(|source| DeclError::TypeExpr {
        path: format!("{path}.{field}"),
        source,
    })
}

/// Byte offset of a 1-based line/column position, clamped to the source length.
fn offset_of(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"{
        "interfaces": [
            { "name": "Shaped", "methods": [{ "name": "area", "returns": "float" }] }
        ],
        "classes": [
            {
                "name": "shapes.Square",
                "attributes": [{ "name": "side", "type": "float" }],
                "constants": [{ "name": "SIDES", "value": 4 }],
                "methods": [{ "name": "area", "returns": "float" }]
            },
            { "name": "shapes.Circle", "attributes": [{ "name": "r", "type": "float" }] }
        ],
        "checks": [
            { "type": "shapes.Square", "expected": "Shaped" },
            { "type": "shapes.Circle", "expected": "Shaped" }
        ]
    }"#;

    #[test]
    fn test_load_shapes() {
        let decls = load_declarations(SHAPES).unwrap();
        let square = decls.unit().get_class(&"shapes.Square".parse().unwrap()).unwrap();
        assert_eq!(square.num_attributes(), 1);
        assert_eq!(square.get_constant("SIDES").unwrap(), &IValue::Int(4));
        assert_eq!(square.methods()[0].qualname().to_string(), "shapes.Square.area");
        assert_eq!(decls.checks().len(), 2);
    }

    #[test]
    fn test_run_checks_reports_missing_method() {
        let decls = load_declarations(SHAPES).unwrap();
        let outcomes = decls.run_checks(&CheckConfig::default());
        assert!(outcomes[0].passed);
        assert!(outcomes[0].reasons.is_empty());
        assert!(!outcomes[1].passed);
        assert_eq!(
            outcomes[1].reasons,
            vec!["Class 'shapes.Circle' is missing method `area` required by interface 'Shaped'".to_string()]
        );
    }

    #[test]
    fn test_later_declarations_are_not_visible() {
        let src = r#"{ "classes": [
            { "name": "A", "attributes": [{ "name": "b", "type": "B" }] },
            { "name": "B" }
        ] }"#;
        match load_declarations(src).unwrap_err() {
            DeclError::TypeExpr { path, source } => {
                assert_eq!(path, "classes[0].attributes[0].type");
                assert!(matches!(source, TypeExprError::UnknownType { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_class_errors_carry_their_path() {
        let src = r#"{ "classes": [
            { "name": "P", "attributes": [{ "name": "w", "type": "Tensor", "parameter": true }] }
        ] }"#;
        match load_declarations(src).unwrap_err() {
            DeclError::Class { path, source } => {
                assert_eq!(path, "classes[0].attributes[0]");
                assert!(source.is_fatal());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_method_is_a_name_conflict() {
        let src = r#"{ "classes": [
            { "name": "Point", "methods": [
                { "name": "dist", "returns": "float" },
                { "name": "dist", "returns": "int" }
            ] }
        ] }"#;
        match load_declarations(src).unwrap_err() {
            DeclError::Class { path, source } => {
                assert_eq!(path, "classes[0].methods[1]");
                assert!(matches!(
                    source,
                    ClassTypeError::NameConflict { what: crate::types::FieldKind::Method, .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(load_declarations("[]"), Err(DeclError::Shape { .. })));
        assert!(matches!(
            load_declarations(r#"{ "classes": {} }"#),
            Err(DeclError::Shape { .. })
        ));
        let err = load_declarations(r#"{ "classes": [{ "attributes": [] }] }"#).unwrap_err();
        assert_eq!(err.to_string(), "classes[0]: missing field `name`");
        let err = load_declarations(
            r#"{ "classes": [{ "name": "C", "constants": [{ "name": "K", "value": {} }] }] }"#,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "classes[0].constants[0].value: objects are not valid constant values"
        );
    }

    #[test]
    fn test_duplicate_declarations() {
        let src = r#"{ "interfaces": [{ "name": "X" }], "classes": [{ "name": "X" }] }"#;
        assert!(matches!(
            load_declarations(src),
            Err(DeclError::Registry { source: RegistryError::DuplicateType(_), .. })
        ));
    }

    #[test]
    fn test_json_error_points_into_source() {
        let src = "{\n  \"classes\": [,]\n}";
        match load_declarations(src).unwrap_err() {
            DeclError::Json { span, .. } => assert!(span.offset() > 2 && span.offset() <= src.len()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_constant_values() {
        let v: Value = serde_json::from_str(r#"[null, true, 1, 1.5, "s", [2]]"#).unwrap();
        assert_eq!(
            to_ivalue(&v, "v").unwrap(),
            IValue::Tuple(vec![
                IValue::None,
                IValue::Bool(true),
                IValue::Int(1),
                IValue::Float(1.5),
                IValue::Str("s".to_string()),
                IValue::Tuple(vec![IValue::Int(2)]),
            ])
        );
    }

    #[test]
    fn test_offset_of() {
        let src = "ab\ncd\nef";
        assert_eq!(offset_of(src, 1, 1), 0);
        assert_eq!(offset_of(src, 2, 2), 4);
        assert_eq!(offset_of(src, 9, 9), src.len());
    }
}
