//! Declaration files loaded from `tests/fixtures`, checked and rendered the way the CLI prints them.
//!
//! Review changes: `cargo insta review`

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use classtype::cli::commands::{render_declarations, render_outcomes};
use classtype::frontend::{DeclError, load_declarations};
use classtype::{CheckConfig, ClassTypeError, IValue};
use classtype_core::QualifiedName;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {}", path.display()))
}

fn qn(s: &str) -> QualifiedName {
    s.parse().unwrap()
}

#[test]
fn test_shapes_layout() {
    let decls = load_declarations(&fixture("shapes.json")).unwrap();
    insta::assert_snapshot!(render_declarations(&decls), @r"
    interface shapes.Shaped
      area(Self self) -> float

    module interface nn.Layer
      forward(Self self, Tensor x) -> Tensor

    class shapes.Square
      attributes:
        [0] side: float
      constants:
        [0] SIDES = 4
      methods:
        area(Self self) -> float

    class shapes.Circle
      attributes:
        [0] r: float
      methods:
        area(Self self) -> int

    module nn.Linear
      attributes:
        [0] weight: Tensor (parameter)
        [1] bias: Optional[Tensor] (parameter)
        [2] training: bool
      constants:
        [0] SHAPE = (3, 4)
      methods:
        forward(Self self, Tensor x) -> Tensor
    ");
}

#[test]
fn test_shapes_checks() {
    let decls = load_declarations(&fixture("shapes.json")).unwrap();
    let outcomes = decls.run_checks(&CheckConfig::default());
    insta::assert_snapshot!(render_outcomes(&outcomes), @r"
    ok   shapes.Square <: shapes.Shaped
    FAIL shapes.Circle <: shapes.Shaped
         Method `area` on class 'shapes.Circle' (1) is not compatible with interface 'shapes.Shaped' (2)
           (1) area(Self self) -> int
           (2) area(Self self) -> float
    ok   nn.Linear <: nn.Layer
    FAIL shapes.Square <: nn.Layer
         Class 'shapes.Square' is not a module, but required interface 'nn.Layer' is module-only; only module classes can be subtypes of a module interface
    ok   Tuple[shapes.Square, None] <: Tuple[Optional[shapes.Square], Optional[nn.Linear]]

    3 passed, 2 failed
    ");
}

#[test]
fn test_drawable_reports_every_problem() {
    let decls = load_declarations(&fixture("drawable.json")).unwrap();
    let outcomes = decls.run_checks(&CheckConfig::default());
    insta::assert_snapshot!(render_outcomes(&outcomes), @r"
    FAIL Sketch <: Drawable
         Class 'Sketch' is missing method `area` required by interface 'Drawable'
         Method `draw` on class 'Sketch' (1) is not compatible with interface 'Drawable' (2)
           (1) draw(Self self, float factor) -> None
           (2) draw(Self self, float scale) -> None
         Class 'Sketch' is missing method `label` required by interface 'Drawable'

    0 passed, 1 failed
    ");
}

#[test]
fn test_drawable_first_only() {
    let decls = load_declarations(&fixture("drawable.json")).unwrap();
    let outcomes = decls.run_checks(&CheckConfig::new().with_collect_all(false));
    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].passed);
    assert_eq!(
        outcomes[0].reasons,
        vec!["Class 'Sketch' is missing method `area` required by interface 'Drawable'".to_string()]
    );
}

#[test]
fn test_loaded_types_are_queryable() {
    let decls = load_declarations(&fixture("shapes.json")).unwrap();
    let unit = decls.unit();

    let linear = unit.get_class(&qn("nn.Linear")).unwrap();
    assert!(linear.is_module());
    assert_eq!(linear.get_attribute_slot("training").unwrap(), 2);
    assert!(linear.is_parameter(1).unwrap());
    assert_eq!(
        linear.get_constant("SHAPE").unwrap(),
        &IValue::Tuple(vec![IValue::Int(3), IValue::Int(4)])
    );
    assert!(Rc::ptr_eq(&linear.compilation_unit(), unit));
    assert!(unit.find_function(&qn("nn.Linear.forward")).is_some());

    let layer = unit.get_interface(&qn("nn.Layer")).unwrap();
    assert!(layer.is_module());
    assert!(linear.satisfies_interface(&layer, None));
}

#[test]
fn test_bad_parameter_is_rejected_with_path() {
    match load_declarations(&fixture("bad_parameter.json")).unwrap_err() {
        DeclError::Class { path, source } => {
            assert_eq!(path, "classes[0].attributes[0]");
            assert!(matches!(source, ClassTypeError::TypeRejected { .. }));
            assert!(source.to_string().contains("Optional[Tensor]"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
