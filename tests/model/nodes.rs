//! Integration tests for node construction and mutation
//!
//! Tests constructor argument binding, defaults, validation modes, extra
//! attributes, and structural equality through the registry API.

use astkit_foundation::{ErrorKind, Violation};
use astkit_model::{Args, Mode, NodeDecl, Registry, Value, field, int, seq, text};

// =============================================================================
// Constructor Arguments
// =============================================================================

#[test]
fn positionals_fill_fields_in_schema_order() {
    let mut registry = Registry::new();
    let point = registry
        .declare(
            NodeDecl::new("Point")
                .with_field("x", field(int()))
                .with_field("y", field(int())),
        )
        .unwrap();

    let node = registry
        .build(point, Args::new().pos(1i64).pos(2i64))
        .unwrap();
    assert_eq!(node.value("x"), Some(&Value::Int(1)));
    assert_eq!(node.value("y"), Some(&Value::Int(2)));
}

#[test]
fn keyword_claims_its_field_before_positionals() {
    let mut registry = Registry::new();
    let point = registry
        .declare(
            NodeDecl::new("Point")
                .with_field("x", field(int()))
                .with_field("y", field(int())),
        )
        .unwrap();

    // `x` is taken by keyword, so the positional flows on to `y`.
    let node = registry
        .build(point, Args::new().pos(9i64).kw("x", 1i64))
        .unwrap();
    assert_eq!(node.value("x"), Some(&Value::Int(1)));
    assert_eq!(node.value("y"), Some(&Value::Int(9)));
}

#[test]
fn surplus_arguments_are_ignored() {
    let mut registry = Registry::new();
    let point = registry
        .declare(
            NodeDecl::new("Point")
                .with_field("x", field(int()))
                .with_field("y", field(int())),
        )
        .unwrap();

    let node = registry
        .build(
            point,
            Args::new()
                .pos(1i64)
                .pos(2i64)
                .pos(3i64)
                .kw("label", "origin"),
        )
        .unwrap();

    assert_eq!(node.value("x"), Some(&Value::Int(1)));
    assert_eq!(node.value("y"), Some(&Value::Int(2)));
    // The unknown keyword is dropped, not stored as an extra.
    assert!(node.extra("label").is_none());
}

#[test]
fn missing_required_field_is_rejected() {
    let mut registry = Registry::new();
    let point = registry
        .declare(
            NodeDecl::new("Point")
                .with_field("x", field(int()))
                .with_field("y", field(int())),
        )
        .unwrap();

    let err = registry.build(point, Args::new().pos(1i64)).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::Violation(Violation::MustNotBeEmpty)
    ));
    assert!(format!("{err}").ends_with("(Point.y)"));
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn defaults_fill_missing_arguments() {
    let mut registry = Registry::new();
    let counter = registry
        .declare(
            NodeDecl::new("Counter")
                .with_field("label", field(text()))
                .with_field("count", field(int()).with_default(0i64)),
        )
        .unwrap();

    let node = registry.build(counter, Args::new().pos("hits")).unwrap();
    assert_eq!(node.value("count"), Some(&Value::Int(0)));

    // An explicit argument still wins.
    let node = registry
        .build(counter, Args::new().pos("hits").pos(7i64))
        .unwrap();
    assert_eq!(node.value("count"), Some(&Value::Int(7)));
}

#[test]
fn nullable_field_defaults_to_null() {
    let mut registry = Registry::new();
    let id = registry
        .declare(NodeDecl::new("Leaf").with_field("note", field(text()).nullable()))
        .unwrap();

    let node = registry.build(id, Args::new()).unwrap();
    assert_eq!(node.value("note"), Some(&Value::Null));
}

#[test]
fn sequence_defaults_need_nullability() {
    let mut registry = Registry::new();
    let strict = registry
        .declare(NodeDecl::new("Strict").with_field("items", seq(int())))
        .unwrap();
    let relaxed = registry
        .declare(NodeDecl::new("Relaxed").with_field("items", seq(int()).nullable()))
        .unwrap();

    // With no argument the default is an empty list, which a non-nullable
    // sequence refuses.
    let err = registry.build(strict, Args::new()).unwrap_err();
    assert!(format!("{err}").contains("must not be empty"));

    let node = registry.build(relaxed, Args::new()).unwrap();
    assert!(node.list("items").unwrap().is_empty());
}

#[test]
fn container_defaults_are_copied_not_shared() {
    let mut registry = Registry::new();
    let id = registry
        .declare(NodeDecl::new("Bag").with_field("items", seq(int()).nullable()))
        .unwrap();

    let mut first = registry.build(id, Args::new()).unwrap();
    let second = registry.build(id, Args::new()).unwrap();

    first.list_mut("items").unwrap().push(1i64).unwrap();

    assert_eq!(first.list("items").unwrap().len(), 1);
    assert!(second.list("items").unwrap().is_empty());

    // Later instances start from the untouched default too.
    let third = registry.build(id, Args::new()).unwrap();
    assert!(third.list("items").unwrap().is_empty());
}

#[test]
fn bad_default_surfaces_when_used() {
    let mut registry = Registry::new();
    // The declaration accepts the default; only construction validates it.
    let id = registry
        .declare(NodeDecl::new("Odd").with_field("count", field(int()).with_default("many")))
        .unwrap();

    let err = registry.build(id, Args::new()).unwrap_err();
    assert!(format!("{err}").contains("expected int"));

    // An explicit argument never touches the default.
    assert!(registry.build(id, Args::new().pos(3i64)).is_ok());
}

// =============================================================================
// Abstract Types
// =============================================================================

#[test]
fn abstract_types_cannot_be_constructed() {
    let mut registry = Registry::new();
    let expr = registry
        .declare(NodeDecl::new("Expr").abstract_())
        .unwrap();
    let fast_expr = registry
        .declare(NodeDecl::new("FastExpr").abstract_().with_mode(Mode::Fast))
        .unwrap();

    let err = registry.build(expr, Args::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AbstractType { .. }));

    // Fast mode does not relax the abstract check.
    let err = registry.build(fast_expr, Args::new()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AbstractType { .. }));
}

// =============================================================================
// Validation Modes
// =============================================================================

#[test]
fn fast_mode_still_validates_construction() {
    let mut registry = Registry::new();
    let id = registry
        .declare(
            NodeDecl::new("Quick")
                .with_mode(Mode::Fast)
                .with_field("n", field(int())),
        )
        .unwrap();

    let err = registry.build(id, Args::new().pos("nope")).unwrap_err();
    assert!(format!("{err}").contains("expected int"));

    let node = registry.build(id, Args::new().pos(4i64)).unwrap();
    assert_eq!(node.mode(), Mode::Fast);
}

#[test]
fn debug_assignment_revalidates() {
    let mut registry = Registry::new();
    let id = registry
        .declare(NodeDecl::new("Slow").with_field("n", field(int())))
        .unwrap();

    let mut node = registry.build(id, Args::new().pos(4i64)).unwrap();
    node.set("n", 5i64).unwrap();
    assert_eq!(node.value("n"), Some(&Value::Int(5)));

    let err = node.set("n", "nope").unwrap_err();
    assert!(format!("{err}").contains("expected int"));
    assert_eq!(node.value("n"), Some(&Value::Int(5))); // unchanged
}

#[test]
fn fast_assignment_skips_revalidation() {
    let mut registry = Registry::new();
    let id = registry
        .declare(
            NodeDecl::new("Quick")
                .with_mode(Mode::Fast)
                .with_field("n", field(int())),
        )
        .unwrap();

    let mut node = registry.build(id, Args::new().pos(4i64)).unwrap();
    node.set("n", "nope").unwrap();
    assert_eq!(node.value("n"), Some(&Value::from("nope")));
}

#[test]
fn fast_assignment_wraps_well_shaped_lists() {
    let mut registry = Registry::new();
    let id = registry
        .declare(
            NodeDecl::new("Quick")
                .with_mode(Mode::Fast)
                .with_field("items", seq(int())),
        )
        .unwrap();

    let mut node = registry
        .build(id, Args::new().pos(vec![1i64, 2]))
        .unwrap();
    node.set("items", vec![3i64, 4, 5]).unwrap();

    let items = node.list("items").unwrap();
    assert_eq!(items.len(), 3);

    // The wrapped list still validates its own mutations.
    let err = node.list_mut("items").unwrap().push("x").unwrap_err();
    assert!(format!("{err}").contains("expected int"));
}

#[test]
fn ill_shaped_fast_assignment_is_stored_raw() {
    let mut registry = Registry::new();
    let id = registry
        .declare(
            NodeDecl::new("Quick")
                .with_mode(Mode::Fast)
                .with_field("items", seq(int())),
        )
        .unwrap();

    let mut node = registry
        .build(id, Args::new().pos(vec![1i64]))
        .unwrap();
    node.set("items", 9i64).unwrap();

    assert!(node.list("items").is_none());
    assert_eq!(node.value("items"), Some(&Value::Int(9)));
}

// =============================================================================
// Extra Attributes
// =============================================================================

#[test]
fn extras_roundtrip() {
    let mut registry = Registry::new();
    let id = registry
        .declare(NodeDecl::new("Tagged").with_field("n", field(int())))
        .unwrap();

    let mut node = registry.build(id, Args::new().pos(1i64)).unwrap();
    node.set("lineno", 42i64).unwrap();

    assert_eq!(node.extra("lineno"), Some(&Value::Int(42)));
    assert_eq!(node.remove("lineno").unwrap(), Some(Value::Int(42)));
    assert_eq!(node.remove("lineno").unwrap(), None);
}

#[test]
fn declared_fields_can_never_be_removed() {
    let mut registry = Registry::new();
    let debug = registry
        .declare(NodeDecl::new("D").with_field("n", field(int())))
        .unwrap();
    let fast = registry
        .declare(
            NodeDecl::new("F")
                .with_mode(Mode::Fast)
                .with_field("n", field(int())),
        )
        .unwrap();

    for id in [debug, fast] {
        let mut node = registry.build(id, Args::new().pos(1i64)).unwrap();
        let err = node.remove("n").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Integrity { .. }));
        assert_eq!(node.value("n"), Some(&Value::Int(1))); // still there
    }
}

// =============================================================================
// Equality and Cloning
// =============================================================================

#[test]
fn nodes_compare_structurally() {
    let mut registry = Registry::new();
    let point = registry
        .declare(
            NodeDecl::new("Point")
                .with_field("x", field(int()))
                .with_field("y", field(int())),
        )
        .unwrap();
    let pair = registry
        .declare(
            NodeDecl::new("Pair")
                .with_field("x", field(int()))
                .with_field("y", field(int())),
        )
        .unwrap();

    let a = registry.build(point, Args::new().pos(1i64).pos(2i64)).unwrap();
    let b = registry.build(point, Args::new().pos(1i64).pos(2i64)).unwrap();
    let c = registry.build(point, Args::new().pos(1i64).pos(3i64)).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);

    // Equality is structural: a different type with the same field names
    // and values compares equal.
    let d = registry.build(pair, Args::new().pos(1i64).pos(2i64)).unwrap();
    assert_eq!(a, d);
}

#[test]
fn extras_participate_in_equality() {
    let mut registry = Registry::new();
    let id = registry
        .declare(NodeDecl::new("T").with_field("n", field(int())))
        .unwrap();

    let plain = registry.build(id, Args::new().pos(1i64)).unwrap();
    let mut tagged = registry.build(id, Args::new().pos(1i64)).unwrap();
    tagged.set("note", "hi").unwrap();

    assert_ne!(plain, tagged);
}

#[test]
fn clones_are_independent() {
    let mut registry = Registry::new();
    let id = registry
        .declare(NodeDecl::new("Bag").with_field("items", seq(int())))
        .unwrap();

    let original = registry
        .build(id, Args::new().pos(vec![1i64, 2]))
        .unwrap();
    let mut copy = original.clone();
    copy.list_mut("items").unwrap().push(3i64).unwrap();

    assert_eq!(original.list("items").unwrap().len(), 2);
    assert_eq!(copy.list("items").unwrap().len(), 3);
}

#[test]
fn fields_iterate_in_schema_order() {
    let mut registry = Registry::new();
    let id = registry
        .declare(
            NodeDecl::new("Row")
                .with_field("a", field(int()))
                .with_field("b", field(int()))
                .with_field("c", field(int())),
        )
        .unwrap();

    let node = registry
        .build(id, Args::new().pos(1i64).pos(2i64).pos(3i64))
        .unwrap();
    let names: Vec<_> = node.fields().map(|(name, _)| name.to_string()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn debug_output_names_the_type_and_fields() {
    let mut registry = Registry::new();
    let id = registry
        .declare(NodeDecl::new("Num").with_field("n", field(int())))
        .unwrap();

    let node = registry.build(id, Args::new().pos(4i64)).unwrap();
    let rendered = format!("{node:?}");
    assert!(rendered.starts_with("Num"));
    assert!(rendered.contains('n'));
}
