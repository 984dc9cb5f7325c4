// strata-core - Protocol table tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;

use std::any::Any;
use std::rc::Rc;

use common::*;
use strata_core::{ImplTarget, ProtocolRegistry, StrataObject, TypeTag, names, tag_of};

/// A user type dispatched through the table under its own tag.
#[derive(Debug)]
struct Point {
    x: i64,
    y: i64,
}

impl StrataObject for Point {
    fn type_name(&self) -> Option<&'static str> {
        Some("Point")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

const POINT: TypeTag = TypeTag::Type("Point");

fn point(x: i64, y: i64) -> StrataVal {
    StrataVal::object(Point { x, y })
}

fn point_of(val: &StrataVal) -> Option<&Point> {
    match val {
        StrataVal::Object(obj) => obj.as_any().downcast_ref::<Point>(),
        _ => None,
    }
}

/// A user type that carries its own `Counted/count`.
#[derive(Debug)]
struct Bag(usize);

impl StrataObject for Bag {
    fn protocol_method(&self, protocol: &str, op: &str) -> Option<StrataFn> {
        let size = StrataVal::int(self.0 as i64);
        (protocol == names::COUNTED && op == "count")
            .then(|| StrataFn::new("bag-count", move |_| Ok(size.clone())))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Array-like host object without a type of its own.
#[derive(Debug)]
struct Triple([i64; 3]);

impl StrataObject for Triple {
    fn length(&self) -> Option<usize> {
        Some(3)
    }

    fn element(&self, index: usize) -> Option<StrataVal> {
        self.0.get(index).map(|n| StrataVal::int(*n))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Table dispatch
// ============================================================================

#[test]
fn test_user_type_registered_in_table() {
    let rt = new_runtime();
    rt.protocols()
        .register(
            names::COUNTED,
            "count",
            POINT,
            StrataFn::new("point-count", |_| Ok(StrataVal::int(2))),
        )
        .unwrap();
    rt.protocols()
        .register(
            names::INDEXED,
            "nth",
            POINT,
            StrataFn::new("point-nth", |args| {
                let p = point_of(&args[0]).ok_or_else(|| Error::argument("nth", "not a point"))?;
                match &args[1] {
                    StrataVal::Int(0) => Ok(StrataVal::int(p.x)),
                    StrataVal::Int(1) => Ok(StrataVal::int(p.y)),
                    StrataVal::Int(i) => Err(Error::out_of_bounds(*i, 2)),
                    _ => Err(Error::argument("nth", "index must be an int")),
                }
            }),
        )
        .unwrap();

    let p = point(3, 4);
    assert_eq!(tag_of(&p), POINT);
    assert_eq!(rt.count(&p).unwrap(), 2);
    assert_eq!(rt.nth(&p, 1).unwrap(), StrataVal::int(4));
    assert_err_kind!(rt.nth(&p, 2), ErrorKind::StructuralViolation);
}

#[test]
fn test_missing_protocol_names_the_operation() {
    let rt = new_runtime();
    let err = rt.count(&point(1, 2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingProtocolOperation);
    let message = err.to_string();
    assert!(message.contains("Counted/count"), "{}", message);
    assert!(message.contains("Point"), "{}", message);

    assert_err_kind!(rt.conj(&StrataVal::int(1), StrataVal::int(2)), ErrorKind::MissingProtocolOperation);
    assert_err_kind!(rt.peek(&StrataVal::hash_set(vec![])), ErrorKind::MissingProtocolOperation);
}

// ============================================================================
// Direct hooks
// ============================================================================

#[test]
fn test_direct_hook_wins_over_table() {
    let rt = new_runtime();
    rt.protocols()
        .register(
            names::COUNTED,
            "count",
            ImplTarget::Default,
            StrataFn::new("default-count", |_| Ok(StrataVal::int(-1))),
        )
        .unwrap();

    assert_eq!(rt.count(&StrataVal::object(Bag(7))).unwrap(), 7);
    assert!(rt.satisfies(names::COUNTED, &StrataVal::object(Bag(0))));
}

#[test]
fn test_array_like_objects_use_array_entries() {
    let rt = new_runtime();
    let t = StrataVal::object(Triple([1, 2, 3]));
    assert_eq!(tag_of(&t), TypeTag::Array);
    assert_eq!(rt.count(&t).unwrap(), 3);
    assert_eq!(rt.nth(&t, 2).unwrap(), StrataVal::int(3));
    assert_eq!(rt.get(&t, &StrataVal::int(0)).unwrap(), StrataVal::int(1));
    assert_eq!(t, StrataVal::vector(ints(&[1, 2, 3])));
}

// ============================================================================
// User protocols
// ============================================================================

fn describe_registry() -> ProtocolRegistry {
    let registry = ProtocolRegistry::new();
    registry.define("Describe", &["describe", "label"]);
    registry
        .extend(
            "Describe",
            POINT,
            vec![
                ("describe", StrataFn::new("point", |_| Ok(StrataVal::string("a point")))),
                ("label", StrataFn::new("point-label", |_| Ok(StrataVal::string("P")))),
            ],
        )
        .unwrap();
    registry
        .register(
            "Describe",
            "describe",
            ImplTarget::Default,
            StrataFn::new("anything", |_| Ok(StrataVal::string("something"))),
        )
        .unwrap();
    registry
}

#[test]
fn test_user_protocol_resolution_order() {
    init_tracing();
    let registry = describe_registry();
    assert_eq!(
        registry.invoke("Describe", "describe", &[point(0, 0)]).unwrap(),
        StrataVal::string("a point")
    );
    assert_eq!(
        registry.invoke("Describe", "describe", &[StrataVal::int(1)]).unwrap(),
        StrataVal::string("something")
    );
    assert_err_kind!(
        registry.invoke("Describe", "label", &[StrataVal::int(1)]),
        ErrorKind::MissingProtocolOperation
    );
}

#[test]
fn test_satisfies_extends_extenders() {
    let registry = describe_registry();
    assert!(registry.satisfies("Describe", &point(0, 0)));
    assert!(!registry.satisfies("Describe", &StrataVal::Nil));
    assert!(registry.extends("Describe", POINT));
    assert!(!registry.extends("Describe", ImplTarget::Default));

    let extenders = registry.extenders("Describe");
    assert_eq!(extenders.len(), 2);
    assert!(extenders.contains(&ImplTarget::Tag(POINT)));
    assert!(extenders.contains(&ImplTarget::Default));
    assert!(registry.extenders("Unknown").is_empty());
}

#[test]
fn test_register_validates_declarations() {
    let registry = describe_registry();
    let noop = StrataFn::new("noop", |_| Ok(StrataVal::Nil));
    assert_err_kind!(
        registry.register("Describe", "paint", POINT, noop.clone()),
        ErrorKind::StructuralViolation
    );
    assert_err_kind!(
        registry.register("Paint", "paint", POINT, noop),
        ErrorKind::StructuralViolation
    );

    registry.define("Describe", &["paint"]);
    assert_eq!(
        registry.ops("Describe").unwrap(),
        vec!["describe".to_string(), "label".to_string(), "paint".to_string()]
    );
    // the extension predates the new operation
    assert!(!registry.extends("Describe", POINT));
}

#[test]
fn test_implementations_can_reenter_the_table() {
    let rt = Rc::new(new_runtime());
    let inner = Rc::clone(&rt);
    rt.protocols()
        .register(
            names::COUNTED,
            "count",
            POINT,
            StrataFn::new("point-count", move |args| {
                let p = point_of(&args[0]).ok_or_else(|| Error::argument("count", "not a point"))?;
                let coords = StrataVal::vector(ints(&[p.x, p.y]));
                Ok(StrataVal::int(inner.count(&coords)? as i64))
            }),
        )
        .unwrap();
    assert_eq!(rt.count(&point(5, 6)).unwrap(), 2);
}

#[test]
fn test_core_protocols_declared() {
    let rt = new_runtime();
    for protocol in [
        names::SEQABLE,
        names::COUNTED,
        names::COLLECTION,
        names::INDEXED,
        names::LOOKUP,
        names::ASSOCIATIVE,
        names::STACK,
        names::REDUCIBLE,
        names::EQUIV,
        names::HASHABLE,
    ] {
        assert!(rt.protocols().is_defined(protocol), "{}", protocol);
    }
    let v = StrataVal::vector(vec![]);
    assert!(rt.satisfies(names::STACK, &v));
    assert!(!rt.satisfies(names::STACK, &StrataVal::hash_set(vec![])));
    assert!(rt.satisfies(names::HASHABLE, &point(1, 1)));
}
