// strata-core - Hierarchy tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;

use std::collections::HashSet;

use common::*;
use strata_core::seq_fns;

fn set(names: &[&str]) -> HashSet<StrataVal> {
    names.iter().map(|n| kw(n)).collect()
}

#[test]
fn test_runtime_global_hierarchy() {
    let rt = new_runtime();
    rt.derive(kw("poodle"), kw("dog")).unwrap();
    rt.derive(kw("dog"), kw("animal")).unwrap();

    assert!(rt.isa(&kw("poodle"), &kw("animal")));
    assert!(rt.isa(&kw("dog"), &kw("dog")));
    assert_eq!(rt.parents(&kw("poodle")), set(&["dog"]));
    assert_eq!(rt.ancestors(&kw("poodle")), set(&["dog", "animal"]));
    assert_eq!(rt.descendants(&kw("animal")), set(&["dog", "poodle"]));
    assert!(rt.parents(&kw("animal")).is_empty());
}

#[test]
fn test_isa_equality_covers_any_value() {
    let rt = new_runtime();
    assert!(rt.isa(&StrataVal::int(1), &StrataVal::int(1)));
    assert!(rt.isa(&StrataVal::Nil, &StrataVal::Nil));
    assert!(!rt.isa(&StrataVal::int(1), &StrataVal::float(1.0)));
    assert!(rt.isa(
        &StrataVal::list(ints(&[1, 2])),
        &StrataVal::vector(ints(&[1, 2]))
    ));
}

#[test]
fn test_isa_on_sequences_stops_at_first_difference() {
    let rt = new_runtime();
    rt.derive(kw("square"), kw("shape")).unwrap();
    let pair = StrataVal::vector(vec![kw("shape"), kw("shape")]);

    // lengths known up front: nothing is walked
    let huge = StrataVal::range(0, i64::MAX, 1).unwrap();
    assert!(!rt.isa(&huge, &pair));
    assert!(!rt.isa(&pair, &huge));

    // an endless sequence is walked only as far as the shorter side
    let naturals = seq_fns::iterate(&inc(), StrataVal::int(0));
    assert!(!rt.isa(&naturals, &StrataVal::vector(ints(&[0, 1, 2]))));

    let squares = seq_fns::iterate(&StrataFn::new("same", |args| Ok(args[0].clone())), kw("square"));
    assert!(!rt.isa(&squares, &pair));
    assert!(rt.isa(&seq_fns::take(2, squares).unwrap(), &pair));

    // a sequence that fails to realize is not a match
    let broken = StrataVal::lazy_seq(|| Err(Error::argument("shapes", "unavailable")));
    assert!(!rt.isa(&broken, &pair));
}

#[test]
fn test_isa_with_sequential_tags_and_endless_values() {
    let rt = new_runtime();
    let pair = StrataVal::vector(vec![kw("square"), kw("square")]);
    rt.derive(pair.clone(), kw("pairs")).unwrap();
    assert!(rt.isa(&pair, &kw("pairs")));
    assert!(rt.isa(&StrataVal::list(vec![kw("square"), kw("square")]), &kw("pairs")));

    let naturals = seq_fns::iterate(&inc(), StrataVal::int(0));
    let huge = StrataVal::range(0, i64::MAX, 1).unwrap();
    assert!(!rt.isa(&naturals, &kw("pairs")));
    assert!(!rt.isa(&huge, &kw("pairs")));
    assert!(!rt.isa(&kw("square"), &naturals));
    assert!(!rt.isa(&pair, &huge));
}

#[test]
fn test_diamond_underive_keeps_other_path() {
    let rt = new_runtime();
    rt.derive(kw("a"), kw("b")).unwrap();
    rt.derive(kw("a"), kw("c")).unwrap();
    rt.derive(kw("b"), kw("d")).unwrap();
    rt.derive(kw("c"), kw("d")).unwrap();

    rt.underive(&kw("b"), &kw("d"));
    assert!(rt.isa(&kw("a"), &kw("d")));
    assert!(!rt.isa(&kw("b"), &kw("d")));
    assert_eq!(rt.descendants(&kw("d")), set(&["a", "c"]));
}

#[test]
fn test_underive_missing_edge_is_noop() {
    let rt = new_runtime();
    rt.derive(kw("a"), kw("b")).unwrap();
    let h = rt.global_hierarchy();
    let version = h.borrow().version();
    rt.underive(&kw("b"), &kw("a"));
    rt.underive(&kw("x"), &kw("y"));
    assert_eq!(h.borrow().version(), version);
    assert!(rt.isa(&kw("a"), &kw("b")));
}

#[test]
fn test_cycle_through_ancestry_rejected() {
    let rt = new_runtime();
    rt.derive(kw("a"), kw("b")).unwrap();
    rt.derive(kw("b"), kw("c")).unwrap();
    assert_err_kind!(rt.derive(kw("c"), kw("a")), ErrorKind::HierarchyCycle);
    assert_err_kind!(rt.derive(kw("a"), kw("a")), ErrorKind::HierarchyCycle);
    // nothing changed
    assert!(!rt.isa(&kw("c"), &kw("a")));
    assert_eq!(rt.global_hierarchy().borrow().edge_count(), 2);
}

#[test]
fn test_redundant_ancestor_edge_allowed() {
    let rt = new_runtime();
    rt.derive(kw("a"), kw("b")).unwrap();
    rt.derive(kw("b"), kw("c")).unwrap();
    rt.derive(kw("a"), kw("c")).unwrap();
    assert_eq!(rt.parents(&kw("a")), set(&["b", "c"]));

    rt.underive(&kw("a"), &kw("b"));
    assert!(rt.isa(&kw("a"), &kw("c")));
    assert!(!rt.isa(&kw("a"), &kw("b")));
}

#[test]
fn test_separate_hierarchies_are_independent() {
    init_tracing();
    let mine = Hierarchy::shared();
    mine.borrow_mut().derive(kw("rect"), kw("shape")).unwrap();

    let rt = new_runtime();
    assert!(!rt.isa(&kw("rect"), &kw("shape")));

    let mf = MultiFn::new("area", shape_tag_dispatch(), kw("default"), mine.clone());
    mf.add_method(kw("shape"), constant("shape"));
    assert_eq!(mf.invoke(&[shape("rect")]).unwrap(), StrataVal::string("shape"));
}

#[test]
fn test_hierarchy_display() {
    let mut h = Hierarchy::new();
    h.derive(kw("a"), kw("b")).unwrap();
    h.derive(kw("b"), kw("c")).unwrap();
    assert_eq!(h.to_string(), "#<Hierarchy: 2 relationships>");
}
