// strata-core - Lazy sequence tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::*;
use strata_core::seq_fns::{self, concat, drop, filter, iterate, map, take};

fn naturals() -> StrataVal {
    iterate(&inc(), StrataVal::int(0))
}

fn is_even() -> StrataFn {
    StrataFn::new("even?", |args| {
        Ok(StrataVal::Bool(matches!(&args[0], StrataVal::Int(n) if n % 2 == 0)))
    })
}

fn square() -> StrataFn {
    StrataFn::new("square", |args| match &args[0] {
        StrataVal::Int(n) => Ok(StrataVal::int(n * n)),
        other => Ok(other.clone()),
    })
}

#[test]
fn test_producer_runs_once_across_clones() {
    init_tracing();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let lazy = StrataVal::lazy_seq(move || {
        counter.set(counter.get() + 1);
        Ok(StrataVal::vector(ints(&[1, 2, 3])))
    });
    let copy = lazy.clone();
    assert_eq!(runs.get(), 0);

    let rt = new_runtime();
    assert_eq!(rt.count(&lazy).unwrap(), 3);
    assert_eq!(rt.first(&copy).unwrap(), StrataVal::int(1));
    assert_eq!(seq_fns::to_vec(&lazy).unwrap(), ints(&[1, 2, 3]));
    assert_eq!(runs.get(), 1);
}

#[test]
fn test_infinite_sequences_stay_lazy() {
    let rt = new_runtime();
    let evens = filter(&is_even(), naturals()).unwrap();
    let squares = map(&square(), evens).unwrap();
    assert_eq!(
        seq_fns::to_vec(&take(4, squares.clone()).unwrap()).unwrap(),
        ints(&[0, 4, 16, 36])
    );
    assert_eq!(rt.nth(&squares, 10).unwrap(), StrataVal::int(400));
}

#[test]
fn test_only_consumed_elements_are_computed() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let counted = StrataFn::new("counted", move |args| {
        counter.set(counter.get() + 1);
        Ok(args[0].clone())
    });
    let mapped = map(&counted, StrataVal::range(0, 1000, 1).unwrap()).unwrap();
    assert_eq!(calls.get(), 0);
    let first_three = seq_fns::to_vec(&take(3, mapped.clone()).unwrap()).unwrap();
    assert_eq!(first_three, ints(&[0, 1, 2]));
    assert_eq!(calls.get(), 3);

    // walking the same prefix again reuses the realized cells
    seq_fns::to_vec(&take(3, mapped).unwrap()).unwrap();
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_drop_and_concat() {
    let dropped = drop(2, StrataVal::list(ints(&[1, 2, 3, 4]))).unwrap();
    assert_eq!(seq_fns::to_vec(&dropped).unwrap(), ints(&[3, 4]));
    assert!(seq_fns::to_vec(&drop(10, StrataVal::vector(ints(&[1]))).unwrap()).unwrap().is_empty());

    let joined = concat(vec![
        StrataVal::vector(ints(&[1])),
        StrataVal::Nil,
        StrataVal::list(vec![]),
        take(2, naturals()).unwrap(),
    ])
    .unwrap();
    assert_eq!(seq_fns::to_vec(&joined).unwrap(), ints(&[1, 0, 1]));
}

#[test]
fn test_lazy_fns_reject_non_seqable_input() {
    assert_err_kind!(map(&square(), StrataVal::int(1)), ErrorKind::Usage);
    assert_err_kind!(filter(&is_even(), kw("a")), ErrorKind::Usage);
    assert_err_kind!(take(1, StrataVal::Bool(true)), ErrorKind::Usage);
    assert_err_kind!(concat(vec![StrataVal::Nil, StrataVal::int(3)]), ErrorKind::Usage);
}

#[test]
fn test_non_seqable_producer_result_is_a_type_error() {
    let rt = new_runtime();
    let lazy = StrataVal::lazy_seq(|| Ok(StrataVal::int(42)));
    assert_err_kind!(rt.count(&lazy), ErrorKind::Usage);
    assert_err_kind!(rt.seq(&lazy), ErrorKind::Usage);
    assert_err_kind!(rt.first(&lazy), ErrorKind::Usage);
    assert_err_kind!(rt.nth(&lazy, 0), ErrorKind::Usage);
    assert_err_kind!(seq_fns::to_vec(&lazy), ErrorKind::Usage);

    let err = rt.count(&lazy).unwrap_err();
    assert!(err.to_string().contains("lazy-seq body"), "{}", err);
}

#[test]
fn test_producer_errors_reach_every_traversal() {
    let rt = new_runtime();
    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let lazy = StrataVal::lazy_seq(move || {
        counter.set(counter.get() + 1);
        Err(Error::argument("source", "connection closed"))
    });
    let expected = Error::argument("source", "connection closed");

    assert_eq!(rt.count(&lazy).unwrap_err(), expected);
    assert_eq!(rt.first(&lazy).unwrap_err(), expected);
    assert_eq!(rt.reduce(&lazy, &constant("x"), StrataVal::Nil).unwrap_err(), expected);
    assert_eq!(runs.get(), 1);

    // a failing tail behind realized elements fails the walk at that point
    let prefixed = rt.conj(&lazy, StrataVal::int(1)).unwrap();
    assert_eq!(rt.first(&prefixed).unwrap(), StrataVal::int(1));
    assert_eq!(rt.nth(&prefixed, 0).unwrap(), StrataVal::int(1));
    assert_eq!(rt.count(&prefixed).unwrap_err(), expected);
    assert_eq!(rt.next(&prefixed).unwrap_err(), expected);
}

#[test]
fn test_failing_function_in_lazy_pipeline() {
    let rt = new_runtime();
    let mixed = StrataVal::vector(vec![StrataVal::int(1), StrataVal::int(2), kw("three")]);
    let incremented = map(&inc(), mixed).unwrap();
    assert_eq!(seq_fns::to_vec(&take(2, incremented.clone()).unwrap()).unwrap(), ints(&[2, 3]));
    assert_err_kind!(rt.count(&incremented), ErrorKind::Usage);
}

#[test]
fn test_reentrant_force_is_an_error() {
    let rt = new_runtime();
    let slot: Rc<RefCell<Option<StrataVal>>> = Rc::new(RefCell::new(None));
    let inner = Rc::clone(&slot);
    let lazy = StrataVal::lazy_seq(move || {
        let me = inner.borrow().clone().unwrap_or_default();
        let seen = seq_fns::to_vec(&me)?;
        Ok(StrataVal::vector(vec![StrataVal::from(seen.len())]))
    });
    *slot.borrow_mut() = Some(lazy.clone());

    let err = seq_fns::to_vec(&lazy).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    // the failure sticks
    assert_eq!(rt.count(&lazy).unwrap_err(), err);
    slot.borrow_mut().take();
}

#[test]
fn test_lazy_seq_of_lazy_seq_flattens() {
    let nested = StrataVal::lazy_seq(|| Ok(StrataVal::lazy_seq(|| Ok(StrataVal::list(ints(&[1, 2]))))));
    assert_eq!(seq_fns::to_vec(&nested).unwrap(), ints(&[1, 2]));
}

#[test]
fn test_conj_onto_lazy_seq_prepends() {
    let rt = new_runtime();
    let lazy = take(2, naturals()).unwrap();
    let grown = rt.conj(&lazy, StrataVal::int(-1)).unwrap();
    assert_eq!(seq_fns::to_vec(&grown).unwrap(), ints(&[-1, 0, 1]));
}

#[test]
fn test_printing_is_bounded() {
    let config = strata_core::RuntimeConfig::new().with_lazy_print_limit(3);
    let previous = config.apply();
    let printed = naturals().to_string();
    previous.apply();
    assert_eq!(printed, "(0 1 2 ...)");
}
