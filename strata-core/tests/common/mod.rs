// strata-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for strata-core integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`init_tracing`] - Route `tracing` output through the test harness
//! - [`new_runtime`] - A fresh runtime with tracing installed
//! - [`constant`] - A native function that ignores its arguments
//! - [`inc`] - A native function adding one to an integer
//! - [`shape`] - A map tagged with `:shape-tag`
//!
//! # Macros
//!
//! - [`assert_err_kind!`] - Assert that a result is an error of a given kind

#![allow(dead_code)]

use std::sync::Once;

pub use strata_core::{
    Error, ErrorKind, Hierarchy, HierarchyRef, Keyword, MultiFn, Runtime, StrataFn, StrataVal,
};

static TRACING: Once = Once::new();

/// Install a `tracing` subscriber that honours `RUST_LOG` and writes through
/// the test harness. Safe to call from every test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Create a runtime with tracing installed.
#[must_use]
pub fn new_runtime() -> Runtime {
    init_tracing();
    Runtime::new()
}

#[must_use]
pub fn kw(s: &str) -> StrataVal {
    StrataVal::keyword(s)
}

#[must_use]
pub fn ints(ns: &[i64]) -> Vec<StrataVal> {
    ns.iter().map(|n| StrataVal::int(*n)).collect()
}

/// A function returning the string `name` whatever it is called with.
#[must_use]
pub fn constant(name: &str) -> StrataFn {
    let result = StrataVal::string(name);
    StrataFn::new(name, move |_| Ok(result.clone()))
}

/// Adds one to an integer; anything else is a type error.
#[must_use]
pub fn inc() -> StrataFn {
    StrataFn::new("inc", |args| match &args[0] {
        StrataVal::Int(n) => Ok(StrataVal::int(n + 1)),
        other => Err(Error::type_error_in("inc", "int", other.type_name())),
    })
}

/// A map `{:shape-tag tag}`.
#[must_use]
pub fn shape(tag: &str) -> StrataVal {
    StrataVal::map(vec![(kw("shape-tag"), kw(tag))])
}

/// Dispatch on the `:shape-tag` entry of the first argument.
#[must_use]
pub fn shape_tag_dispatch() -> StrataFn {
    StrataFn::keyword_getter(Keyword::new("shape-tag"))
}

/// Assert that `result` is an error in the given taxonomy bucket.
#[macro_export]
macro_rules! assert_err_kind {
    ($result:expr, $kind:expr) => {
        match $result {
            Ok(val) => panic!("Expected {:?} error but got {:?}", $kind, val),
            Err(err) => assert_eq!(err.kind(), $kind, "unexpected error: {}", err),
        }
    };
}
