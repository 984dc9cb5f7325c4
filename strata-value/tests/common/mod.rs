// strata-value - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared test helpers for strata-value integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::sync::Once;

pub use strata_value::{Error, ErrorKind, StrataVal};

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

/// Integers as a `Vec` of values.
#[must_use]
pub fn ints(ns: &[i64]) -> Vec<StrataVal> {
    ns.iter().map(|n| StrataVal::int(*n)).collect()
}

#[must_use]
pub fn kw(s: &str) -> StrataVal {
    StrataVal::keyword(s)
}

#[must_use]
pub fn s(text: &str) -> StrataVal {
    StrataVal::string(text)
}

/// Collect the elements of any seqable value.
#[must_use]
pub fn elements(val: &StrataVal) -> Vec<StrataVal> {
    strata_value::SeqIter::from(val.try_seq().expect("value should be seqable"))
        .collect::<strata_value::Result<_>>()
        .expect("every element should realize")
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

/// Assert that two values are equal and hash alike.
#[macro_export]
macro_rules! assert_equiv {
    ($left:expr, $right:expr) => {{
        use strata_value::Hashable;
        let (left, right) = (&$left, &$right);
        assert_eq!(left, right);
        assert_eq!(
            left.hash_code(),
            right.hash_code(),
            "equal values {} and {} hash differently",
            left,
            right
        );
    }};
}
