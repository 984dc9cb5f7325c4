// strata-core - Protocol-dispatched collection operations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The collection operation surface of a [`Runtime`].
//!
//! Every operation goes through the runtime's protocol table, so user types
//! that carry their own protocol hooks or register implementations for their
//! type tag take part exactly like the builtin collections.

use strata_value::{Error, Result, Seq, StrataFn, StrataVal};

use crate::protocol::names;
use crate::runtime::Runtime;

fn seq_result(val: StrataVal) -> Result<Option<Seq>> {
    match val {
        StrataVal::Nil => Ok(None),
        StrataVal::Seq(s) => Ok(Some(s)),
        other => other.try_seq(),
    }
}

fn bool_result(op: &'static str, val: StrataVal) -> Result<bool> {
    match val {
        StrataVal::Bool(b) => Ok(b),
        other => Err(Error::type_error_in(op, "bool", other.type_name())),
    }
}

impl Runtime {
    fn call(&self, protocol: &str, op: &str, args: &[StrataVal]) -> Result<StrataVal> {
        self.protocols().invoke(protocol, op, args)
    }

    // ========================================================================
    // Sequences
    // ========================================================================

    /// A fresh traversal of `coll`, `None` when it is empty.
    pub fn seq(&self, coll: &StrataVal) -> Result<Option<Seq>> {
        seq_result(self.call(names::SEQABLE, "seq", &[coll.clone()])?)
    }

    pub fn first(&self, coll: &StrataVal) -> Result<StrataVal> {
        self.call(names::SEQ, "first", &[coll.clone()])
    }

    /// Everything after the first element; the empty list when there is nothing.
    pub fn rest(&self, coll: &StrataVal) -> Result<StrataVal> {
        self.call(names::SEQ, "rest", &[coll.clone()])
    }

    /// Everything after the first element; nil when there is nothing.
    pub fn next(&self, coll: &StrataVal) -> Result<StrataVal> {
        self.call(names::NEXT, "next", &[coll.clone()])
    }

    pub fn count(&self, coll: &StrataVal) -> Result<usize> {
        match self.call(names::COUNTED, "count", &[coll.clone()])? {
            StrataVal::Int(n) => usize::try_from(n)
                .map_err(|_| Error::argument("count", format!("negative count {}", n))),
            other => Err(Error::type_error_in("count", "int", other.type_name())),
        }
    }

    // ========================================================================
    // Collections
    // ========================================================================

    pub fn conj(&self, coll: &StrataVal, x: StrataVal) -> Result<StrataVal> {
        self.call(names::COLLECTION, "conj", &[coll.clone(), x])
    }

    /// Add every element of `xs` in order.
    pub fn conj_all(&self, coll: &StrataVal, xs: Vec<StrataVal>) -> Result<StrataVal> {
        let mut args = Vec::with_capacity(xs.len() + 1);
        args.push(coll.clone());
        args.extend(xs);
        if args.len() == 1 {
            return Ok(coll.clone());
        }
        self.call(names::COLLECTION, "conj", &args)
    }

    /// An empty collection of the same kind.
    pub fn empty(&self, coll: &StrataVal) -> Result<StrataVal> {
        self.call(names::COLLECTION, "empty", &[coll.clone()])
    }

    pub fn nth(&self, coll: &StrataVal, index: i64) -> Result<StrataVal> {
        self.call(names::INDEXED, "nth", &[coll.clone(), StrataVal::Int(index)])
    }

    pub fn nth_or(&self, coll: &StrataVal, index: i64, not_found: StrataVal) -> Result<StrataVal> {
        self.call(
            names::INDEXED,
            "nth",
            &[coll.clone(), StrataVal::Int(index), not_found],
        )
    }

    /// The value at `key`; [`Error::KeyNotFound`] when it is missing.
    pub fn get(&self, coll: &StrataVal, key: &StrataVal) -> Result<StrataVal> {
        self.call(names::LOOKUP, "get", &[coll.clone(), key.clone()])
    }

    pub fn get_or(&self, coll: &StrataVal, key: &StrataVal, not_found: StrataVal) -> Result<StrataVal> {
        self.call(names::LOOKUP, "get", &[coll.clone(), key.clone(), not_found])
    }

    /// Whether `coll` has an entry for `key` (an index for vectors, a member for sets).
    pub fn contains(&self, coll: &StrataVal, key: &StrataVal) -> Result<bool> {
        bool_result(
            "contains",
            self.call(names::ASSOCIATIVE, "contains-key", &[coll.clone(), key.clone()])?,
        )
    }

    pub fn assoc(&self, coll: &StrataVal, key: StrataVal, val: StrataVal) -> Result<StrataVal> {
        self.call(names::ASSOCIATIVE, "assoc", &[coll.clone(), key, val])
    }

    pub fn dissoc(&self, coll: &StrataVal, key: &StrataVal) -> Result<StrataVal> {
        self.call(names::MAP, "dissoc", &[coll.clone(), key.clone()])
    }

    pub fn disj(&self, coll: &StrataVal, x: &StrataVal) -> Result<StrataVal> {
        self.call(names::SET, "disj", &[coll.clone(), x.clone()])
    }

    pub fn peek(&self, coll: &StrataVal) -> Result<StrataVal> {
        self.call(names::STACK, "peek", &[coll.clone()])
    }

    pub fn pop(&self, coll: &StrataVal) -> Result<StrataVal> {
        self.call(names::STACK, "pop", &[coll.clone()])
    }

    pub fn reduce(&self, coll: &StrataVal, f: &StrataFn, init: StrataVal) -> Result<StrataVal> {
        self.call(
            names::REDUCIBLE,
            "reduce",
            &[coll.clone(), StrataVal::Fn(f.clone()), init],
        )
    }

    // ========================================================================
    // Equality, hashing, metadata
    // ========================================================================

    pub fn equiv(&self, a: &StrataVal, b: &StrataVal) -> Result<bool> {
        bool_result("equiv", self.call(names::EQUIV, "equiv", &[a.clone(), b.clone()])?)
    }

    pub fn hash(&self, val: &StrataVal) -> Result<u64> {
        match self.call(names::HASHABLE, "hash", &[val.clone()])? {
            StrataVal::Int(h) => Ok(h as u64),
            other => Err(Error::type_error_in("hash", "int", other.type_name())),
        }
    }

    /// Metadata attached to `val`, if any.
    pub fn meta(&self, val: &StrataVal) -> Result<Option<StrataVal>> {
        let meta = self.call(names::META, "meta", &[val.clone()])?;
        Ok((!meta.is_nil()).then_some(meta))
    }

    pub fn with_meta(&self, val: &StrataVal, meta: Option<StrataVal>) -> Result<StrataVal> {
        self.call(
            names::META,
            "with-meta",
            &[val.clone(), meta.unwrap_or(StrataVal::Nil)],
        )
    }

    /// True when every operation of `protocol` resolves for `val`.
    pub fn satisfies(&self, protocol: &str, val: &StrataVal) -> bool {
        self.protocols().satisfies(protocol, val)
    }
}
