// strata-value - Collection traits
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The core collection capabilities as native traits.
//!
//! Each builtin collection implements the traits it supports directly. The
//! protocol table in `strata-core` delegates its builtin entries to these
//! traits, and falls back to its `"_"` default only for values that
//! implement none of them.
//!
//! `Counted` and `Indexed` answer without failing, so they are implemented
//! only by collections that hold their elements. Lazy sequences and cons
//! cells are counted and indexed by walking, which can fail.

use crate::error::{Error, Result};
use crate::seq::{Seq, SeqIter};
use crate::value::{Meta, StrataVal};

/// Values that can produce a fresh traversal of their elements.
pub trait Seqable {
    /// `Ok(None)` iff the value is empty. Each call yields an independent
    /// cursor. Fails only when realizing a lazy sequence fails.
    fn seq(&self) -> Result<Option<Seq>>;
}

pub trait Counted: Seqable {
    fn count(&self) -> usize;
}

pub trait Collection {
    /// Add `x` at the type's canonical position.
    fn conj(&self, x: StrataVal) -> Result<StrataVal>;

    /// An empty collection of the same kind, keeping metadata.
    fn empty(&self) -> StrataVal;
}

pub trait Indexed: Counted {
    fn nth(&self, index: usize) -> Option<StrataVal>;

    /// Like [`nth`](Self::nth) but fails on an index outside the collection.
    fn nth_checked(&self, index: i64) -> Result<StrataVal> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.nth(i))
            .ok_or_else(|| Error::out_of_bounds(index, self.count()))
    }
}

pub trait Lookup {
    fn lookup(&self, key: &StrataVal) -> Option<StrataVal>;

    fn contains_key(&self, key: &StrataVal) -> bool {
        self.lookup(key).is_some()
    }
}

pub trait Associative: Lookup {
    fn assoc(&self, key: StrataVal, val: StrataVal) -> Result<StrataVal>;
}

pub trait MapLike: Associative {
    /// The map without `key`. Absent keys return an equal map.
    fn dissoc(&self, key: &StrataVal) -> StrataVal;

    /// Entries in the map's iteration order.
    fn entries(&self) -> Vec<(StrataVal, StrataVal)>;
}

pub trait SetLike {
    fn contains(&self, x: &StrataVal) -> bool;

    fn disj(&self, x: &StrataVal) -> StrataVal;
}

pub trait Stack {
    /// The element `pop` would remove.
    fn peek(&self) -> Result<StrataVal>;

    fn pop(&self) -> Result<StrataVal>;
}

/// Reducing function handed to [`Reducible::reduce`].
pub type ReduceFn<'a> = &'a dyn Fn(StrataVal, StrataVal) -> Result<StrataVal>;

pub trait Reducible: Seqable {
    fn reduce(&self, f: ReduceFn<'_>, init: StrataVal) -> Result<StrataVal> {
        SeqIter::from(self.seq()?).try_fold(init, |acc, item| f(acc, item?))
    }
}

/// Structural equality across concrete types.
pub trait Equiv {
    fn equiv(&self, other: &StrataVal) -> bool;
}

/// Hash consistent with [`Equiv`].
pub trait Hashable {
    fn hash_code(&self) -> u64;
}

pub trait WithMeta: Sized {
    fn meta(&self) -> Option<&Meta>;

    fn with_meta(&self, meta: Option<Meta>) -> Self;
}
