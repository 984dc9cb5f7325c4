// strata-value - Structural equality and hashing
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Structural equality and hashing for [`StrataVal`].
//!
//! Sequential values are equal when their elements are equal in order,
//! whatever their concrete types. Maps are equal when they have the same
//! entries, sets when they have the same members. Metadata never takes part.
//! Integers and floats are distinct values and never compare equal.

use std::hash::{DefaultHasher, Hash, Hasher};

use crate::seq::SeqIter;
use crate::tag::is_array_like;
use crate::traits::{Equiv, Hashable, Lookup, SetLike};
use crate::value::StrataVal;

// ============================================================================
// Equality
// ============================================================================

fn sequential_equiv(a: &StrataVal, b: &StrataVal) -> bool {
    if let (Some(n), Some(m)) = (a.fast_count(), b.fast_count())
        && n != m
    {
        return false;
    }
    // Equality can't fail: a sequence that fails to realize ends where it fails
    let mut left = SeqIter::from(a.seq_or_empty()).values();
    let mut right = SeqIter::from(b.seq_or_empty()).values();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x.equiv(&y) => continue,
            _ => return false,
        }
    }
}

fn map_equiv(a: &StrataVal, b: &StrataVal) -> bool {
    let (Some(left), Some(right)) = (a.as_map(), b.as_map()) else {
        return false;
    };
    if a.fast_count() != b.fast_count() {
        return false;
    }
    left.entries()
        .into_iter()
        .all(|(k, v)| right.lookup(&k).is_some_and(|other| other.equiv(&v)))
}

fn set_equiv(a: &StrataVal, b: &StrataVal) -> bool {
    let (StrataVal::Set(left), StrataVal::Set(right)) = (a, b) else {
        return false;
    };
    left.len() == right.len() && left.iter().all(|x| right.contains(&x))
}

fn float_bits(f: f64) -> u64 {
    // -0.0 and 0.0 are the same value
    if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() }
}

impl Equiv for StrataVal {
    fn equiv(&self, other: &StrataVal) -> bool {
        match (self, other) {
            (StrataVal::Nil, StrataVal::Nil) => true,
            (StrataVal::Bool(a), StrataVal::Bool(b)) => a == b,
            (StrataVal::Int(a), StrataVal::Int(b)) => a == b,
            (StrataVal::Float(a), StrataVal::Float(b)) => float_bits(*a) == float_bits(*b),
            (StrataVal::Str(a), StrataVal::Str(b)) => a == b,
            (StrataVal::Keyword(a), StrataVal::Keyword(b)) => a == b,
            (StrataVal::Fn(a), StrataVal::Fn(b)) => a.ptr_eq(b),
            (StrataVal::Object(a), StrataVal::Object(b))
                if std::ptr::addr_eq(std::rc::Rc::as_ptr(a), std::rc::Rc::as_ptr(b)) =>
            {
                true
            }
            (StrataVal::Object(a), StrataVal::Object(b))
                if a.type_name().is_some() || !is_array_like(a.as_ref()) =>
            {
                a.equiv(b.as_ref())
            }
            _ if self.is_sequential() && other.is_sequential() => sequential_equiv(self, other),
            _ if self.is_map() && other.is_map() => map_equiv(self, other),
            _ if self.is_set() && other.is_set() => set_equiv(self, other),
            _ => false,
        }
    }
}

impl PartialEq for StrataVal {
    fn eq(&self, other: &Self) -> bool {
        self.equiv(other)
    }
}

impl Eq for StrataVal {}

// ============================================================================
// Hashing
// ============================================================================

const SEQUENTIAL_SEED: u64 = 0x5eed_0001;
const MAP_SEED: u64 = 0x5eed_0002;
const SET_SEED: u64 = 0x5eed_0003;

fn hash_one<T: Hash + ?Sized>(discriminant: u8, value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    discriminant.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}

/// Order-sensitive combination of element hashes.
fn hash_ordered(items: impl Iterator<Item = u64>) -> u64 {
    let mut count = 0u64;
    let mut acc = 1u64;
    for h in items {
        acc = acc.wrapping_mul(31).wrapping_add(h);
        count += 1;
    }
    mix_coll_hash(SEQUENTIAL_SEED, acc, count)
}

/// Order-insensitive combination of element hashes.
fn hash_unordered(seed: u64, items: impl Iterator<Item = u64>) -> u64 {
    let mut count = 0u64;
    let mut acc = 0u64;
    for h in items {
        acc = acc.wrapping_add(h);
        count += 1;
    }
    mix_coll_hash(seed, acc, count)
}

fn mix_coll_hash(seed: u64, acc: u64, count: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    acc.hash(&mut hasher);
    count.hash(&mut hasher);
    hasher.finish()
}

impl Hashable for StrataVal {
    fn hash_code(&self) -> u64 {
        match self {
            StrataVal::Nil => hash_one(0, &()),
            StrataVal::Bool(b) => hash_one(1, b),
            StrataVal::Int(n) => hash_one(2, n),
            StrataVal::Float(f) => hash_one(3, &float_bits(*f)),
            StrataVal::Str(s) => hash_one(4, &**s),
            StrataVal::Keyword(kw) => hash_one(5, kw),
            StrataVal::Fn(f) => hash_one(6, &f.addr()),
            // Array-like objects hash as sequences below. Other objects
            // without their own hash only equal themselves or objects of the
            // same type, so the type name is enough.
            StrataVal::Object(obj) if !self.is_sequential() => obj
                .hash_code()
                .unwrap_or_else(|| hash_one(7, obj.type_name().unwrap_or("object"))),
            _ if self.is_map() => {
                let entries = self.as_map().map(|m| m.entries()).unwrap_or_default();
                hash_unordered(
                    MAP_SEED,
                    entries
                        .iter()
                        .map(|(k, v)| k.hash_code().wrapping_mul(31) ^ v.hash_code()),
                )
            }
            StrataVal::Set(set) => hash_unordered(SET_SEED, set.iter().map(|x| x.hash_code())),
            _ => hash_ordered(
                SeqIter::from(self.seq_or_empty())
                    .values()
                    .map(|x| x.hash_code()),
            ),
        }
    }
}

impl Hash for StrataVal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}
