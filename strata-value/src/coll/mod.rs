// strata-value - Persistent collections
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The immutable collection family.
//!
//! Every update returns a new value and leaves the receiver untouched.
//! Vectors and maps share structure with the value they were derived from
//! through `im`; lists share their tails.

mod array;
mod hash_map;
mod lazy_seq;
mod list;
mod obj_map;
mod queue;
mod range;
mod set;
mod subvec;
mod vector;

pub use array::HostArray;
pub use hash_map::PersistentHashMap;
pub use lazy_seq::LazySeq;
pub use list::PersistentList;
pub use obj_map::ObjMap;
pub use queue::PersistentQueue;
pub use range::Range;
pub use set::PersistentSet;
pub use subvec::Subvec;
pub use vector::PersistentVector;

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::value::{Meta, StrataVal};

/// Metadata slot shared by every collection.
pub(crate) type MetaSlot = Option<Rc<Meta>>;

pub(crate) fn meta_slot(meta: Option<Meta>) -> MetaSlot {
    meta.map(Rc::new)
}

/// Interpret `key` as a collection index.
pub(crate) fn index_key(op: &'static str, key: &StrataVal) -> Result<i64> {
    match key {
        StrataVal::Int(i) => Ok(*i),
        other => Err(Error::type_error_in(op, "int", other.type_name())),
    }
}

/// Split a value conj'd onto a map into its entries: a `[k v]` pair or
/// another map.
pub(crate) fn map_entries_of(x: &StrataVal) -> Result<Vec<(StrataVal, StrataVal)>> {
    if let Some(map) = x.as_map() {
        return Ok(map.entries());
    }
    match x {
        StrataVal::Vector(v) if v.len() == 2 => Ok(vec![(v.items()[0].clone(), v.items()[1].clone())]),
        other => Err(Error::argument(
            "conj",
            format!("Can't conj {} onto a map, expected a [key value] pair", other),
        )),
    }
}
