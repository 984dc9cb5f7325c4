// strata-value - Vector windows
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A `(parent, start, end)` window over a vector.
//!
//! The window shares the parent's storage. Updates write through to a new
//! parent at the shifted index and return a new window over it.

use super::{MetaSlot, PersistentVector, index_key, meta_slot};
use crate::error::{Error, Result};
use crate::seq::Seq;
use crate::traits::{
    Associative, Collection, Counted, Indexed, Lookup, ReduceFn, Reducible, Seqable, Stack,
    WithMeta,
};
use crate::value::{Meta, StrataVal};

#[derive(Clone)]
pub struct Subvec {
    parent: PersistentVector,
    start: usize,
    end: usize,
    meta: MetaSlot,
}

impl Subvec {
    /// Window over `parent[start..end]`.
    pub fn new(parent: PersistentVector, start: usize, end: usize) -> Result<Self> {
        if start > end || end > parent.len() {
            return Err(Error::argument(
                "subvec",
                format!(
                    "Window [{}, {}) does not fit a vector of length {}",
                    start,
                    end,
                    parent.len()
                ),
            ));
        }
        Ok(Subvec {
            parent,
            start,
            end,
            meta: None,
        })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn with_parent(&self, parent: PersistentVector, end: usize) -> Self {
        Subvec {
            parent,
            start: self.start,
            end,
            meta: self.meta.clone(),
        }
    }

    /// Replace the element at `index`, or append when `index == len`.
    pub fn assoc_n(&self, index: i64, x: StrataVal) -> Result<Self> {
        let len = self.len();
        match usize::try_from(index) {
            Ok(i) if i < len => {
                let parent = self.parent.assoc_n((self.start + i) as i64, x)?;
                Ok(self.with_parent(parent, self.end))
            }
            Ok(i) if i == len => {
                let parent = self.parent.assoc_n(self.end as i64, x)?;
                Ok(self.with_parent(parent, self.end + 1))
            }
            _ => Err(Error::out_of_bounds(index, len)),
        }
    }
}

impl Seqable for Subvec {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_vector(self.parent.items().clone(), self.start, self.end))
    }
}

impl Counted for Subvec {
    fn count(&self) -> usize {
        self.len()
    }
}

impl Collection for Subvec {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::Subvec(self.assoc_n(self.len() as i64, x)?))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::Vector(PersistentVector::new().with_meta(self.meta.as_deref().cloned()))
    }
}

impl Indexed for Subvec {
    fn nth(&self, index: usize) -> Option<StrataVal> {
        if index < self.len() {
            self.parent.nth(self.start + index)
        } else {
            None
        }
    }
}

impl Lookup for Subvec {
    fn lookup(&self, key: &StrataVal) -> Option<StrataVal> {
        match key {
            StrataVal::Int(i) => usize::try_from(*i).ok().and_then(|i| self.nth(i)),
            _ => None,
        }
    }
}

impl Associative for Subvec {
    fn assoc(&self, key: StrataVal, val: StrataVal) -> Result<StrataVal> {
        let index = index_key("assoc", &key)?;
        Ok(StrataVal::Subvec(self.assoc_n(index, val)?))
    }
}

impl Stack for Subvec {
    fn peek(&self) -> Result<StrataVal> {
        if self.is_empty() {
            return Err(Error::empty("peek", "subvec"));
        }
        self.nth_checked((self.len() - 1) as i64)
    }

    fn pop(&self) -> Result<StrataVal> {
        if self.is_empty() {
            return Err(Error::empty("pop", "subvec"));
        }
        Ok(StrataVal::Subvec(self.with_parent(self.parent.clone(), self.end - 1)))
    }
}

impl Reducible for Subvec {
    fn reduce(&self, f: ReduceFn<'_>, init: StrataVal) -> Result<StrataVal> {
        self.parent
            .items()
            .iter()
            .skip(self.start)
            .take(self.len())
            .cloned()
            .try_fold(init, f)
    }
}

impl WithMeta for Subvec {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        Subvec {
            parent: self.parent.clone(),
            start: self.start,
            end: self.end,
            meta: meta_slot(meta),
        }
    }
}


impl std::fmt::Debug for Subvec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", StrataVal::Subvec(self.clone()))
    }
}
