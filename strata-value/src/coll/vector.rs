// strata-value - Persistent vector
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! An indexed vector backed by `im::Vector`. Updates happen at the tail.

use super::{MetaSlot, Subvec, index_key, meta_slot};
use crate::error::{Error, Result};
use crate::seq::Seq;
use crate::traits::{
    Associative, Collection, Counted, Indexed, Lookup, ReduceFn, Reducible, Seqable, Stack,
    WithMeta,
};
use crate::value::{Meta, StrataVal};

#[derive(Clone, Default)]
pub struct PersistentVector {
    items: im::Vector<StrataVal>,
    meta: MetaSlot,
}

impl PersistentVector {
    pub fn new() -> Self {
        PersistentVector::default()
    }

    pub fn from_vec(items: Vec<StrataVal>) -> Self {
        PersistentVector {
            items: items.into_iter().collect(),
            meta: None,
        }
    }

    pub(crate) fn from_items(items: im::Vector<StrataVal>) -> Self {
        PersistentVector { items, meta: None }
    }

    pub fn items(&self) -> &im::Vector<StrataVal> {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&self, x: StrataVal) -> Self {
        let mut items = self.items.clone();
        items.push_back(x);
        PersistentVector {
            items,
            meta: self.meta.clone(),
        }
    }

    /// Replace the element at `index`, or append when `index == len`.
    pub fn assoc_n(&self, index: i64, x: StrataVal) -> Result<Self> {
        let len = self.items.len();
        match usize::try_from(index) {
            Ok(i) if i < len => Ok(PersistentVector {
                items: self.items.update(i, x),
                meta: self.meta.clone(),
            }),
            Ok(i) if i == len => Ok(self.push(x)),
            _ => Err(Error::out_of_bounds(index, len)),
        }
    }

    /// A window over `[start, end)` sharing this vector's storage.
    pub fn subvec(&self, start: usize, end: usize) -> Result<Subvec> {
        Subvec::new(self.clone(), start, end)
    }
}

impl Seqable for PersistentVector {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_vector(self.items.clone(), 0, self.items.len()))
    }
}

impl Counted for PersistentVector {
    fn count(&self) -> usize {
        self.items.len()
    }
}

impl Collection for PersistentVector {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::Vector(self.push(x)))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::Vector(PersistentVector {
            items: im::Vector::new(),
            meta: self.meta.clone(),
        })
    }
}

impl Indexed for PersistentVector {
    fn nth(&self, index: usize) -> Option<StrataVal> {
        self.items.get(index).cloned()
    }
}

impl Lookup for PersistentVector {
    fn lookup(&self, key: &StrataVal) -> Option<StrataVal> {
        match key {
            StrataVal::Int(i) => usize::try_from(*i).ok().and_then(|i| self.nth(i)),
            _ => None,
        }
    }
}

impl Associative for PersistentVector {
    fn assoc(&self, key: StrataVal, val: StrataVal) -> Result<StrataVal> {
        let index = index_key("assoc", &key)?;
        Ok(StrataVal::Vector(self.assoc_n(index, val)?))
    }
}

impl Stack for PersistentVector {
    fn peek(&self) -> Result<StrataVal> {
        self.items
            .back()
            .cloned()
            .ok_or_else(|| Error::empty("peek", "vector"))
    }

    fn pop(&self) -> Result<StrataVal> {
        if self.items.is_empty() {
            return Err(Error::empty("pop", "vector"));
        }
        let mut items = self.items.clone();
        items.pop_back();
        Ok(StrataVal::Vector(PersistentVector {
            items,
            meta: self.meta.clone(),
        }))
    }
}

impl Reducible for PersistentVector {
    fn reduce(&self, f: ReduceFn<'_>, init: StrataVal) -> Result<StrataVal> {
        self.items.iter().cloned().try_fold(init, f)
    }
}

impl WithMeta for PersistentVector {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        PersistentVector {
            items: self.items.clone(),
            meta: meta_slot(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_of(ns: &[i64]) -> PersistentVector {
        PersistentVector::from_vec(ns.iter().map(|n| StrataVal::int(*n)).collect())
    }

    #[test]
    fn test_conj_appends() {
        let v = vec_of(&[1, 2]);
        assert_eq!(v.conj(StrataVal::int(3)).unwrap(), StrataVal::Vector(vec_of(&[1, 2, 3])));
        assert_eq!(v.count(), 2);
    }

    #[test]
    fn test_assoc_bounds() {
        let v = vec_of(&[1, 2]);
        assert_eq!(
            v.assoc(StrataVal::int(0), StrataVal::int(9)).unwrap(),
            StrataVal::Vector(vec_of(&[9, 2]))
        );
        // Assoc at count appends
        assert_eq!(
            v.assoc(StrataVal::int(2), StrataVal::int(3)).unwrap(),
            StrataVal::Vector(vec_of(&[1, 2, 3]))
        );
        assert!(matches!(
            v.assoc(StrataVal::int(3), StrataVal::int(0)),
            Err(Error::IndexOutOfBounds { index: 3, length: 2 })
        ));
        assert!(matches!(
            v.assoc(StrataVal::int(-1), StrataVal::int(0)),
            Err(Error::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            v.assoc(StrataVal::keyword("a"), StrataVal::int(0)),
            Err(Error::TypeError { .. })
        ));
    }

    #[test]
    fn test_pop_peek() {
        let v = vec_of(&[1, 2]);
        assert_eq!(v.peek().unwrap(), StrataVal::int(2));
        assert_eq!(v.pop().unwrap(), StrataVal::Vector(vec_of(&[1])));
        assert!(matches!(
            PersistentVector::new().pop(),
            Err(Error::EmptyCollection { op: "pop", .. })
        ));
    }

    #[test]
    fn test_nth_checked() {
        let v = vec_of(&[5]);
        assert_eq!(v.nth_checked(0).unwrap(), StrataVal::int(5));
        assert!(matches!(
            v.nth_checked(1),
            Err(Error::IndexOutOfBounds { index: 1, length: 1 })
        ));
    }
}
