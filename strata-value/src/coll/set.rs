// strata-value - Hash set
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A hash set stored as a [`PersistentHashMap`] from each member to itself.

use super::{MetaSlot, PersistentHashMap, meta_slot};
use crate::error::Result;
use crate::seq::Seq;
use crate::traits::{Collection, Counted, Lookup, Reducible, Seqable, SetLike, WithMeta};
use crate::value::{Meta, StrataVal};

#[derive(Clone, Default)]
pub struct PersistentSet {
    members: PersistentHashMap,
    meta: MetaSlot,
}

impl PersistentSet {
    pub fn new() -> Self {
        PersistentSet::default()
    }

    pub fn from_vec(items: Vec<StrataVal>) -> Self {
        items
            .into_iter()
            .fold(PersistentSet::new(), |set, x| set.insert(x))
    }

    pub fn insert(&self, x: StrataVal) -> Self {
        if self.members.get_entry(&x).is_some() {
            return self.clone();
        }
        PersistentSet {
            members: self.members.insert(x.clone(), x),
            meta: self.meta.clone(),
        }
    }

    pub fn remove(&self, x: &StrataVal) -> Self {
        PersistentSet {
            members: self.members.remove(x),
            meta: self.meta.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StrataVal> + '_ {
        self.members.keys()
    }
}

impl Seqable for PersistentSet {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_vec(self.iter().collect()))
    }
}

impl Counted for PersistentSet {
    fn count(&self) -> usize {
        self.members.len()
    }
}

impl Collection for PersistentSet {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::Set(self.insert(x)))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::Set(PersistentSet {
            members: PersistentHashMap::new(),
            meta: self.meta.clone(),
        })
    }
}

impl Lookup for PersistentSet {
    /// The stored member equal to `key`.
    fn lookup(&self, key: &StrataVal) -> Option<StrataVal> {
        self.members.get_entry(key).map(|(k, _)| k)
    }
}

impl SetLike for PersistentSet {
    fn contains(&self, x: &StrataVal) -> bool {
        self.members.get_entry(x).is_some()
    }

    fn disj(&self, x: &StrataVal) -> StrataVal {
        StrataVal::Set(self.remove(x))
    }
}

impl Reducible for PersistentSet {}

impl WithMeta for PersistentSet {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        PersistentSet {
            members: self.members.clone(),
            meta: meta_slot(meta),
        }
    }
}
