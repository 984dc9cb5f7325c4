// strata-value - String-keyed map
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A map whose keys are all strings.
//!
//! Backed by a key→value table plus an explicit key list that keeps
//! insertion order. Associating a non-string key promotes the map to a
//! [`PersistentHashMap`].

use std::rc::Rc;

use super::{MetaSlot, PersistentHashMap, map_entries_of, meta_slot};
use crate::error::Result;
use crate::seq::Seq;
use crate::traits::{
    Associative, Collection, Counted, Lookup, MapLike, Reducible, Seqable, WithMeta,
};
use crate::value::{Meta, StrataVal};

#[derive(Clone, Default)]
pub struct ObjMap {
    keys: im::Vector<Rc<str>>,
    table: im::HashMap<Rc<str>, StrataVal>,
    meta: MetaSlot,
}

impl ObjMap {
    pub fn new() -> Self {
        ObjMap::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get_str(&self, key: &str) -> Option<StrataVal> {
        self.table.get(key).cloned()
    }

    pub fn assoc_str(&self, key: Rc<str>, val: StrataVal) -> Self {
        let mut keys = self.keys.clone();
        if !self.table.contains_key(&key) {
            keys.push_back(Rc::clone(&key));
        }
        ObjMap {
            keys,
            table: self.table.update(key, val),
            meta: self.meta.clone(),
        }
    }

    pub fn dissoc_str(&self, key: &str) -> Self {
        if !self.table.contains_key(key) {
            return self.clone();
        }
        let mut keys = self.keys.clone();
        if let Some(pos) = keys.index_of(&Rc::from(key)) {
            keys.remove(pos);
        }
        ObjMap {
            keys,
            table: self.table.without(key),
            meta: self.meta.clone(),
        }
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StrataVal, StrataVal)> + '_ {
        self.keys.iter().map(|k| {
            let val = self.table.get(k).cloned().unwrap_or(StrataVal::Nil);
            (StrataVal::Str(Rc::clone(k)), val)
        })
    }

    fn promote(&self) -> PersistentHashMap {
        PersistentHashMap::from_pairs(self.iter().collect()).with_meta(self.meta.as_deref().cloned())
    }

    fn assoc_val(&self, key: StrataVal, val: StrataVal) -> StrataVal {
        match key {
            StrataVal::Str(k) => StrataVal::ObjMap(self.assoc_str(k, val)),
            other => StrataVal::HashMap(self.promote().insert(other, val)),
        }
    }
}

impl Seqable for ObjMap {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_vec(
            self.iter()
                .map(|(k, v)| StrataVal::vector(vec![k, v]))
                .collect(),
        ))
    }
}

impl Counted for ObjMap {
    fn count(&self) -> usize {
        self.keys.len()
    }
}

impl Collection for ObjMap {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        let mut acc = StrataVal::ObjMap(self.clone());
        for (k, v) in map_entries_of(&x)? {
            acc = match acc {
                StrataVal::ObjMap(m) => m.assoc_val(k, v),
                StrataVal::HashMap(m) => StrataVal::HashMap(m.insert(k, v)),
                other => other,
            };
        }
        Ok(acc)
    }

    fn empty(&self) -> StrataVal {
        StrataVal::ObjMap(ObjMap {
            keys: im::Vector::new(),
            table: im::HashMap::new(),
            meta: self.meta.clone(),
        })
    }
}

impl Lookup for ObjMap {
    fn lookup(&self, key: &StrataVal) -> Option<StrataVal> {
        match key {
            StrataVal::Str(k) => self.get_str(k),
            _ => None,
        }
    }
}

impl Associative for ObjMap {
    fn assoc(&self, key: StrataVal, val: StrataVal) -> Result<StrataVal> {
        Ok(self.assoc_val(key, val))
    }
}

impl MapLike for ObjMap {
    fn dissoc(&self, key: &StrataVal) -> StrataVal {
        match key {
            StrataVal::Str(k) => StrataVal::ObjMap(self.dissoc_str(k)),
            _ => StrataVal::ObjMap(self.clone()),
        }
    }

    fn entries(&self) -> Vec<(StrataVal, StrataVal)> {
        self.iter().collect()
    }
}

impl Reducible for ObjMap {}

impl WithMeta for ObjMap {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        ObjMap {
            keys: self.keys.clone(),
            table: self.table.clone(),
            meta: meta_slot(meta),
        }
    }
}
