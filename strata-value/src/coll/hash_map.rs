// strata-value - Hash map for arbitrary keys
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A hash map keyed by any value.
//!
//! Keys are grouped into buckets by their hash code. A bucket is a flat
//! array of interleaved keys and values scanned linearly for an equal key.
//! The bucket directory is an `im::OrdMap`, so an update copies only the
//! touched bucket and the directory path leading to it.

use std::rc::Rc;

use super::{MetaSlot, map_entries_of, meta_slot};
use crate::error::Result;
use crate::seq::Seq;
use crate::traits::{
    Associative, Collection, Counted, Hashable, Lookup, MapLike, Reducible, Seqable, WithMeta,
};
use crate::value::{Meta, StrataVal};

/// `[k0, v0, k1, v1, ...]`
type Bucket = Rc<[StrataVal]>;

#[derive(Clone, Default)]
pub struct PersistentHashMap {
    buckets: im::OrdMap<u64, Bucket>,
    count: usize,
    meta: MetaSlot,
}

/// Position of `key` in a bucket.
fn find_key(bucket: &[StrataVal], key: &StrataVal) -> Option<usize> {
    (0..bucket.len()).step_by(2).find(|&i| bucket[i] == *key)
}

impl PersistentHashMap {
    pub fn new() -> Self {
        PersistentHashMap::default()
    }

    pub fn from_pairs(pairs: Vec<(StrataVal, StrataVal)>) -> Self {
        pairs
            .into_iter()
            .fold(PersistentHashMap::new(), |map, (k, v)| map.insert(k, v))
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The stored key and its value.
    pub fn get_entry(&self, key: &StrataVal) -> Option<(StrataVal, StrataVal)> {
        let bucket = self.buckets.get(&key.hash_code())?;
        find_key(bucket, key).map(|i| (bucket[i].clone(), bucket[i + 1].clone()))
    }

    pub fn get(&self, key: &StrataVal) -> Option<StrataVal> {
        self.get_entry(key).map(|(_, v)| v)
    }

    /// The map with `key` bound to `val`.
    pub fn insert(&self, key: StrataVal, val: StrataVal) -> Self {
        let hash = key.hash_code();
        let (bucket, added): (Vec<StrataVal>, bool) = match self.buckets.get(&hash) {
            Some(bucket) => match find_key(bucket, &key) {
                Some(i) => {
                    let mut entries = bucket.to_vec();
                    entries[i + 1] = val;
                    (entries, false)
                }
                None => {
                    let mut entries = bucket.to_vec();
                    entries.push(key);
                    entries.push(val);
                    (entries, true)
                }
            },
            None => (vec![key, val], true),
        };
        PersistentHashMap {
            buckets: self.buckets.update(hash, bucket.into()),
            count: if added { self.count + 1 } else { self.count },
            meta: self.meta.clone(),
        }
    }

    /// The map without `key`.
    pub fn remove(&self, key: &StrataVal) -> Self {
        let hash = key.hash_code();
        let Some(bucket) = self.buckets.get(&hash) else {
            return self.clone();
        };
        let Some(i) = find_key(bucket, key) else {
            return self.clone();
        };
        let buckets = if bucket.len() == 2 {
            self.buckets.without(&hash)
        } else {
            let mut entries = bucket.to_vec();
            entries.drain(i..i + 2);
            self.buckets.update(hash, entries.into())
        };
        PersistentHashMap {
            buckets,
            count: self.count - 1,
            meta: self.meta.clone(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (StrataVal, StrataVal)> + '_ {
        self.buckets.values().flat_map(|bucket| {
            bucket
                .chunks_exact(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = StrataVal> + '_ {
        self.iter().map(|(k, _)| k)
    }
}

impl Seqable for PersistentHashMap {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_vec(
            self.iter()
                .map(|(k, v)| StrataVal::vector(vec![k, v]))
                .collect(),
        ))
    }
}

impl Counted for PersistentHashMap {
    fn count(&self) -> usize {
        self.count
    }
}

impl Collection for PersistentHashMap {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        let map = map_entries_of(&x)?
            .into_iter()
            .fold(self.clone(), |map, (k, v)| map.insert(k, v));
        Ok(StrataVal::HashMap(map))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::HashMap(PersistentHashMap {
            buckets: im::OrdMap::new(),
            count: 0,
            meta: self.meta.clone(),
        })
    }
}

impl Lookup for PersistentHashMap {
    fn lookup(&self, key: &StrataVal) -> Option<StrataVal> {
        self.get(key)
    }
}

impl Associative for PersistentHashMap {
    fn assoc(&self, key: StrataVal, val: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::HashMap(self.insert(key, val)))
    }
}

impl MapLike for PersistentHashMap {
    fn dissoc(&self, key: &StrataVal) -> StrataVal {
        StrataVal::HashMap(self.remove(key))
    }

    fn entries(&self) -> Vec<(StrataVal, StrataVal)> {
        self.iter().collect()
    }
}

impl Reducible for PersistentHashMap {}

impl WithMeta for PersistentHashMap {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        PersistentHashMap {
            buckets: self.buckets.clone(),
            count: self.count,
            meta: meta_slot(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(s: &str) -> StrataVal {
        StrataVal::keyword(s)
    }

    #[test]
    fn test_insert_get_remove() {
        let m = PersistentHashMap::new()
            .insert(kw("a"), StrataVal::int(1))
            .insert(kw("b"), StrataVal::int(2));
        assert_eq!(m.count(), 2);
        assert_eq!(m.get(&kw("a")), Some(StrataVal::int(1)));

        let replaced = m.insert(kw("a"), StrataVal::int(10));
        assert_eq!(replaced.count(), 2);
        assert_eq!(replaced.get(&kw("a")), Some(StrataVal::int(10)));
        assert_eq!(m.get(&kw("a")), Some(StrataVal::int(1)));

        let removed = m.remove(&kw("a"));
        assert_eq!(removed.count(), 1);
        assert!(removed.get(&kw("a")).is_none());
        assert_eq!(m.remove(&kw("zzz")).count(), 2);
    }

    #[test]
    fn test_nil_values_are_present() {
        let m = PersistentHashMap::new().insert(kw("a"), StrataVal::Nil);
        assert!(m.contains_key(&kw("a")));
        assert!(!m.contains_key(&kw("b")));
    }

    #[test]
    fn test_structural_keys() {
        let key = StrataVal::vector(vec![StrataVal::int(1), StrataVal::int(2)]);
        let m = PersistentHashMap::new().insert(key, StrataVal::string("v"));
        let as_list = StrataVal::list(vec![StrataVal::int(1), StrataVal::int(2)]);
        assert_eq!(m.get(&as_list), Some(StrataVal::string("v")));
    }

    #[test]
    fn test_conj_pair_and_map() {
        let m = PersistentHashMap::new();
        let pair = StrataVal::vector(vec![kw("a"), StrataVal::int(1)]);
        let StrataVal::HashMap(m) = m.conj(pair).unwrap() else {
            panic!("expected hash map");
        };
        assert_eq!(m.count(), 1);
        assert!(m.conj(StrataVal::int(1)).is_err());

        let other = StrataVal::map(vec![(kw("b"), StrataVal::int(2))]);
        let merged = m.conj(other).unwrap();
        assert_eq!(merged.fast_count(), Some(2));
    }
}
