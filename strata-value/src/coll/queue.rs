// strata-value - Persistent FIFO queue
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A FIFO queue made of a front sequence and a rear vector.
//!
//! `conj` appends to the rear. `pop` steps the front, and once the front is
//! exhausted the rear becomes the new front and the rear resets.

use super::{MetaSlot, PersistentList, PersistentVector, meta_slot};
use crate::error::{Error, Result};
use crate::seq::Seq;
use crate::traits::{Collection, Counted, Reducible, Seqable, Stack, WithMeta};
use crate::value::{Meta, StrataVal};

#[derive(Clone, Default)]
pub struct PersistentQueue {
    front: Option<Seq>,
    rear: PersistentVector,
    count: usize,
    meta: MetaSlot,
}

impl PersistentQueue {
    pub fn new() -> Self {
        PersistentQueue::default()
    }

    pub fn from_vec(items: Vec<StrataVal>) -> Self {
        items
            .into_iter()
            .fold(PersistentQueue::new(), |q, x| q.push(x))
    }

    pub fn push(&self, x: StrataVal) -> Self {
        let (front, rear) = match &self.front {
            None => (
                Seq::from_list(PersistentList::from_vec(vec![x])),
                self.rear.clone(),
            ),
            Some(front) => (Some(front.clone()), self.rear.push(x)),
        };
        PersistentQueue {
            front,
            rear,
            count: self.count + 1,
            meta: self.meta.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = StrataVal> + '_ {
        // The front only ever walks stored elements, so no step can fail
        let front = self.front.iter().flat_map(|s| s.iter().values());
        front.chain(self.rear.items().iter().cloned())
    }
}

impl Seqable for PersistentQueue {
    fn seq(&self) -> Result<Option<Seq>> {
        if self.rear.is_empty() {
            return Ok(self.front.clone());
        }
        Ok(Seq::from_vec(self.iter().collect()))
    }
}

impl Counted for PersistentQueue {
    fn count(&self) -> usize {
        self.count
    }
}

impl Collection for PersistentQueue {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::Queue(self.push(x)))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::Queue(PersistentQueue {
            meta: self.meta.clone(),
            ..PersistentQueue::default()
        })
    }
}

impl Stack for PersistentQueue {
    fn peek(&self) -> Result<StrataVal> {
        self.front
            .as_ref()
            .map(Seq::first)
            .ok_or_else(|| Error::empty("peek", "queue"))
    }

    fn pop(&self) -> Result<StrataVal> {
        let Some(front) = &self.front else {
            return Err(Error::empty("pop", "queue"));
        };
        let (front, rear) = match front.next()? {
            Some(next) => (Some(next), self.rear.clone()),
            None => (self.rear.seq()?, PersistentVector::new()),
        };
        Ok(StrataVal::Queue(PersistentQueue {
            front,
            rear,
            count: self.count - 1,
            meta: self.meta.clone(),
        }))
    }
}

impl Reducible for PersistentQueue {}

impl WithMeta for PersistentQueue {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        PersistentQueue {
            front: self.front.clone(),
            rear: self.rear.clone(),
            count: self.count,
            meta: meta_slot(meta),
        }
    }
}
