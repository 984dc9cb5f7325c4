// strata-value - Persistent list
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A counted singly-linked list. `conj` prepends and shares the tail.

use std::rc::Rc;

use super::{MetaSlot, meta_slot};
use crate::error::{Error, Result};
use crate::seq::Seq;
use crate::traits::{
    Collection, Counted, Indexed, ReduceFn, Reducible, Seqable, Stack, WithMeta,
};
use crate::value::{Meta, StrataVal};

struct Node {
    first: StrataVal,
    rest: Option<Rc<Node>>,
    count: usize,
}

impl Drop for Node {
    // Unlink iteratively so long lists don't overflow the stack.
    fn drop(&mut self) {
        let mut next = self.rest.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.rest.take(),
                Err(_) => break,
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct PersistentList {
    head: Option<Rc<Node>>,
    meta: MetaSlot,
}

impl PersistentList {
    pub fn new() -> Self {
        PersistentList::default()
    }

    pub fn from_vec(items: Vec<StrataVal>) -> Self {
        items
            .into_iter()
            .rev()
            .fold(PersistentList::new(), |list, item| list.prepend(item))
    }

    /// The list with `x` at the front.
    pub fn prepend(&self, x: StrataVal) -> Self {
        let count = self.count() + 1;
        PersistentList {
            head: Some(Rc::new(Node {
                first: x,
                rest: self.head.clone(),
                count,
            })),
            meta: self.meta.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn first(&self) -> Option<StrataVal> {
        self.head.as_ref().map(|node| node.first.clone())
    }

    /// The tail of the list, `None` when the list is empty.
    pub fn pop_front(&self) -> Option<PersistentList> {
        self.head.as_ref().map(|node| PersistentList {
            head: node.rest.clone(),
            meta: self.meta.clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = StrataVal> + '_ {
        let mut cur = self.head.as_deref();
        std::iter::from_fn(move || {
            let node = cur?;
            cur = node.rest.as_deref();
            Some(node.first.clone())
        })
    }
}

impl Seqable for PersistentList {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_list(PersistentList {
            head: self.head.clone(),
            meta: None,
        }))
    }
}

impl Counted for PersistentList {
    fn count(&self) -> usize {
        self.head.as_ref().map_or(0, |node| node.count)
    }
}

impl Collection for PersistentList {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::List(self.prepend(x)))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::List(PersistentList {
            head: None,
            meta: self.meta.clone(),
        })
    }
}

impl Indexed for PersistentList {
    fn nth(&self, index: usize) -> Option<StrataVal> {
        self.iter().nth(index)
    }
}

impl Stack for PersistentList {
    fn peek(&self) -> Result<StrataVal> {
        self.first().ok_or_else(|| Error::empty("peek", "list"))
    }

    fn pop(&self) -> Result<StrataVal> {
        self.pop_front()
            .map(StrataVal::List)
            .ok_or_else(|| Error::empty("pop", "list"))
    }
}

impl Reducible for PersistentList {
    fn reduce(&self, f: ReduceFn<'_>, init: StrataVal) -> Result<StrataVal> {
        self.iter().try_fold(init, f)
    }
}

impl WithMeta for PersistentList {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        PersistentList {
            head: self.head.clone(),
            meta: meta_slot(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(ns: &[i64]) -> Vec<StrataVal> {
        ns.iter().map(|n| StrataVal::int(*n)).collect()
    }

    #[test]
    fn test_conj_prepends() {
        let list = PersistentList::from_vec(ints(&[2, 3]));
        let grown = list.conj(StrataVal::int(1)).unwrap();
        assert_eq!(grown, StrataVal::list(ints(&[1, 2, 3])));
        // Receiver unchanged
        assert_eq!(list.count(), 2);
    }

    #[test]
    fn test_peek_pop() {
        let list = PersistentList::from_vec(ints(&[1, 2]));
        assert_eq!(list.peek().unwrap(), StrataVal::int(1));
        assert_eq!(list.pop().unwrap(), StrataVal::list(ints(&[2])));

        let empty = PersistentList::new();
        assert!(matches!(empty.pop(), Err(Error::EmptyCollection { .. })));
        assert!(matches!(empty.peek(), Err(Error::EmptyCollection { .. })));
    }

    #[test]
    fn test_long_list_drops() {
        let list = (0..200_000).fold(PersistentList::new(), |l, i| l.prepend(StrataVal::int(i)));
        assert_eq!(list.count(), 200_000);
        drop(list);
    }

    #[test]
    fn test_seq_and_nth() {
        let list = PersistentList::from_vec(ints(&[4, 5, 6]));
        assert_eq!(list.nth(2), Some(StrataVal::int(6)));
        assert_eq!(list.nth(3), None);
        assert!(PersistentList::new().seq().unwrap().is_none());
    }
}
