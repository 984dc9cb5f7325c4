// strata-value - Sequence cursors
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! [`Seq`] is an immutable cursor over the elements of any seqable value.
//!
//! A `Seq` is never empty: producing one for an empty collection yields
//! `None` instead. Cursors share the storage of the collection they walk, so
//! taking a `seq` is cheap and walking it never disturbs the collection.
//!
//! Stepping past a cons cell realizes its tail, which may be a lazy sequence
//! whose producer fails. Those steps return `Result`, and [`SeqIter`] yields
//! the failure as its last item.

use std::fmt;
use std::rc::Rc;

use crate::coll::PersistentList;
use crate::error::{Error, Result};
use crate::traits::{Collection, Counted, Reducible, Seqable};
use crate::value::StrataVal;

#[derive(Clone)]
pub struct Seq {
    inner: SeqInner,
}

#[derive(Clone)]
enum SeqInner {
    List(PersistentList),
    Vector {
        items: im::Vector<StrataVal>,
        pos: usize,
        end: usize,
    },
    Array {
        items: Rc<[StrataVal]>,
        pos: usize,
    },
    Range {
        current: i64,
        step: i64,
        remaining: u64,
    },
    /// An element prepended to any seqable value
    Cons(Rc<(StrataVal, StrataVal)>),
}

impl Seq {
    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    pub(crate) fn from_list(list: PersistentList) -> Option<Seq> {
        if list.is_empty() {
            None
        } else {
            Some(Seq {
                inner: SeqInner::List(list),
            })
        }
    }

    /// A cursor over `items[start..end]`.
    pub(crate) fn from_vector(items: im::Vector<StrataVal>, start: usize, end: usize) -> Option<Seq> {
        if start >= end || end > items.len() {
            None
        } else {
            Some(Seq {
                inner: SeqInner::Vector {
                    items,
                    pos: start,
                    end,
                },
            })
        }
    }

    pub(crate) fn from_array(items: Rc<[StrataVal]>) -> Option<Seq> {
        if items.is_empty() {
            None
        } else {
            Some(Seq {
                inner: SeqInner::Array { items, pos: 0 },
            })
        }
    }

    /// A cursor over an owned vector of elements.
    pub fn from_vec(items: Vec<StrataVal>) -> Option<Seq> {
        Seq::from_array(items.into())
    }

    pub(crate) fn from_range(start: i64, step: i64, count: u64) -> Option<Seq> {
        if count == 0 {
            None
        } else {
            Some(Seq {
                inner: SeqInner::Range {
                    current: start,
                    step,
                    remaining: count,
                },
            })
        }
    }

    /// Prepend `first` to `rest`, which must be seqable.
    pub fn cons(first: StrataVal, rest: StrataVal) -> Result<Seq> {
        if !rest.is_seqable() {
            return Err(Error::type_error_in("cons", "seqable", rest.type_name()));
        }
        Ok(Seq {
            inner: SeqInner::Cons(Rc::new((first, rest))),
        })
    }

    // ------------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------------

    pub fn first(&self) -> StrataVal {
        match &self.inner {
            SeqInner::List(list) => list.first().unwrap_or(StrataVal::Nil),
            SeqInner::Vector { items, pos, .. } => {
                items.get(*pos).cloned().unwrap_or(StrataVal::Nil)
            }
            SeqInner::Array { items, pos } => items.get(*pos).cloned().unwrap_or(StrataVal::Nil),
            SeqInner::Range { current, .. } => StrataVal::Int(*current),
            SeqInner::Cons(cell) => cell.0.clone(),
        }
    }

    /// The cursor after the first element, `None` at the end.
    pub fn next(&self) -> Result<Option<Seq>> {
        let mut next = self.clone();
        Ok(if next.advance()? { Some(next) } else { None })
    }

    /// The remaining elements; the empty list at the end.
    ///
    /// The tail of a cons cell is returned as is, without realizing it.
    pub fn rest(&self) -> StrataVal {
        match &self.inner {
            SeqInner::Cons(cell) if !cell.1.is_nil() => cell.1.clone(),
            SeqInner::Cons(_) => StrataVal::List(PersistentList::new()),
            _ => {
                let mut next = self.clone();
                if next.step() {
                    StrataVal::Seq(next)
                } else {
                    StrataVal::List(PersistentList::new())
                }
            }
        }
    }

    pub fn iter(&self) -> SeqIter {
        SeqIter::from(Some(self.clone()))
    }

    /// Number of elements left, when known without walking.
    pub fn known_count(&self) -> Option<usize> {
        match &self.inner {
            SeqInner::Vector { pos, end, .. } => Some(end - pos),
            SeqInner::Array { items, pos } => Some(items.len() - pos),
            SeqInner::Range { remaining, .. } => usize::try_from(*remaining).ok(),
            SeqInner::List(list) => Some(list.count()),
            SeqInner::Cons(_) => None,
        }
    }

    /// Number of elements left, walking cons cells.
    pub fn count(&self) -> Result<usize> {
        match self.known_count() {
            Some(n) => Ok(n),
            None => self.iter().try_fold(0, |n, item| item.map(|_| n + 1)),
        }
    }

    /// The element `index` steps ahead, `Ok(None)` past the end.
    pub fn nth(&self, index: usize) -> Result<Option<StrataVal>> {
        match &self.inner {
            SeqInner::Vector { items, pos, end } => Ok(pos
                .checked_add(index)
                .filter(|i| i < end)
                .and_then(|i| items.get(i).cloned())),
            SeqInner::Array { items, pos } => {
                Ok(pos.checked_add(index).and_then(|i| items.get(i).cloned()))
            }
            _ => self.iter().nth(index).transpose(),
        }
    }

    /// Step past the first element in place. Returns false when nothing
    /// remains, leaving the cursor unusable.
    fn advance(&mut self) -> Result<bool> {
        if let SeqInner::Cons(cell) = &self.inner {
            return match cell.1.try_seq()? {
                Some(next) => {
                    *self = next;
                    Ok(true)
                }
                None => Ok(false),
            };
        }
        Ok(self.step())
    }

    /// [`advance`](Self::advance) for cursors over stored elements, which
    /// cannot fail.
    fn step(&mut self) -> bool {
        match &mut self.inner {
            SeqInner::Vector { pos, end, .. } => {
                *pos += 1;
                *pos < *end
            }
            SeqInner::Array { items, pos } => {
                *pos += 1;
                *pos < items.len()
            }
            SeqInner::Range {
                current,
                step,
                remaining,
            } => {
                *remaining -= 1;
                if *remaining == 0 {
                    return false;
                }
                // remaining > 0 guarantees the next element is below `end`
                *current = current.wrapping_add(*step);
                true
            }
            SeqInner::List(list) => match list.pop_front() {
                Some(rest) if !rest.is_empty() => {
                    *list = rest;
                    true
                }
                _ => false,
            },
            SeqInner::Cons(_) => false,
        }
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", StrataVal::Seq(self.clone()))
    }
}

/// Iterator over the elements of a [`Seq`].
///
/// A step that fails is yielded as an `Err` after the elements before it,
/// and ends the iteration.
pub struct SeqIter {
    cur: Option<Seq>,
    failed: Option<Error>,
}

impl SeqIter {
    pub fn empty() -> Self {
        SeqIter::from(None)
    }

    /// The elements up to the first failing step, for callers with no way
    /// to report an error such as `Display` and `Hash`.
    pub fn values(self) -> impl Iterator<Item = StrataVal> {
        self.map_while(Result::ok)
    }
}

impl From<Option<Seq>> for SeqIter {
    fn from(seq: Option<Seq>) -> Self {
        SeqIter {
            cur: seq,
            failed: None,
        }
    }
}

impl Iterator for SeqIter {
    type Item = Result<StrataVal>;

    fn next(&mut self) -> Option<Result<StrataVal>> {
        if let Some(err) = self.failed.take() {
            return Some(Err(err));
        }
        let seq = self.cur.as_mut()?;
        let item = seq.first();
        match seq.advance() {
            Ok(true) => {}
            Ok(false) => self.cur = None,
            Err(err) => {
                self.cur = None;
                self.failed = Some(err);
            }
        }
        Some(Ok(item))
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl Seqable for Seq {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Some(self.clone()))
    }
}

impl Collection for Seq {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::Seq(Seq {
            inner: SeqInner::Cons(Rc::new((x, StrataVal::Seq(self.clone())))),
        }))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::List(PersistentList::new())
    }
}

impl Reducible for Seq {}

// ============================================================================
// Tests
// ============================================================================
