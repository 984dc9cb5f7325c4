// strata-value - Lazy sequences
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A sequence whose contents come from a producer run on first use.
//!
//! The producer runs at most once per instance; clones share the memoized
//! outcome, failures included. A producer that returns something
//! non-seqable realizes as a type error, and forcing a sequence from inside
//! its own producer is an error rather than a deadlock or an empty result.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use super::{MetaSlot, PersistentList, meta_slot};
use crate::error::{Error, Result};
use crate::seq::Seq;
use crate::traits::{Collection, Reducible, Seqable, WithMeta};
use crate::value::{Meta, StrataVal};

type Producer = Box<dyn FnOnce() -> Result<StrataVal>>;

enum LazySeqState {
    Pending(Producer),
    Realizing,
    Realized(Result<Option<Seq>>),
}

#[derive(Clone)]
pub struct LazySeq {
    state: Rc<RefCell<LazySeqState>>,
    meta: MetaSlot,
}

impl LazySeq {
    pub fn new(producer: impl FnOnce() -> Result<StrataVal> + 'static) -> Self {
        LazySeq {
            state: Rc::new(RefCell::new(LazySeqState::Pending(Box::new(producer)))),
            meta: None,
        }
    }

    /// Run the producer if it hasn't run yet and return the realized sequence.
    pub fn force(&self) -> Result<Option<Seq>> {
        let producer = {
            let mut state = self.state.borrow_mut();
            match std::mem::replace(&mut *state, LazySeqState::Realizing) {
                LazySeqState::Pending(producer) => producer,
                LazySeqState::Realized(result) => {
                    *state = LazySeqState::Realized(result.clone());
                    return result;
                }
                LazySeqState::Realizing => {
                    return Err(Error::argument(
                        "lazy-seq",
                        "sequence forced again while its producer is running",
                    ));
                }
            }
        };

        let result = producer().and_then(realize);
        if let Err(err) = &result {
            debug!(error = %err, "lazy sequence failed to realize");
        }
        *self.state.borrow_mut() = LazySeqState::Realized(result.clone());
        result
    }

    pub fn is_realized(&self) -> bool {
        matches!(*self.state.borrow(), LazySeqState::Realized(_))
    }
}

fn realize(produced: StrataVal) -> Result<Option<Seq>> {
    if !produced.is_seqable() {
        return Err(Error::type_error_in(
            "lazy-seq body",
            "nil or seqable",
            produced.type_name(),
        ));
    }
    produced.try_seq()
}

impl fmt::Debug for LazySeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_realized() {
            write!(f, "{}", StrataVal::LazySeq(self.clone()))
        } else {
            write!(f, "#<lazy-seq pending>")
        }
    }
}

impl Seqable for LazySeq {
    fn seq(&self) -> Result<Option<Seq>> {
        self.force()
    }
}

impl Collection for LazySeq {
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::Seq(Seq::cons(x, StrataVal::LazySeq(self.clone()))?))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::List(PersistentList::new())
    }
}

impl Reducible for LazySeq {}

impl WithMeta for LazySeq {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        LazySeq {
            state: Rc::clone(&self.state),
            meta: meta_slot(meta),
        }
    }
}
