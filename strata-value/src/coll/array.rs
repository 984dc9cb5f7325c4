// strata-value - Host arrays
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! An immutable host array. Arrays are readable through the sequence,
//! count, index and lookup capabilities but are not persistent collections:
//! they have no `conj` and carry no metadata.

use std::rc::Rc;

use crate::error::Result;
use crate::seq::Seq;
use crate::traits::{Counted, Indexed, Lookup, Reducible, Seqable};
use crate::value::StrataVal;

#[derive(Clone)]
pub struct HostArray(Rc<[StrataVal]>);

impl HostArray {
    pub fn new(items: Vec<StrataVal>) -> Self {
        HostArray(items.into())
    }

    pub fn as_slice(&self) -> &[StrataVal] {
        &self.0
    }
}

impl Seqable for HostArray {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_array(Rc::clone(&self.0)))
    }
}

impl Counted for HostArray {
    fn count(&self) -> usize {
        self.0.len()
    }
}

impl Indexed for HostArray {
    fn nth(&self, index: usize) -> Option<StrataVal> {
        self.0.get(index).cloned()
    }
}

impl Lookup for HostArray {
    fn lookup(&self, key: &StrataVal) -> Option<StrataVal> {
        match key {
            StrataVal::Int(i) => usize::try_from(*i).ok().and_then(|i| self.nth(i)),
            _ => None,
        }
    }
}

impl Reducible for HostArray {}
