// strata-value - Integer ranges
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! An arithmetic progression `[start, end)` over `i64`. Never materialized;
//! `count` and `nth` are computed directly.

use super::{MetaSlot, meta_slot};
use crate::error::{Error, Result};
use crate::seq::Seq;
use crate::traits::{Collection, Counted, Indexed, ReduceFn, Reducible, Seqable, WithMeta};
use crate::value::{Meta, StrataVal};

#[derive(Clone)]
pub struct Range {
    start: i64,
    end: i64,
    step: i64,
    meta: MetaSlot,
}

impl Range {
    pub fn new(start: i64, end: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return Err(Error::argument("range", "step must not be zero"));
        }
        Ok(Range {
            start,
            end,
            step,
            meta: None,
        })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Number of elements, exact for the full `i64` span.
    fn len_u64(&self) -> u64 {
        let span = i128::from(self.end) - i128::from(self.start);
        let step = i128::from(self.step);
        if span == 0 || (span > 0) != (step > 0) {
            return 0;
        }
        let n = (span.abs() + step.abs() - 1) / step.abs();
        u64::try_from(n).unwrap_or(u64::MAX)
    }

    fn get(&self, index: u64) -> Option<i64> {
        if index >= self.len_u64() {
            return None;
        }
        let value = i128::from(self.start) + i128::from(index) * i128::from(self.step);
        i64::try_from(value).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.len_u64()).filter_map(|i| self.get(i))
    }
}

impl Seqable for Range {
    fn seq(&self) -> Result<Option<Seq>> {
        Ok(Seq::from_range(self.start, self.step, self.len_u64()))
    }
}

impl Counted for Range {
    fn count(&self) -> usize {
        usize::try_from(self.len_u64()).unwrap_or(usize::MAX)
    }
}

impl Collection for Range {
    /// Ranges conj like lists: `x` goes in front.
    fn conj(&self, x: StrataVal) -> Result<StrataVal> {
        Ok(StrataVal::Seq(Seq::cons(x, StrataVal::Range(self.clone()))?))
    }

    fn empty(&self) -> StrataVal {
        StrataVal::list(Vec::new())
    }
}

impl Indexed for Range {
    fn nth(&self, index: usize) -> Option<StrataVal> {
        self.get(index as u64).map(StrataVal::Int)
    }
}

impl Reducible for Range {
    fn reduce(&self, f: ReduceFn<'_>, init: StrataVal) -> Result<StrataVal> {
        self.iter().map(StrataVal::Int).try_fold(init, f)
    }
}

impl WithMeta for Range {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_deref()
    }

    fn with_meta(&self, meta: Option<Meta>) -> Self {
        Range {
            meta: meta_slot(meta),
            ..self.clone()
        }
    }
}
