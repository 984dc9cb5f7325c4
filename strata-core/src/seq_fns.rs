// strata-core - Sequence library
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Sequence functions built on [`LazySeq`](strata_value::LazySeq) and the
//! collection traits.
//!
//! `map`, `filter`, `take`, `drop`, `concat` and `iterate` are lazy: nothing
//! runs until the result is traversed, and each step runs at most once. An
//! error from a function they were handed, or from the sequence they walk,
//! surfaces from whichever traversal realizes that step. The eager functions
//! return the first error they hit.

use std::cmp::Ordering;
use std::rc::Rc;

use strata_value::{
    Error, PersistentList, Result, SeqIter, StrataFn, StrataVal, compare,
};

fn check_seqable(op: &'static str, coll: &StrataVal) -> Result<()> {
    if coll.is_seqable() {
        Ok(())
    } else {
        Err(Error::type_error_in(op, "seqable", coll.type_name()))
    }
}

// ============================================================================
// Lazy
// ============================================================================

/// Lazily apply `f` to every element of `coll`.
pub fn map(f: &StrataFn, coll: StrataVal) -> Result<StrataVal> {
    check_seqable("map", &coll)?;
    Ok(map_step(f.clone(), coll))
}

fn map_step(f: StrataFn, coll: StrataVal) -> StrataVal {
    StrataVal::lazy_seq(move || match coll.try_seq()? {
        Some(s) => {
            let head = f.call(&[s.first()])?;
            StrataVal::cons(head, map_step(f, s.rest()))
        }
        None => Ok(StrataVal::Nil),
    })
}

/// Lazily keep the elements of `coll` for which `pred` returns a truthy value.
pub fn filter(pred: &StrataFn, coll: StrataVal) -> Result<StrataVal> {
    check_seqable("filter", &coll)?;
    Ok(filter_step(pred.clone(), coll))
}

fn filter_step(pred: StrataFn, coll: StrataVal) -> StrataVal {
    StrataVal::lazy_seq(move || {
        let mut cur = coll.try_seq()?;
        while let Some(s) = cur {
            let x = s.first();
            if pred.call(std::slice::from_ref(&x))?.is_truthy() {
                return StrataVal::cons(x, filter_step(pred, s.rest()));
            }
            cur = s.next()?;
        }
        Ok(StrataVal::Nil)
    })
}

/// Lazily take the first `n` elements of `coll`.
pub fn take(n: usize, coll: StrataVal) -> Result<StrataVal> {
    check_seqable("take", &coll)?;
    Ok(take_step(n, coll))
}

fn take_step(n: usize, coll: StrataVal) -> StrataVal {
    StrataVal::lazy_seq(move || {
        if n == 0 {
            return Ok(StrataVal::Nil);
        }
        match coll.try_seq()? {
            Some(s) => StrataVal::cons(s.first(), take_step(n - 1, s.rest())),
            None => Ok(StrataVal::Nil),
        }
    })
}

/// Lazily skip the first `n` elements of `coll`.
pub fn drop(n: usize, coll: StrataVal) -> Result<StrataVal> {
    check_seqable("drop", &coll)?;
    Ok(StrataVal::lazy_seq(move || {
        let mut cur = coll.try_seq()?;
        for _ in 0..n {
            match cur {
                Some(s) => cur = s.next()?,
                None => break,
            }
        }
        Ok(cur.map_or(StrataVal::Nil, StrataVal::Seq))
    }))
}

/// Lazily chain `colls` one after the other.
pub fn concat(colls: Vec<StrataVal>) -> Result<StrataVal> {
    for coll in &colls {
        check_seqable("concat", coll)?;
    }
    Ok(concat_step(Rc::from(colls), 0))
}

fn concat_step(colls: Rc<[StrataVal]>, start: usize) -> StrataVal {
    StrataVal::lazy_seq(move || {
        for i in start..colls.len() {
            if let Some(s) = colls[i].try_seq()? {
                let tail = match s.next()? {
                    Some(next) => {
                        let mut rest = vec![StrataVal::Seq(next)];
                        rest.extend(colls[i + 1..].iter().cloned());
                        concat_step(Rc::from(rest), 0)
                    }
                    None => concat_step(Rc::clone(&colls), i + 1),
                };
                return StrataVal::cons(s.first(), tail);
            }
        }
        Ok(StrataVal::Nil)
    })
}

/// The infinite sequence `x, f(x), f(f(x)), ...`.
pub fn iterate(f: &StrataFn, x: StrataVal) -> StrataVal {
    iterate_step(f.clone(), x)
}

fn iterate_step(f: StrataFn, x: StrataVal) -> StrataVal {
    StrataVal::lazy_seq(move || {
        let head = x.clone();
        let tail = StrataVal::lazy_seq(move || {
            let next = f.call(std::slice::from_ref(&x))?;
            Ok(iterate_step(f, next))
        });
        StrataVal::cons(head, tail)
    })
}

// ============================================================================
// Eager
// ============================================================================

/// Every element of `coll` in order.
pub fn to_vec(coll: &StrataVal) -> Result<Vec<StrataVal>> {
    SeqIter::from(coll.try_seq()?).collect()
}

/// `conj` every element of `from` onto `to`. Nil stands for the empty list.
pub fn into(to: &StrataVal, from: &StrataVal) -> Result<StrataVal> {
    let mut acc = match to {
        StrataVal::Nil => StrataVal::List(PersistentList::new()),
        other => other.clone(),
    };
    for x in SeqIter::from(from.try_seq()?) {
        let x = x?;
        acc = match acc.as_collection() {
            Some(coll) => coll.conj(x)?,
            None => return Err(Error::missing_protocol("Collection", "conj", &acc)),
        };
    }
    Ok(acc)
}

/// The elements of `coll` in reverse order, as a list.
pub fn reverse(coll: &StrataVal) -> Result<StrataVal> {
    let mut list = PersistentList::new();
    for x in SeqIter::from(coll.try_seq()?) {
        list = list.prepend(x?);
    }
    Ok(StrataVal::List(list))
}

/// Eagerly apply `f` to every element, collecting into a vector.
pub fn mapv(f: &StrataFn, coll: &StrataVal) -> Result<StrataVal> {
    let items = SeqIter::from(coll.try_seq()?)
        .map(|x| f.call(&[x?]))
        .collect::<Result<Vec<_>>>()?;
    Ok(StrataVal::vector(items))
}

/// Stable sort of `items` by `cmp`, stopping at the first comparison error.
fn sort_items<T>(
    items: &mut [T],
    cmp: impl Fn(&T, &T) -> Result<Ordering>,
) -> Result<()> {
    let mut failure = None;
    items.sort_by(|a, b| match cmp(a, b) {
        Ok(ordering) => ordering,
        Err(err) => {
            failure.get_or_insert(err);
            Ordering::Equal
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// The elements of `coll` in ascending order, as a list.
pub fn sort(coll: &StrataVal) -> Result<StrataVal> {
    let mut items = to_vec(coll)?;
    sort_items(&mut items, compare)?;
    Ok(StrataVal::list(items))
}

/// The elements of `coll` ordered by `key_fn(x)`, as a list.
pub fn sort_by(key_fn: &StrataFn, coll: &StrataVal) -> Result<StrataVal> {
    let mut keyed = to_vec(coll)?
        .into_iter()
        .map(|x| Ok((key_fn.call(std::slice::from_ref(&x))?, x)))
        .collect::<Result<Vec<_>>>()?;
    sort_items(&mut keyed, |a, b| compare(&a.0, &b.0))?;
    Ok(StrataVal::list(keyed.into_iter().map(|(_, x)| x).collect()))
}

/// Split `coll` into runs of consecutive elements for which `f` returns
/// equal values. Each run is a vector.
pub fn partition_by(f: &StrataFn, coll: &StrataVal) -> Result<StrataVal> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    let mut run_key: Option<StrataVal> = None;
    for x in SeqIter::from(coll.try_seq()?) {
        let x = x?;
        let key = f.call(std::slice::from_ref(&x))?;
        if run_key.as_ref().is_some_and(|k| *k != key) {
            runs.push(StrataVal::vector(std::mem::take(&mut run)));
        }
        run_key = Some(key);
        run.push(x);
    }
    if !run.is_empty() {
        runs.push(StrataVal::vector(run));
    }
    Ok(StrataVal::list(runs))
}
