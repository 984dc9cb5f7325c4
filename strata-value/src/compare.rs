// strata-value - Value ordering
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A total order over comparable values, used by `sort`.
//!
//! Nil sorts before everything. Numbers compare numerically across ints and
//! floats; booleans, strings and keywords compare within their own kind.
//! Sequential values compare by length first, then element-wise. Any other
//! pairing is a type error.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::seq::SeqIter;
use crate::value::StrataVal;

/// Compare two values.
pub fn compare(a: &StrataVal, b: &StrataVal) -> Result<Ordering> {
    match (a, b) {
        (StrataVal::Nil, StrataVal::Nil) => Ok(Ordering::Equal),
        (StrataVal::Nil, _) => Ok(Ordering::Less),
        (_, StrataVal::Nil) => Ok(Ordering::Greater),
        (StrataVal::Bool(x), StrataVal::Bool(y)) => Ok(x.cmp(y)),
        (StrataVal::Int(x), StrataVal::Int(y)) => Ok(x.cmp(y)),
        (StrataVal::Float(x), StrataVal::Float(y)) => Ok(x.total_cmp(y)),
        (StrataVal::Int(x), StrataVal::Float(y)) => Ok((*x as f64).total_cmp(y)),
        (StrataVal::Float(x), StrataVal::Int(y)) => Ok(x.total_cmp(&(*y as f64))),
        (StrataVal::Str(x), StrataVal::Str(y)) => Ok(x.cmp(y)),
        (StrataVal::Keyword(x), StrataVal::Keyword(y)) => Ok(x.cmp(y)),
        _ if a.is_sequential() && b.is_sequential() => compare_sequential(a, b),
        _ => Err(Error::type_error_in(
            format!("compare {}", a.type_name()),
            "comparable value of the same kind",
            b.type_name(),
        )),
    }
}

fn compare_sequential(a: &StrataVal, b: &StrataVal) -> Result<Ordering> {
    let left: Vec<_> = SeqIter::from(a.try_seq()?).collect::<Result<_>>()?;
    let right: Vec<_> = SeqIter::from(b.try_seq()?).collect::<Result<_>>()?;
    match left.len().cmp(&right.len()) {
        Ordering::Equal => {}
        unequal => return Ok(unequal),
    }
    for (x, y) in left.iter().zip(right.iter()) {
        match compare(x, y)? {
            Ordering::Equal => {}
            unequal => return Ok(unequal),
        }
    }
    Ok(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_and_nil() {
        assert_eq!(compare(&StrataVal::int(1), &StrataVal::float(1.5)).unwrap(), Ordering::Less);
        assert_eq!(compare(&StrataVal::Nil, &StrataVal::int(0)).unwrap(), Ordering::Less);
        assert_eq!(
            compare(&StrataVal::string("b"), &StrataVal::string("a")).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_sequentials() {
        let short = StrataVal::vector(vec![StrataVal::int(9)]);
        let long = StrataVal::list(vec![StrataVal::int(1), StrataVal::int(2)]);
        assert_eq!(compare(&short, &long).unwrap(), Ordering::Less);
        let other = StrataVal::vector(vec![StrataVal::int(1), StrataVal::int(3)]);
        assert_eq!(compare(&long, &other).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let err = compare(&StrataVal::int(1), &StrataVal::string("1")).unwrap_err();
        assert!(matches!(err, Error::TypeError { .. }));
        assert!(compare(&StrataVal::map(vec![]), &StrataVal::map(vec![])).is_err());
    }
}
