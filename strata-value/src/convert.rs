// strata-value - Conversions between Rust and Strata values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The [`IntoStrataVal`] and [`FromStrataVal`] traits.
//!
//! | Rust type | Strata value |
//! |-----------|--------------|
//! | `()` | nil |
//! | `bool` | bool |
//! | `i32`, `i64`, `usize` | int |
//! | `f64` | float |
//! | `String`, `&str`, `Rc<str>` | string |
//! | `Keyword` | keyword |
//! | `Vec<T>` | vector (any sequential value on the way back) |
//! | `Option<T>` | `T` or nil |
//! | `HashMap<K, V>` | map |

use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::keyword::Keyword;
use crate::seq::SeqIter;
use crate::value::StrataVal;

/// Convert a Rust value into a `StrataVal`.
pub trait IntoStrataVal {
    fn into_strata_val(self) -> StrataVal;
}

/// Convert a `StrataVal` into a Rust value.
pub trait FromStrataVal: Sized {
    fn from_strata_val(val: &StrataVal) -> Result<Self>;
}

// ============================================================================
// IntoStrataVal implementations
// ============================================================================

macro_rules! into_via {
    ($($ty:ty => $ctor:expr),* $(,)?) => {
        $(
            impl IntoStrataVal for $ty {
                fn into_strata_val(self) -> StrataVal {
                    let ctor: fn($ty) -> StrataVal = $ctor;
                    ctor(self)
                }
            }
        )*
    };
}

into_via! {
    StrataVal => |v| v,
    () => |_| StrataVal::Nil,
    bool => StrataVal::Bool,
    i64 => StrataVal::Int,
    i32 => |n| StrataVal::Int(i64::from(n)),
    f64 => StrataVal::Float,
    String => |s| StrataVal::Str(s.into()),
    Rc<str> => StrataVal::Str,
    Keyword => StrataVal::Keyword,
}

impl IntoStrataVal for usize {
    fn into_strata_val(self) -> StrataVal {
        StrataVal::from(self)
    }
}

impl IntoStrataVal for &str {
    fn into_strata_val(self) -> StrataVal {
        StrataVal::string(self)
    }
}

impl<T: IntoStrataVal> IntoStrataVal for Vec<T> {
    fn into_strata_val(self) -> StrataVal {
        StrataVal::vector(self.into_iter().map(IntoStrataVal::into_strata_val).collect())
    }
}

impl<T: IntoStrataVal> IntoStrataVal for Option<T> {
    fn into_strata_val(self) -> StrataVal {
        self.map_or(StrataVal::Nil, IntoStrataVal::into_strata_val)
    }
}

impl<K: IntoStrataVal, V: IntoStrataVal> IntoStrataVal for HashMap<K, V> {
    fn into_strata_val(self) -> StrataVal {
        StrataVal::map(
            self.into_iter()
                .map(|(k, v)| (k.into_strata_val(), v.into_strata_val()))
                .collect(),
        )
    }
}

// ============================================================================
// FromStrataVal implementations
// ============================================================================

impl FromStrataVal for StrataVal {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        Ok(val.clone())
    }
}

impl FromStrataVal for () {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        match val {
            StrataVal::Nil => Ok(()),
            other => Err(Error::type_error("nil", other.type_name())),
        }
    }
}

impl FromStrataVal for bool {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        match val {
            StrataVal::Bool(b) => Ok(*b),
            other => Err(Error::type_error("bool", other.type_name())),
        }
    }
}

impl FromStrataVal for i64 {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        match val {
            StrataVal::Int(n) => Ok(*n),
            other => Err(Error::type_error("int", other.type_name())),
        }
    }
}

impl FromStrataVal for i32 {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        let n = i64::from_strata_val(val)?;
        i32::try_from(n)
            .map_err(|_| Error::argument("i32", format!("integer {} out of range", n)))
    }
}

impl FromStrataVal for usize {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        let n = i64::from_strata_val(val)?;
        usize::try_from(n)
            .map_err(|_| Error::argument("usize", format!("integer {} out of range", n)))
    }
}

impl FromStrataVal for f64 {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        match val {
            StrataVal::Float(n) => Ok(*n),
            StrataVal::Int(n) => Ok(*n as f64),
            other => Err(Error::type_error("number", other.type_name())),
        }
    }
}

impl FromStrataVal for String {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        match val {
            StrataVal::Str(s) => Ok(s.to_string()),
            other => Err(Error::type_error("string", other.type_name())),
        }
    }
}

impl FromStrataVal for Keyword {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        match val {
            StrataVal::Keyword(kw) => Ok(kw.clone()),
            other => Err(Error::type_error("keyword", other.type_name())),
        }
    }
}

impl<T: FromStrataVal> FromStrataVal for Vec<T> {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        if !val.is_sequential() && !val.is_nil() {
            return Err(Error::type_error("sequential collection", val.type_name()));
        }
        SeqIter::from(val.try_seq()?)
            .map(|x| T::from_strata_val(&x?))
            .collect()
    }
}

impl<T: FromStrataVal> FromStrataVal for Option<T> {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        match val {
            StrataVal::Nil => Ok(None),
            other => T::from_strata_val(other).map(Some),
        }
    }
}

impl<K: FromStrataVal + Eq + Hash, V: FromStrataVal> FromStrataVal for HashMap<K, V> {
    fn from_strata_val(val: &StrataVal) -> Result<Self> {
        let Some(map) = val.as_map() else {
            return Err(Error::type_error("map", val.type_name()));
        };
        map.entries()
            .iter()
            .map(|(k, v)| Ok((K::from_strata_val(k)?, V::from_strata_val(v)?)))
            .collect()
    }
}
