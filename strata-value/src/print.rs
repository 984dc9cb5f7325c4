// strata-value - Printing
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Readable printing of values.
//!
//! Collections honour the thread-local print settings in [`crate::config`]:
//! at most `print_length` elements are shown, and lazy or unbounded
//! sequences stop at `lazy_print_limit`. Elided elements print as `...`.
//! Metadata is never printed.

use std::fmt;

use crate::config::{get_lazy_print_limit, get_print_length};
use crate::seq::SeqIter;
use crate::value::StrataVal;

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            _ => result.push(c),
        }
    }
    result
}

fn write_float(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "##NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            write!(f, "##Inf")
        } else {
            write!(f, "##-Inf")
        }
    } else if n.fract() == 0.0 {
        write!(f, "{}.0", n)
    } else {
        write!(f, "{}", n)
    }
}

/// Write `items` between `open` and `close`, truncating at `limit`.
fn write_items(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    close: &str,
    sep: &str,
    items: impl Iterator<Item = String>,
    limit: Option<usize>,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        if limit.is_some_and(|max| i >= max) {
            f.write_str("...")?;
            break;
        }
        f.write_str(&item)?;
    }
    f.write_str(close)
}

fn lazy_limit() -> Option<usize> {
    let lazy = get_lazy_print_limit();
    Some(get_print_length().map_or(lazy, |len| len.min(lazy)))
}

fn elements(val: &StrataVal) -> impl Iterator<Item = String> {
    SeqIter::from(val.seq_or_empty())
        .values()
        .map(|x| x.to_string())
}

impl fmt::Display for StrataVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrataVal::Nil => write!(f, "nil"),
            StrataVal::Bool(b) => write!(f, "{}", b),
            StrataVal::Int(n) => write!(f, "{}", n),
            StrataVal::Float(n) => write_float(f, *n),
            StrataVal::Str(s) => write!(f, "\"{}\"", escape_string(s)),
            StrataVal::Keyword(kw) => write!(f, "{}", kw),
            StrataVal::Fn(func) => write!(f, "#<fn {}>", func.name()),
            StrataVal::Array(_) => {
                write_items(f, "#array [", "]", " ", elements(self), get_print_length())
            }
            StrataVal::Vector(_) | StrataVal::Subvec(_) => {
                write_items(f, "[", "]", " ", elements(self), get_print_length())
            }
            StrataVal::List(_) => write_items(f, "(", ")", " ", elements(self), get_print_length()),
            StrataVal::Range(_) | StrataVal::LazySeq(_) | StrataVal::Seq(_) => {
                write_items(f, "(", ")", " ", elements(self), lazy_limit())
            }
            StrataVal::Queue(_) => {
                write_items(f, "#queue [", "]", " ", elements(self), get_print_length())
            }
            StrataVal::ObjMap(_) | StrataVal::HashMap(_) => {
                let entries = self.as_map().map(|m| m.entries()).unwrap_or_default();
                write_items(
                    f,
                    "{",
                    "}",
                    ", ",
                    entries.into_iter().map(|(k, v)| format!("{} {}", k, v)),
                    get_print_length(),
                )
            }
            StrataVal::Set(set) => write_items(
                f,
                "#{",
                "}",
                " ",
                set.iter().map(|x| x.to_string()),
                get_print_length(),
            ),
            StrataVal::Object(obj) => obj.fmt_display(f),
        }
    }
}

impl fmt::Debug for StrataVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
