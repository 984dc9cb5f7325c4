// strata-value - Interned keywords
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Keywords are self-describing identifiers with an optional namespace.
//!
//! Keywords are interned in a process-wide table, so two keywords with the
//! same text share one allocation and compare by pointer. Interned keywords
//! are never freed. Hashing and ordering use the text, which keeps map
//! iteration order stable from one run to the next.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// An interned keyword such as `:shape` or `:strata.type/Vector`.
#[derive(Clone)]
pub struct Keyword {
    inner: Arc<KeywordInner>,
}

#[derive(Debug)]
struct KeywordInner {
    /// Full text without the leading colon, e.g. `ns/name`
    text: Box<str>,
    /// Byte length of the namespace part, if any
    ns_len: Option<usize>,
}

static KEYWORD_INTERNER: OnceLock<Mutex<HashMap<Box<str>, Arc<KeywordInner>>>> = OnceLock::new();

fn intern(text: &str, ns_len: Option<usize>) -> Arc<KeywordInner> {
    let table = KEYWORD_INTERNER.get_or_init(|| Mutex::new(HashMap::new()));
    // A panic while holding the lock cannot leave the table half-updated.
    let mut table = table.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = table.get(text) {
        return Arc::clone(existing);
    }
    let inner = Arc::new(KeywordInner {
        text: text.into(),
        ns_len,
    });
    table.insert(text.into(), Arc::clone(&inner));
    inner
}

impl Keyword {
    /// Create a keyword with no namespace.
    pub fn new(name: &str) -> Self {
        Keyword {
            inner: intern(name, None),
        }
    }

    /// Create a namespaced keyword.
    pub fn with_namespace(namespace: &str, name: &str) -> Self {
        let text = format!("{}/{}", namespace, name);
        Keyword {
            inner: intern(&text, Some(namespace.len())),
        }
    }

    /// Parse `:foo` or `:ns/foo`; the leading colon is optional.
    pub fn parse(s: &str) -> Self {
        let s = s.strip_prefix(':').unwrap_or(s);
        match s.find('/') {
            Some(pos) if pos > 0 && pos + 1 < s.len() => {
                Keyword::with_namespace(&s[..pos], &s[pos + 1..])
            }
            _ => Keyword::new(s),
        }
    }

    #[inline]
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.inner.ns_len.map(|n| &self.inner.text[..n])
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self.inner.ns_len {
            Some(n) => &self.inner.text[n + 1..],
            None => &self.inner.text,
        }
    }

    /// Text without the leading colon.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.inner.text
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.inner.text)
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self)
    }
}

impl PartialEq for Keyword {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Keyword {}

impl PartialOrd for Keyword {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyword {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.namespace()
            .cmp(&other.namespace())
            .then_with(|| self.name().cmp(other.name()))
    }
}

impl Hash for Keyword {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.text.hash(state);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_keyword() {
        let kw = Keyword::new("shape");
        assert_eq!(kw.name(), "shape");
        assert!(kw.namespace().is_none());
        assert_eq!(kw.to_string(), ":shape");
    }

    #[test]
    fn test_namespaced_keyword() {
        let kw = Keyword::with_namespace("strata.type", "Vector");
        assert_eq!(kw.name(), "Vector");
        assert_eq!(kw.namespace(), Some("strata.type"));
        assert_eq!(kw.to_string(), ":strata.type/Vector");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Keyword::parse(":square"), Keyword::new("square"));
        assert_eq!(Keyword::parse("square"), Keyword::new("square"));
        assert_eq!(
            Keyword::parse(":geo/square"),
            Keyword::with_namespace("geo", "square")
        );
        // A bare slash is a name, not a separator
        assert_eq!(Keyword::parse(":/").name(), "/");
    }

    #[test]
    fn test_interning() {
        let a = Keyword::new("circle");
        let b = Keyword::new("circle");
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert_ne!(a, Keyword::new("square"));
    }

    #[test]
    fn test_ordering() {
        let a = Keyword::new("a");
        let b = Keyword::new("b");
        let ns_a = Keyword::with_namespace("ns", "a");
        assert!(a < b);
        assert!(a < ns_a);
    }
}
