// strata-value - Core value types for the Strata runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The [`StrataVal`] enum and the function and object types it carries.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::coll::{
    HostArray, LazySeq, ObjMap, PersistentHashMap, PersistentList, PersistentQueue,
    PersistentSet, PersistentVector, Range, Subvec,
};
use crate::error::{Error, Result};
use crate::keyword::Keyword;
use crate::seq::Seq;
use crate::tag::is_array_like;
use crate::traits::{
    Associative, Collection, Counted, Indexed, Lookup, MapLike, Reducible, Seqable, SetLike,
    Stack, WithMeta,
};

/// Metadata attached to a collection. Usually a map.
pub type Meta = StrataVal;

// ============================================================================
// Native functions
// ============================================================================

type NativeFnPtr = dyn Fn(&[StrataVal]) -> Result<StrataVal>;

/// A named native function value.
///
/// Used for protocol implementations, multimethod dispatch functions and
/// multimethod methods. Two function values are equal only when they share
/// the same closure.
#[derive(Clone)]
pub struct StrataFn {
    name: Rc<str>,
    func: Rc<NativeFnPtr>,
}

impl StrataFn {
    pub fn new(
        name: impl Into<Rc<str>>,
        func: impl Fn(&[StrataVal]) -> Result<StrataVal> + 'static,
    ) -> Self {
        StrataFn {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn call(&self, args: &[StrataVal]) -> Result<StrataVal> {
        (self.func)(args)
    }

    pub fn ptr_eq(&self, other: &StrataFn) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.func), Rc::as_ptr(&other.func))
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.func) as *const () as usize
    }

    /// A one-argument function that looks `kw` up in its argument.
    ///
    /// Returns nil when the argument has no such key or is not associative,
    /// which makes it a convenient multimethod dispatch function.
    pub fn keyword_getter(kw: Keyword) -> Self {
        let name = kw.to_string();
        let key = StrataVal::Keyword(kw);
        StrataFn::new(name.clone(), move |args| {
            let [target] = args else {
                return Err(Error::arity_named(name.as_str(), 1, args.len()));
            };
            Ok(target
                .as_lookup()
                .and_then(|coll| coll.lookup(&key))
                .unwrap_or(StrataVal::Nil))
        })
    }
}

impl fmt::Debug for StrataFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<fn {}>", self.name)
    }
}

// ============================================================================
// User-defined objects
// ============================================================================

/// A user-defined or host value carried by [`StrataVal::Object`].
///
/// Every hook has a default, so a bare implementation only needs `as_any`.
pub trait StrataObject: fmt::Debug {
    /// Concrete type identity used for tag dispatch. `None` leaves the
    /// object to the structural classifier.
    fn type_name(&self) -> Option<&'static str> {
        None
    }

    /// A protocol operation carried by the value itself. Consulted before
    /// the protocol table.
    fn protocol_method(&self, _protocol: &str, _op: &str) -> Option<StrataFn> {
        None
    }

    /// Length, for array-like objects.
    fn length(&self) -> Option<usize> {
        None
    }

    /// Indexed access, for array-like objects.
    fn element(&self, _index: usize) -> Option<StrataVal> {
        None
    }

    /// Structural equality against another object. Must agree with `hash_code`.
    fn equiv(&self, _other: &dyn StrataObject) -> bool {
        false
    }

    fn hash_code(&self) -> Option<u64> {
        None
    }

    fn fmt_display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}>", self.type_name().unwrap_or("object"))
    }

    fn as_any(&self) -> &dyn Any;
}

// ============================================================================
// StrataVal
// ============================================================================

/// A Strata runtime value.
#[derive(Clone, Default)]
pub enum StrataVal {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Keyword(Keyword),
    Fn(StrataFn),
    /// Immutable host array
    Array(HostArray),
    List(PersistentList),
    Vector(PersistentVector),
    Subvec(Subvec),
    ObjMap(ObjMap),
    HashMap(PersistentHashMap),
    Set(PersistentSet),
    Queue(PersistentQueue),
    Range(Range),
    LazySeq(LazySeq),
    /// A traversal cursor produced by `seq`
    Seq(Seq),
    Object(Rc<dyn StrataObject>),
}

impl StrataVal {
    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    pub fn nil() -> Self {
        StrataVal::Nil
    }

    pub fn bool(b: bool) -> Self {
        StrataVal::Bool(b)
    }

    pub fn int(n: i64) -> Self {
        StrataVal::Int(n)
    }

    pub fn float(n: f64) -> Self {
        StrataVal::Float(n)
    }

    pub fn string(s: impl Into<Rc<str>>) -> Self {
        StrataVal::Str(s.into())
    }

    /// Create a keyword from `name` or `ns/name`, with or without a colon.
    pub fn keyword(s: &str) -> Self {
        StrataVal::Keyword(Keyword::parse(s))
    }

    pub fn func(
        name: impl Into<Rc<str>>,
        func: impl Fn(&[StrataVal]) -> Result<StrataVal> + 'static,
    ) -> Self {
        StrataVal::Fn(StrataFn::new(name, func))
    }

    pub fn list(items: Vec<StrataVal>) -> Self {
        StrataVal::List(PersistentList::from_vec(items))
    }

    pub fn vector(items: Vec<StrataVal>) -> Self {
        StrataVal::Vector(PersistentVector::from_vec(items))
    }

    pub fn array(items: Vec<StrataVal>) -> Self {
        StrataVal::Array(HostArray::new(items))
    }

    /// Build a map from key/value pairs.
    ///
    /// An `ObjMap` is chosen when every key is a string, a `HashMap`
    /// otherwise. Later pairs win over earlier ones with the same key.
    pub fn map(pairs: Vec<(StrataVal, StrataVal)>) -> Self {
        if pairs.iter().all(|(k, _)| matches!(k, StrataVal::Str(_))) {
            let mut map = ObjMap::new();
            for (k, v) in pairs {
                if let StrataVal::Str(key) = k {
                    map = map.assoc_str(key, v);
                }
            }
            StrataVal::ObjMap(map)
        } else {
            StrataVal::HashMap(PersistentHashMap::from_pairs(pairs))
        }
    }

    /// Build a map from a flat `k1 v1 k2 v2 ...` list.
    pub fn map_of(kvs: Vec<StrataVal>) -> Result<Self> {
        if kvs.len() % 2 != 0 {
            return Err(Error::argument(
                "map_of",
                format!("No value supplied for key: {}", kvs[kvs.len() - 1]),
            ));
        }
        let mut pairs = Vec::with_capacity(kvs.len() / 2);
        let mut iter = kvs.into_iter();
        while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
            pairs.push((k, v));
        }
        Ok(StrataVal::map(pairs))
    }

    pub fn hash_set(items: Vec<StrataVal>) -> Self {
        StrataVal::Set(PersistentSet::from_vec(items))
    }

    pub fn queue(items: Vec<StrataVal>) -> Self {
        StrataVal::Queue(PersistentQueue::from_vec(items))
    }

    /// A range `[start, end)` stepping by `step`. A zero step is an error.
    pub fn range(start: i64, end: i64, step: i64) -> Result<Self> {
        Ok(StrataVal::Range(Range::new(start, end, step)?))
    }

    /// A lazy sequence over the value `producer` returns when first forced.
    /// An error from `producer` is reported by every later traversal.
    pub fn lazy_seq(producer: impl FnOnce() -> Result<StrataVal> + 'static) -> Self {
        StrataVal::LazySeq(LazySeq::new(producer))
    }

    /// Prepend `first` to any seqable value.
    pub fn cons(first: StrataVal, rest: StrataVal) -> Result<Self> {
        Ok(StrataVal::Seq(Seq::cons(first, rest)?))
    }

    pub fn object(obj: impl StrataObject + 'static) -> Self {
        StrataVal::Object(Rc::new(obj))
    }

    // ------------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------------

    /// Name of the value's kind, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            StrataVal::Nil => "nil",
            StrataVal::Bool(_) => "bool",
            StrataVal::Int(_) => "int",
            StrataVal::Float(_) => "float",
            StrataVal::Str(_) => "string",
            StrataVal::Keyword(_) => "keyword",
            StrataVal::Fn(_) => "fn",
            StrataVal::Array(_) => "array",
            StrataVal::List(_) => "list",
            StrataVal::Vector(_) => "vector",
            StrataVal::Subvec(_) => "subvec",
            StrataVal::ObjMap(_) => "obj-map",
            StrataVal::HashMap(_) => "hash-map",
            StrataVal::Set(_) => "set",
            StrataVal::Queue(_) => "queue",
            StrataVal::Range(_) => "range",
            StrataVal::LazySeq(_) => "lazy-seq",
            StrataVal::Seq(_) => "seq",
            StrataVal::Object(obj) => obj.type_name().unwrap_or("object"),
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, StrataVal::Nil)
    }

    /// Everything except `nil` and `false`.
    #[inline]
    pub fn is_truthy(&self) -> bool {
        !matches!(self, StrataVal::Nil | StrataVal::Bool(false))
    }

    /// Ordered collections that compare element-wise with each other.
    pub fn is_sequential(&self) -> bool {
        match self {
            StrataVal::Array(_)
            | StrataVal::List(_)
            | StrataVal::Vector(_)
            | StrataVal::Subvec(_)
            | StrataVal::Queue(_)
            | StrataVal::Range(_)
            | StrataVal::LazySeq(_)
            | StrataVal::Seq(_) => true,
            StrataVal::Object(obj) => obj.type_name().is_none() && is_array_like(obj.as_ref()),
            _ => false,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, StrataVal::ObjMap(_) | StrataVal::HashMap(_))
    }

    pub fn is_set(&self) -> bool {
        matches!(self, StrataVal::Set(_))
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            StrataVal::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn as_fn(&self) -> Option<&StrataFn> {
        match self {
            StrataVal::Fn(f) => Some(f),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Trait views
    // ------------------------------------------------------------------------

    pub fn as_seqable(&self) -> Option<&dyn Seqable> {
        match self {
            StrataVal::Array(a) => Some(a),
            StrataVal::List(l) => Some(l),
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::ObjMap(m) => Some(m),
            StrataVal::HashMap(m) => Some(m),
            StrataVal::Set(s) => Some(s),
            StrataVal::Queue(q) => Some(q),
            StrataVal::Range(r) => Some(r),
            StrataVal::LazySeq(l) => Some(l),
            StrataVal::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_counted(&self) -> Option<&dyn Counted> {
        match self {
            StrataVal::Array(a) => Some(a),
            StrataVal::List(l) => Some(l),
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::ObjMap(m) => Some(m),
            StrataVal::HashMap(m) => Some(m),
            StrataVal::Set(s) => Some(s),
            StrataVal::Queue(q) => Some(q),
            StrataVal::Range(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&dyn Collection> {
        match self {
            StrataVal::List(l) => Some(l),
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::ObjMap(m) => Some(m),
            StrataVal::HashMap(m) => Some(m),
            StrataVal::Set(s) => Some(s),
            StrataVal::Queue(q) => Some(q),
            StrataVal::Range(r) => Some(r),
            StrataVal::LazySeq(l) => Some(l),
            StrataVal::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_indexed(&self) -> Option<&dyn Indexed> {
        match self {
            StrataVal::Array(a) => Some(a),
            StrataVal::List(l) => Some(l),
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::Range(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_lookup(&self) -> Option<&dyn Lookup> {
        match self {
            StrataVal::Array(a) => Some(a),
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::ObjMap(m) => Some(m),
            StrataVal::HashMap(m) => Some(m),
            StrataVal::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_associative(&self) -> Option<&dyn Associative> {
        match self {
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::ObjMap(m) => Some(m),
            StrataVal::HashMap(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&dyn MapLike> {
        match self {
            StrataVal::ObjMap(m) => Some(m),
            StrataVal::HashMap(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&dyn SetLike> {
        match self {
            StrataVal::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_stack(&self) -> Option<&dyn Stack> {
        match self {
            StrataVal::List(l) => Some(l),
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::Queue(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_reducible(&self) -> Option<&dyn Reducible> {
        match self {
            StrataVal::Array(a) => Some(a),
            StrataVal::List(l) => Some(l),
            StrataVal::Vector(v) => Some(v),
            StrataVal::Subvec(v) => Some(v),
            StrataVal::ObjMap(m) => Some(m),
            StrataVal::HashMap(m) => Some(m),
            StrataVal::Set(s) => Some(s),
            StrataVal::Queue(q) => Some(q),
            StrataVal::Range(r) => Some(r),
            StrataVal::LazySeq(l) => Some(l),
            StrataVal::Seq(s) => Some(s),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Sequence access
    // ------------------------------------------------------------------------

    /// A fresh traversal of the value, `None` when it is empty.
    ///
    /// Nil is the empty sequence. Strings traverse their characters as
    /// one-character strings and array-like objects their elements.
    pub fn try_seq(&self) -> Result<Option<Seq>> {
        match self {
            StrataVal::Nil => Ok(None),
            StrataVal::Str(s) => Ok(Seq::from_vec(
                s.chars()
                    .map(|c| StrataVal::string(c.to_string()))
                    .collect(),
            )),
            StrataVal::Object(obj) if is_array_like(obj.as_ref()) => {
                let len = obj.length().unwrap_or(0);
                Ok(Seq::from_vec(
                    (0..len)
                        .map(|i| obj.element(i).unwrap_or(StrataVal::Nil))
                        .collect(),
                ))
            }
            other => match other.as_seqable() {
                Some(coll) => coll.seq(),
                None => Err(Error::type_error_in("seq", "seqable", self.type_name())),
            },
        }
    }

    /// Like [`try_seq`](Self::try_seq) but treats non-seqable values as empty.
    pub(crate) fn seq_or_empty(&self) -> Option<Seq> {
        self.try_seq().ok().flatten()
    }

    pub fn is_seqable(&self) -> bool {
        match self {
            StrataVal::Nil | StrataVal::Str(_) => true,
            StrataVal::Object(obj) => is_array_like(obj.as_ref()),
            other => other.as_seqable().is_some(),
        }
    }

    /// Element count when it is known without walking a sequence.
    pub fn fast_count(&self) -> Option<usize> {
        match self {
            StrataVal::Nil => Some(0),
            StrataVal::Array(a) => Some(a.count()),
            StrataVal::List(l) => Some(l.count()),
            StrataVal::Vector(v) => Some(v.count()),
            StrataVal::Subvec(v) => Some(v.count()),
            StrataVal::ObjMap(m) => Some(m.count()),
            StrataVal::HashMap(m) => Some(m.count()),
            StrataVal::Set(s) => Some(s.count()),
            StrataVal::Queue(q) => Some(q.count()),
            StrataVal::Range(r) => Some(r.count()),
            StrataVal::Seq(s) => s.known_count(),
            StrataVal::Object(obj) if is_array_like(obj.as_ref()) => obj.length(),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    /// Metadata attached to the value, if any.
    pub fn meta(&self) -> Option<&Meta> {
        match self {
            StrataVal::List(l) => l.meta(),
            StrataVal::Vector(v) => v.meta(),
            StrataVal::Subvec(v) => v.meta(),
            StrataVal::ObjMap(m) => m.meta(),
            StrataVal::HashMap(m) => m.meta(),
            StrataVal::Set(s) => s.meta(),
            StrataVal::Queue(q) => q.meta(),
            StrataVal::Range(r) => r.meta(),
            StrataVal::LazySeq(l) => l.meta(),
            _ => None,
        }
    }

    /// The same value with `meta` attached. Only persistent collections
    /// carry metadata.
    pub fn with_meta(&self, meta: Option<Meta>) -> Result<StrataVal> {
        Ok(match self {
            StrataVal::List(l) => StrataVal::List(l.with_meta(meta)),
            StrataVal::Vector(v) => StrataVal::Vector(v.with_meta(meta)),
            StrataVal::Subvec(v) => StrataVal::Subvec(v.with_meta(meta)),
            StrataVal::ObjMap(m) => StrataVal::ObjMap(m.with_meta(meta)),
            StrataVal::HashMap(m) => StrataVal::HashMap(m.with_meta(meta)),
            StrataVal::Set(s) => StrataVal::Set(s.with_meta(meta)),
            StrataVal::Queue(q) => StrataVal::Queue(q.with_meta(meta)),
            StrataVal::Range(r) => StrataVal::Range(r.with_meta(meta)),
            StrataVal::LazySeq(l) => StrataVal::LazySeq(l.with_meta(meta)),
            _ => {
                return Err(Error::type_error_in(
                    "with_meta",
                    "collection",
                    self.type_name(),
                ));
            }
        })
    }
}

impl From<Keyword> for StrataVal {
    fn from(kw: Keyword) -> Self {
        StrataVal::Keyword(kw)
    }
}

impl From<StrataFn> for StrataVal {
    fn from(f: StrataFn) -> Self {
        StrataVal::Fn(f)
    }
}

impl From<Seq> for StrataVal {
    fn from(seq: Seq) -> Self {
        StrataVal::Seq(seq)
    }
}

/// Counts and indices. Saturates at `i64::MAX`.
impl From<usize> for StrataVal {
    fn from(n: usize) -> Self {
        StrataVal::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

// ============================================================================
// Tests
// ============================================================================
