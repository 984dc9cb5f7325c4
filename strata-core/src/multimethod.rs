// strata-core - Multimethods
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Runtime polymorphic dispatch through a hierarchy.
//!
//! A [`MultiFn`] calls its dispatch function on the arguments and picks the
//! method whose dispatch value the result `isa`. When several methods match,
//! the one that dominates all the others wins, where `a` dominates `b` when
//! `a` is preferred over `b` or `a isa b`. Two matches that don't dominate each
//! other are an error; ambiguity is never broken by insertion order.
//!
//! Resolutions are cached per dispatch value. The cache is emptied by every
//! method-table or preference change, and whenever the hierarchy's version
//! moves past the one the cache was filled against.

// StrataVal keys hash structurally; see hierarchy.rs.
#![allow(clippy::mutable_key_type)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use strata_value::{Error, Result, StrataFn, StrataVal};
use tracing::{debug, trace};

use crate::hierarchy::{Hierarchy, HierarchyRef};

/// The dispatch value used when none is given: `:default`.
pub fn default_dispatch_val() -> StrataVal {
    StrataVal::keyword("default")
}

struct MethodCache {
    entries: HashMap<StrataVal, StrataFn>,
    hierarchy_version: u64,
}

// ============================================================================
// Multimethod Type
// ============================================================================

/// A multimethod.
pub struct MultiFn {
    name: String,
    dispatch_fn: StrataFn,
    default_dispatch_val: StrataVal,
    hierarchy: HierarchyRef,
    /// Method table in insertion order: dispatch value -> method
    methods: RefCell<Vec<(StrataVal, StrataFn)>>,
    /// Preferences: preferred dispatch value -> values it is preferred over
    prefers: RefCell<HashMap<StrataVal, HashSet<StrataVal>>>,
    cache: RefCell<MethodCache>,
}

impl MultiFn {
    /// Create a multimethod dispatching through `hierarchy`.
    pub fn new(
        name: impl Into<String>,
        dispatch_fn: StrataFn,
        default_dispatch_val: StrataVal,
        hierarchy: HierarchyRef,
    ) -> Self {
        let hierarchy_version = hierarchy.borrow().version();
        MultiFn {
            name: name.into(),
            dispatch_fn,
            default_dispatch_val,
            hierarchy,
            methods: RefCell::new(Vec::new()),
            prefers: RefCell::new(HashMap::new()),
            cache: RefCell::new(MethodCache {
                entries: HashMap::new(),
                hierarchy_version,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dispatch_fn(&self) -> &StrataFn {
        &self.dispatch_fn
    }

    pub fn default_dispatch_val(&self) -> &StrataVal {
        &self.default_dispatch_val
    }

    pub fn hierarchy(&self) -> &HierarchyRef {
        &self.hierarchy
    }

    // ------------------------------------------------------------------------
    // Method table
    // ------------------------------------------------------------------------

    /// Add or replace the method for `dispatch_val`.
    pub fn add_method(&self, dispatch_val: StrataVal, method: StrataFn) {
        {
            let mut methods = self.methods.borrow_mut();
            match methods.iter_mut().find(|(dv, _)| *dv == dispatch_val) {
                Some(entry) => entry.1 = method,
                None => methods.push((dispatch_val, method)),
            }
        }
        self.reset_cache();
    }

    /// Remove the method for `dispatch_val`, if any.
    pub fn remove_method(&self, dispatch_val: &StrataVal) {
        self.methods.borrow_mut().retain(|(dv, _)| dv != dispatch_val);
        self.reset_cache();
    }

    pub fn remove_all_methods(&self) {
        self.methods.borrow_mut().clear();
        self.reset_cache();
    }

    /// Prefer `preferred` over `other` when both match.
    ///
    /// Fails with [`Error::HierarchyCycle`] when `other` already dominates
    /// `preferred`, through earlier preferences or the hierarchy.
    pub fn prefer_method(&self, preferred: StrataVal, other: StrataVal) -> Result<()> {
        {
            let hierarchy = self.hierarchy.borrow();
            if self.dominates(&hierarchy, &other, &preferred) {
                return Err(Error::HierarchyCycle(format!(
                    "Preference conflict in multimethod '{}': {} is already preferred to {}",
                    self.name, other, preferred
                )));
            }
        }
        debug!(multimethod = %self.name, %preferred, %other, "adding preference");
        self.prefers
            .borrow_mut()
            .entry(preferred)
            .or_default()
            .insert(other);
        self.reset_cache();
        Ok(())
    }

    /// The method table in insertion order.
    pub fn methods(&self) -> Vec<(StrataVal, StrataFn)> {
        self.methods.borrow().clone()
    }

    /// The preference table: each value and the values it is preferred over.
    pub fn prefers(&self) -> HashMap<StrataVal, HashSet<StrataVal>> {
        self.prefers.borrow().clone()
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// The method that handles `dispatch_val`, falling back to the default
    /// method. `Ok(None)` when nothing applies.
    pub fn get_method(&self, dispatch_val: &StrataVal) -> Result<Option<StrataFn>> {
        self.sync_cache_version();
        if let Some(method) = self.cache.borrow().entries.get(dispatch_val) {
            trace!(multimethod = %self.name, %dispatch_val, "cache hit");
            return Ok(Some(method.clone()));
        }
        if let Some(method) = self.find_and_cache_best_method(dispatch_val)? {
            return Ok(Some(method));
        }
        Ok(self.method_for(&self.default_dispatch_val))
    }

    /// Compute the dispatch value for `args`, resolve and apply the method.
    pub fn invoke(&self, args: &[StrataVal]) -> Result<StrataVal> {
        let dispatch_val = self.dispatch_fn.call(args)?;
        match self.get_method(&dispatch_val)? {
            Some(method) => method.call(args),
            None => Err(Error::NoApplicableMethod {
                name: self.name.clone(),
                dispatch_val: dispatch_val.to_string(),
            }),
        }
    }

    /// Same as [`invoke`](Self::invoke).
    pub fn dispatch(&self, args: &[StrataVal]) -> Result<StrataVal> {
        self.invoke(args)
    }

    /// Scan the method table for the best match of `dispatch_val` and cache it.
    ///
    /// Every method whose dispatch value `dispatch_val` isa is a candidate.
    /// The winner must dominate each of the other candidates, so the result
    /// does not depend on the order methods were added. The default method is
    /// not consulted here.
    pub fn find_and_cache_best_method(&self, dispatch_val: &StrataVal) -> Result<Option<StrataFn>> {
        let best = {
            let hierarchy = self.hierarchy.borrow();
            let methods = self.methods.borrow();
            let matches: Vec<&(StrataVal, StrataFn)> = methods
                .iter()
                .filter(|(dv, _)| hierarchy.isa(dispatch_val, dv))
                .collect();
            if matches.is_empty() {
                return Ok(None);
            }
            let winners: Vec<&(StrataVal, StrataFn)> = matches
                .iter()
                .copied()
                .filter(|(x, _)| {
                    matches
                        .iter()
                        .all(|(y, _)| x == y || self.dominates(&hierarchy, x, y))
                })
                .collect();
            match winners.as_slice() {
                [winner] => (*winner).clone(),
                _ => return Err(self.ambiguity(&hierarchy, dispatch_val, &matches)),
            }
        };

        let (matched, method) = best;
        debug!(multimethod = %self.name, %dispatch_val, %matched, "resolved method");
        self.cache
            .borrow_mut()
            .entries
            .insert(dispatch_val.clone(), method.clone());
        Ok(Some(method))
    }

    /// Name a pair of candidates that keeps `matches` from having a winner.
    ///
    /// Pairs where neither side dominates the other (or both do) come first. The smallest pair by
    /// printed form is reported so the error is stable across insertion orders.
    fn ambiguity(
        &self,
        hierarchy: &Hierarchy,
        dispatch_val: &StrataVal,
        matches: &[&(StrataVal, StrataFn)],
    ) -> Error {
        let ordered = |x: &StrataVal, y: &StrataVal| {
            let (x, y) = (x.to_string(), y.to_string());
            if x <= y { (x, y) } else { (y, x) }
        };
        let mut unrelated = Vec::new();
        let mut undominated = Vec::new();
        for (i, (x, _)) in matches.iter().enumerate() {
            for (y, _) in &matches[i + 1..] {
                let x_over_y = self.dominates(hierarchy, x, y);
                let y_over_x = self.dominates(hierarchy, y, x);
                if x_over_y == y_over_x {
                    unrelated.push(ordered(x, y));
                } else {
                    undominated.push(ordered(x, y));
                }
            }
        }
        let (first, second) = unrelated
            .into_iter()
            .min()
            .or_else(|| undominated.into_iter().min())
            .unwrap_or_default();
        Error::DispatchAmbiguity {
            name: self.name.clone(),
            dispatch_val: dispatch_val.to_string(),
            first,
            second,
        }
    }

    fn method_for(&self, dispatch_val: &StrataVal) -> Option<StrataFn> {
        self.methods
            .borrow()
            .iter()
            .find(|(dv, _)| dv == dispatch_val)
            .map(|(_, method)| method.clone())
    }

    /// `x` is preferred over `y`, directly or through the parents of either.
    fn prefers_over(&self, hierarchy: &Hierarchy, x: &StrataVal, y: &StrataVal) -> bool {
        if self
            .prefers
            .borrow()
            .get(x)
            .is_some_and(|over| over.contains(y))
        {
            return true;
        }
        hierarchy
            .parents(y)
            .iter()
            .any(|p| self.prefers_over(hierarchy, x, p))
            || hierarchy
                .parents(x)
                .iter()
                .any(|p| self.prefers_over(hierarchy, p, y))
    }

    fn dominates(&self, hierarchy: &Hierarchy, x: &StrataVal, y: &StrataVal) -> bool {
        self.prefers_over(hierarchy, x, y) || hierarchy.isa(x, y)
    }

    // ------------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------------

    fn reset_cache(&self) {
        let version = self.hierarchy.borrow().version();
        let mut cache = self.cache.borrow_mut();
        if !cache.entries.is_empty() {
            debug!(multimethod = %self.name, entries = cache.entries.len(), "resetting method cache");
        }
        cache.entries.clear();
        cache.hierarchy_version = version;
    }

    fn sync_cache_version(&self) {
        let version = self.hierarchy.borrow().version();
        if self.cache.borrow().hierarchy_version != version {
            self.reset_cache();
        }
    }

    /// Number of cached resolutions.
    pub fn cache_size(&self) -> usize {
        self.cache.borrow().entries.len()
    }

    /// A function value that invokes this multimethod.
    pub fn to_fn(self: &Rc<Self>) -> StrataFn {
        let multi = Rc::clone(self);
        StrataFn::new(self.name.as_str(), move |args| multi.invoke(args))
    }
}

impl fmt::Debug for MultiFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<MultiFn {}>", self.name)
    }
}

impl fmt::Display for MultiFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<MultiFn {}>", self.name)
    }
}
