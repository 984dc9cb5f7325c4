// strata-core - Hierarchies for ad-hoc taxonomies
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Parent/ancestor/descendant relations between tags, used by `isa`-based
//! multimethod dispatch.
//!
//! Tags are arbitrary values, usually keywords. [`TypeTag::keyword`] maps a
//! protocol type tag into the same space so types can take part too.
//!
//! [`TypeTag::keyword`]: strata_value::TypeTag::keyword

// StrataVal keys hash structurally; lazy sequences memoize behind a RefCell
// but never change their contents once realized.
#![allow(clippy::mutable_key_type)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use strata_value::{Error, Result, SeqIter, StrataVal};
use tracing::debug;

/// A hierarchy shared between the runtime and the multimethods dispatching on it.
pub type HierarchyRef = Rc<RefCell<Hierarchy>>;

// ============================================================================
// Hierarchy Type
// ============================================================================

/// A hierarchy of tags.
///
/// Relationships are established with [`derive`](Self::derive) and queried
/// with [`isa`](Self::isa). The ancestor and descendant tables are always the
/// transitive closure of the parent table, and the relation never contains a
/// cycle.
///
/// Every successful mutation bumps [`version`](Self::version), which is what
/// multimethod caches check to decide whether they are still fresh.
#[derive(Clone, Default)]
pub struct Hierarchy {
    /// Direct parent relationships: child -> set of direct parents
    parents: HashMap<StrataVal, HashSet<StrataVal>>,
    /// Transitive ancestors: child -> set of all ancestors
    ancestors: HashMap<StrataVal, HashSet<StrataVal>>,
    /// Transitive descendants: parent -> set of all descendants
    descendants: HashMap<StrataVal, HashSet<StrataVal>>,
    /// Every (child, parent) edge in the order it was derived
    edges: Vec<(StrataVal, StrataVal)>,
    version: u64,
}

impl Hierarchy {
    /// Create a new empty hierarchy.
    pub fn new() -> Self {
        Hierarchy::default()
    }

    /// Create a new empty hierarchy behind a shared reference.
    pub fn shared() -> HierarchyRef {
        Rc::new(RefCell::new(Hierarchy::new()))
    }

    /// Monotonic counter bumped by every successful `derive` and `underive`.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of direct parent/child edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Establish that `tag` derives from `parent`.
    ///
    /// Deriving an edge that already exists does nothing. Fails with
    /// [`Error::HierarchyCycle`] when `tag == parent` or when `tag` is already
    /// an ancestor of `parent`.
    pub fn derive(&mut self, tag: StrataVal, parent: StrataVal) -> Result<()> {
        if tag == parent {
            return Err(Error::HierarchyCycle(format!(
                "Cannot derive {} from itself",
                tag
            )));
        }
        if self.has_edge(&tag, &parent) {
            return Ok(());
        }
        if self.is_ancestor(&parent, &tag) {
            return Err(Error::HierarchyCycle(format!(
                "Cyclic derivation: {} already derives from {}",
                parent, tag
            )));
        }

        debug!(%tag, %parent, "deriving");
        self.link(tag, parent);
        self.version += 1;
        Ok(())
    }

    /// Remove the edge from `tag` to `parent`.
    ///
    /// A missing edge is a no-op. Otherwise the closures are rebuilt from
    /// scratch by replaying every remaining edge.
    pub fn underive(&mut self, tag: &StrataVal, parent: &StrataVal) {
        if !self.has_edge(tag, parent) {
            return;
        }

        let remaining: Vec<_> = std::mem::take(&mut self.edges)
            .into_iter()
            .filter(|(c, p)| !(c == tag && p == parent))
            .collect();
        debug!(%tag, %parent, edges = remaining.len(), "underiving, rebuilding hierarchy");

        self.parents.clear();
        self.ancestors.clear();
        self.descendants.clear();
        for (child, p) in remaining {
            self.link(child, p);
        }
        self.version += 1;
    }

    /// Check if `child` derives from (is-a) `parent`.
    ///
    /// True when the two are equal, when `parent` is an ancestor of `child`,
    /// or when both are sequential values of the same length whose elements
    /// are pairwise `isa`.
    pub fn isa(&self, child: &StrataVal, parent: &StrataVal) -> bool {
        if child == parent {
            return true;
        }
        if !child.is_sequential() {
            return self.is_ancestor(child, parent);
        }
        // The child may be endless; compare it against the finite stored tags
        if self
            .ancestors
            .iter()
            .any(|(tag, ancs)| tag.is_sequential() && tag == child && holds(ancs, parent))
        {
            return true;
        }
        if !parent.is_sequential() {
            return false;
        }

        if let (Some(a), Some(b)) = (child.fast_count(), parent.fast_count())
            && a != b
        {
            return false;
        }

        // Walk both in step so a long or endless side stops at the first mismatch
        let (Ok(children), Ok(parents)) = (child.try_seq(), parent.try_seq()) else {
            return false;
        };
        let mut children = SeqIter::from(children);
        let mut parents = SeqIter::from(parents);
        loop {
            match (children.next(), parents.next()) {
                (None, None) => return true,
                (Some(Ok(c)), Some(Ok(p))) if self.isa(&c, &p) => {}
                _ => return false,
            }
        }
    }

    /// Direct parents of `tag`.
    pub fn parents(&self, tag: &StrataVal) -> HashSet<StrataVal> {
        self.parents.get(tag).cloned().unwrap_or_default()
    }

    /// All ancestors of `tag` (transitive closure of parents).
    pub fn ancestors(&self, tag: &StrataVal) -> HashSet<StrataVal> {
        self.ancestors.get(tag).cloned().unwrap_or_default()
    }

    /// All descendants of `tag` (transitive closure of children).
    pub fn descendants(&self, tag: &StrataVal) -> HashSet<StrataVal> {
        self.descendants.get(tag).cloned().unwrap_or_default()
    }

    fn has_edge(&self, tag: &StrataVal, parent: &StrataVal) -> bool {
        self.parents.get(tag).is_some_and(|ps| ps.contains(parent))
    }

    fn is_ancestor(&self, tag: &StrataVal, ancestor: &StrataVal) -> bool {
        self.ancestors
            .get(tag)
            .is_some_and(|ancs| holds(ancs, ancestor))
    }

    /// Insert an edge known not to close a cycle and propagate the closures.
    fn link(&mut self, tag: StrataVal, parent: StrataVal) {
        // Everything at or below `tag` gains everything at or above `parent`
        let mut below = self.descendants(&tag);
        below.insert(tag.clone());
        let mut above = self.ancestors(&parent);
        above.insert(parent.clone());

        for t in &below {
            self.ancestors
                .entry(t.clone())
                .or_default()
                .extend(above.iter().cloned());
        }
        for a in &above {
            self.descendants
                .entry(a.clone())
                .or_default()
                .extend(below.iter().cloned());
        }

        self.parents
            .entry(tag.clone())
            .or_default()
            .insert(parent.clone());
        self.edges.push((tag, parent));
    }
}

/// Membership without hashing a sequential value, which may be endless.
fn holds(set: &HashSet<StrataVal>, val: &StrataVal) -> bool {
    if val.is_sequential() {
        set.iter().any(|member| member == val)
    } else {
        set.contains(val)
    }
}

impl fmt::Debug for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#<Hierarchy: {} relationships, version {}>",
            self.edges.len(),
            self.version
        )
    }
}

impl fmt::Display for Hierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Hierarchy: {} relationships>", self.edges.len())
    }
}
