// strata-core - Runtime context
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The [`Runtime`]: one protocol table, one global hierarchy and the
//! configuration they were created with.
//!
//! Runtimes are passed around explicitly. A thread-local default runtime is
//! available through [`with_default_runtime`] for code that doesn't want to
//! thread one through.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use strata_value::{Result, StrataFn, StrataVal};
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::hierarchy::{Hierarchy, HierarchyRef};
use crate::multimethod::{MultiFn, default_dispatch_val};
use crate::protocol::ProtocolRegistry;

/// A protocol table, a global hierarchy and their configuration.
pub struct Runtime {
    protocols: ProtocolRegistry,
    hierarchy: HierarchyRef,
    config: RuntimeConfig,
}

impl Runtime {
    /// A runtime with the core protocols and the default configuration.
    pub fn new() -> Self {
        Runtime::with_config(RuntimeConfig::default())
    }

    /// A runtime with the core protocols, applying `config` to this thread.
    pub fn with_config(config: RuntimeConfig) -> Self {
        config.apply();
        debug!(?config, "creating runtime");
        Runtime {
            protocols: ProtocolRegistry::with_core_protocols(),
            hierarchy: Hierarchy::shared(),
            config,
        }
    }

    pub fn protocols(&self) -> &ProtocolRegistry {
        &self.protocols
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The global hierarchy used by multimethods created through this runtime.
    pub fn global_hierarchy(&self) -> HierarchyRef {
        Rc::clone(&self.hierarchy)
    }

    // ========================================================================
    // Multimethods
    // ========================================================================

    /// A multimethod with `:default` as its default dispatch value,
    /// dispatching through the global hierarchy.
    pub fn multi_fn(&self, name: impl Into<String>, dispatch_fn: StrataFn) -> MultiFn {
        MultiFn::new(name, dispatch_fn, default_dispatch_val(), self.global_hierarchy())
    }

    // ========================================================================
    // Global hierarchy
    // ========================================================================

    pub fn derive(&self, tag: StrataVal, parent: StrataVal) -> Result<()> {
        self.hierarchy.borrow_mut().derive(tag, parent)
    }

    pub fn underive(&self, tag: &StrataVal, parent: &StrataVal) {
        self.hierarchy.borrow_mut().underive(tag, parent)
    }

    pub fn isa(&self, child: &StrataVal, parent: &StrataVal) -> bool {
        self.hierarchy.borrow().isa(child, parent)
    }

    pub fn parents(&self, tag: &StrataVal) -> HashSet<StrataVal> {
        self.hierarchy.borrow().parents(tag)
    }

    pub fn ancestors(&self, tag: &StrataVal) -> HashSet<StrataVal> {
        self.hierarchy.borrow().ancestors(tag)
    }

    pub fn descendants(&self, tag: &StrataVal) -> HashSet<StrataVal> {
        self.hierarchy.borrow().descendants(tag)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("protocols", &self.protocols)
            .field("hierarchy", &self.hierarchy.borrow())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Default runtime
// ============================================================================

thread_local! {
    static DEFAULT_RUNTIME: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

/// The thread's default runtime, created on first use.
pub fn default_runtime() -> Rc<Runtime> {
    DEFAULT_RUNTIME.with(|slot| {
        Rc::clone(
            slot.borrow_mut()
                .get_or_insert_with(|| Rc::new(Runtime::new())),
        )
    })
}

/// Run `f` against the thread's default runtime.
pub fn with_default_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> R {
    let runtime = default_runtime();
    f(&runtime)
}

/// Replace the thread's default runtime, returning the previous one.
pub fn set_default_runtime(runtime: Option<Rc<Runtime>>) -> Option<Rc<Runtime>> {
    DEFAULT_RUNTIME.with(|slot| slot.replace(runtime))
}
