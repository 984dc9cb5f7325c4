// strata-core - Runtime configuration
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Settings a [`Runtime`](crate::Runtime) applies when it is created.

use strata_value::config::DEFAULT_LAZY_PRINT_LIMIT;
use strata_value::{set_lazy_print_limit, set_print_length};

/// Runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Maximum number of elements printed for any collection (`None` = unlimited)
    pub print_length: Option<usize>,
    /// Maximum number of elements printed from a lazy or unbounded sequence
    pub lazy_print_limit: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            print_length: None,
            lazy_print_limit: DEFAULT_LAZY_PRINT_LIMIT,
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_print_length(mut self, length: Option<usize>) -> Self {
        self.print_length = length;
        self
    }

    pub fn with_lazy_print_limit(mut self, limit: usize) -> Self {
        self.lazy_print_limit = limit;
        self
    }

    /// The settings currently in effect on this thread.
    pub fn current() -> Self {
        Self {
            print_length: strata_value::get_print_length(),
            lazy_print_limit: strata_value::get_lazy_print_limit(),
        }
    }

    /// Install these settings on the current thread, returning the previous ones.
    pub fn apply(&self) -> RuntimeConfig {
        RuntimeConfig {
            print_length: set_print_length(self.print_length),
            lazy_print_limit: set_lazy_print_limit(self.lazy_print_limit),
        }
    }
}
