// strata-value - Print settings
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Thread-local print settings used by `Display` for collections.

use std::cell::Cell;

/// Default cap on elements printed from a lazy or unbounded sequence.
pub const DEFAULT_LAZY_PRINT_LIMIT: usize = 32;

thread_local! {
    static PRINT_LENGTH: Cell<Option<usize>> = const { Cell::new(None) };
    static LAZY_PRINT_LIMIT: Cell<usize> = const { Cell::new(DEFAULT_LAZY_PRINT_LIMIT) };
}

/// Maximum number of elements printed for any collection (`None` = unlimited).
pub fn get_print_length() -> Option<usize> {
    PRINT_LENGTH.with(Cell::get)
}

/// Set the print length, returning the previous setting.
pub fn set_print_length(len: Option<usize>) -> Option<usize> {
    PRINT_LENGTH.with(|cell| cell.replace(len))
}

pub fn get_lazy_print_limit() -> usize {
    LAZY_PRINT_LIMIT.with(Cell::get)
}

/// Set the lazy print limit, returning the previous setting.
pub fn set_lazy_print_limit(limit: usize) -> usize {
    LAZY_PRINT_LIMIT.with(|cell| cell.replace(limit))
}
