// strata-core - Protocol table, hierarchies and multimethod dispatch
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # strata-core
//!
//! The dispatch layer of the Strata runtime: the protocol table with its
//! builtin collection implementations, hierarchies, multimethods, the
//! protocol-dispatched collection operations and a small sequence library.
//!
//! ```
//! use strata_core::{Runtime, StrataFn, StrataVal, Keyword};
//!
//! let rt = Runtime::new();
//! rt.derive(StrataVal::keyword("square"), StrataVal::keyword("shape")).unwrap();
//!
//! let area = rt.multi_fn("area", StrataFn::keyword_getter(Keyword::new("shape-tag")));
//! area.add_method(
//!     StrataVal::keyword("shape"),
//!     StrataFn::new("generic", |_| Ok(StrataVal::int(0))),
//! );
//!
//! let square = StrataVal::map(vec![(StrataVal::keyword("shape-tag"), StrataVal::keyword("square"))]);
//! assert_eq!(area.invoke(&[square]).unwrap(), StrataVal::int(0));
//! ```

mod core_protocols;

pub mod config;
pub mod hierarchy;
pub mod multimethod;
mod ops;
pub mod protocol;
pub mod runtime;
pub mod seq_fns;

pub use config::RuntimeConfig;
pub use hierarchy::{Hierarchy, HierarchyRef};
pub use multimethod::{MultiFn, default_dispatch_val};
pub use protocol::{ImplTarget, ProtocolRegistry, names};
pub use runtime::{Runtime, default_runtime, set_default_runtime, with_default_runtime};

// Re-export value types for convenience
pub use strata_value::{
    Error, ErrorKind, FromStrataVal, IntoStrataVal, Keyword, Result, Seq, SeqIter, StrataFn,
    StrataObject, StrataVal, TypeTag, tag_of,
};
