// strata-value - Value model and persistent collections for the Strata runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # strata-value
//!
//! The value model of the Strata runtime: [`StrataVal`], the [`TypeTag`]
//! classifier, interned keywords, the shared error type, the collection
//! traits and every persistent collection type.

pub mod coll;
pub mod compare;
pub mod config;
pub mod convert;
mod equiv;
pub mod error;
pub mod keyword;
mod print;
pub mod seq;
pub mod tag;
pub mod traits;
pub mod value;

pub use coll::{
    HostArray, LazySeq, ObjMap, PersistentHashMap, PersistentList, PersistentQueue,
    PersistentSet, PersistentVector, Range, Subvec,
};
pub use compare::compare;
pub use config::{get_lazy_print_limit, get_print_length, set_lazy_print_limit, set_print_length};
pub use convert::{FromStrataVal, IntoStrataVal};
pub use error::{AritySpec, Error, ErrorKind, Result};
pub use keyword::Keyword;
pub use seq::{Seq, SeqIter};
pub use tag::{TypeTag, tag_of};
pub use traits::{
    Associative, Collection, Counted, Equiv, Hashable, Indexed, Lookup, MapLike, Reducible,
    Seqable, SetLike, Stack, WithMeta,
};
pub use value::{Meta, StrataFn, StrataObject, StrataVal};
