// strata-value - TypeTag classifier
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Classification of values into the tags used by protocol dispatch.
//!
//! Host values (nil, booleans, numbers, strings, functions, arrays) get one of
//! the primitive tags. Builtin collections, keywords and user types that name
//! themselves get a concrete [`TypeTag::Type`] identity. Objects that don't
//! name themselves are classified by shape: something with a length and
//! indexed access is treated as an array, anything else as a plain object.

use std::fmt;

use crate::keyword::Keyword;
use crate::value::{StrataObject, StrataVal};

/// Type tag for protocol dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Nil,
    Boolean,
    Number,
    String,
    Function,
    Array,
    Object,
    /// A concrete type identity
    Type(&'static str),
}

impl TypeTag {
    pub const KEYWORD: TypeTag = TypeTag::Type("Keyword");
    pub const LIST: TypeTag = TypeTag::Type("List");
    pub const VECTOR: TypeTag = TypeTag::Type("Vector");
    pub const SUBVEC: TypeTag = TypeTag::Type("Subvec");
    pub const OBJ_MAP: TypeTag = TypeTag::Type("ObjMap");
    pub const HASH_MAP: TypeTag = TypeTag::Type("HashMap");
    pub const SET: TypeTag = TypeTag::Type("Set");
    pub const QUEUE: TypeTag = TypeTag::Type("Queue");
    pub const RANGE: TypeTag = TypeTag::Type("Range");
    pub const LAZY_SEQ: TypeTag = TypeTag::Type("LazySeq");
    pub const SEQ: TypeTag = TypeTag::Type("Seq");

    /// Tags of every builtin persistent collection.
    pub const COLLECTIONS: [TypeTag; 10] = [
        TypeTag::LIST,
        TypeTag::VECTOR,
        TypeTag::SUBVEC,
        TypeTag::OBJ_MAP,
        TypeTag::HASH_MAP,
        TypeTag::SET,
        TypeTag::QUEUE,
        TypeTag::RANGE,
        TypeTag::LAZY_SEQ,
        TypeTag::SEQ,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Nil => "nil",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Function => "function",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::Type(name) => *name,
        }
    }

    /// The tag as a hierarchy node, e.g. `:strata.type/Vector`.
    pub fn keyword(&self) -> StrataVal {
        StrataVal::Keyword(Keyword::with_namespace("strata.type", self.name()))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a value. Never fails.
pub fn tag_of(val: &StrataVal) -> TypeTag {
    match val {
        StrataVal::Nil => TypeTag::Nil,
        StrataVal::Bool(_) => TypeTag::Boolean,
        StrataVal::Int(_) | StrataVal::Float(_) => TypeTag::Number,
        StrataVal::Str(_) => TypeTag::String,
        StrataVal::Keyword(_) => TypeTag::KEYWORD,
        StrataVal::Fn(_) => TypeTag::Function,
        StrataVal::Array(_) => TypeTag::Array,
        StrataVal::List(_) => TypeTag::LIST,
        StrataVal::Vector(_) => TypeTag::VECTOR,
        StrataVal::Subvec(_) => TypeTag::SUBVEC,
        StrataVal::ObjMap(_) => TypeTag::OBJ_MAP,
        StrataVal::HashMap(_) => TypeTag::HASH_MAP,
        StrataVal::Set(_) => TypeTag::SET,
        StrataVal::Queue(_) => TypeTag::QUEUE,
        StrataVal::Range(_) => TypeTag::RANGE,
        StrataVal::LazySeq(_) => TypeTag::LAZY_SEQ,
        StrataVal::Seq(_) => TypeTag::SEQ,
        StrataVal::Object(obj) => match obj.type_name() {
            Some(name) => TypeTag::Type(name),
            None if is_array_like(obj.as_ref()) => TypeTag::Array,
            None => TypeTag::Object,
        },
    }
}

/// An object is array-like when it reports a length and, unless empty,
/// answers indexed access at zero.
pub fn is_array_like(obj: &dyn StrataObject) -> bool {
    match obj.length() {
        Some(0) => true,
        Some(_) => obj.element(0).is_some(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;

    #[derive(Debug)]
    struct Pair(StrataVal, StrataVal);

    impl StrataObject for Pair {
        fn length(&self) -> Option<usize> {
            Some(2)
        }

        fn element(&self, index: usize) -> Option<StrataVal> {
            match index {
                0 => Some(self.0.clone()),
                1 => Some(self.1.clone()),
                _ => None,
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Claims;

    impl StrataObject for Claims {
        // Claims a length but has no indexed access
        fn length(&self) -> Option<usize> {
            Some(4)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Point;

    impl StrataObject for Point {
        fn type_name(&self) -> Option<&'static str> {
            Some("Point")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_primitive_tags() {
        assert_eq!(tag_of(&StrataVal::Nil), TypeTag::Nil);
        assert_eq!(tag_of(&StrataVal::Bool(false)), TypeTag::Boolean);
        assert_eq!(tag_of(&StrataVal::int(1)), TypeTag::Number);
        assert_eq!(tag_of(&StrataVal::float(1.5)), TypeTag::Number);
        assert_eq!(tag_of(&StrataVal::string("x")), TypeTag::String);
        assert_eq!(tag_of(&StrataVal::array(vec![])), TypeTag::Array);
    }

    #[test]
    fn test_collection_tags() {
        assert_eq!(tag_of(&StrataVal::vector(vec![])), TypeTag::VECTOR);
        assert_eq!(tag_of(&StrataVal::list(vec![])), TypeTag::LIST);
        assert_eq!(tag_of(&StrataVal::keyword("a")), TypeTag::KEYWORD);
    }

    #[test]
    fn test_object_heuristics() {
        let pair = StrataVal::object(Pair(StrataVal::int(1), StrataVal::int(2)));
        assert_eq!(tag_of(&pair), TypeTag::Array);
        assert_eq!(tag_of(&StrataVal::object(Claims)), TypeTag::Object);
        assert_eq!(tag_of(&StrataVal::object(Point)), TypeTag::Type("Point"));
    }

    #[test]
    fn test_tag_keyword() {
        assert_eq!(TypeTag::VECTOR.keyword(), StrataVal::Keyword(Keyword::parse(":strata.type/Vector")));
        assert_eq!(TypeTag::Nil.keyword().to_string(), ":strata.type/nil");
    }
}
