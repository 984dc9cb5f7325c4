// strata-core - Builtin protocol implementations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Registers the core collection protocols for every builtin type.
//!
//! Implementations are registered once per type tag and delegate to the
//! collection traits in `strata-value`. Nil gets the nil-punning
//! implementations (empty seq, zero count, `conj` onto a list). Strings and
//! host arrays are readable but not persistent collections. `Equiv`,
//! `Hashable` and `Meta/meta` carry `"_"` defaults that work for any value.

use strata_value::{
    AritySpec, Equiv, Error, Hashable, PersistentList, Result, SeqIter, StrataFn, StrataVal,
    TypeTag,
};

use crate::protocol::{ImplTarget, ProtocolRegistry, names};

// ============================================================================
// Type tag groups
// ============================================================================

const READABLE: [TypeTag; 12] = [
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
    TypeTag::Array,
    TypeTag::String,
];

const INDEXED: [TypeTag; 8] = [
    TypeTag::Array,
    TypeTag::String,
    TypeTag::LIST,
    TypeTag::VECTOR,
    TypeTag::SUBVEC,
    TypeTag::RANGE,
    TypeTag::LAZY_SEQ,
    TypeTag::SEQ,
];

const LOOKUP: [TypeTag; 6] = [
    TypeTag::Array,
    TypeTag::VECTOR,
    TypeTag::SUBVEC,
    TypeTag::OBJ_MAP,
    TypeTag::HASH_MAP,
    TypeTag::SET,
];

const ASSOCIATIVE: [TypeTag; 4] = [
    TypeTag::VECTOR,
    TypeTag::SUBVEC,
    TypeTag::OBJ_MAP,
    TypeTag::HASH_MAP,
];

const MAPS: [TypeTag; 2] = [TypeTag::OBJ_MAP, TypeTag::HASH_MAP];

const STACKS: [TypeTag; 4] = [
    TypeTag::LIST,
    TypeTag::VECTOR,
    TypeTag::SUBVEC,
    TypeTag::QUEUE,
];

const WITH_META: [TypeTag; 9] = [
    TypeTag::LIST,
    TypeTag::VECTOR,
    TypeTag::SUBVEC,
    TypeTag::OBJ_MAP,
    TypeTag::HASH_MAP,
    TypeTag::SET,
    TypeTag::QUEUE,
    TypeTag::RANGE,
    TypeTag::LAZY_SEQ,
];

// ============================================================================
// Helpers
// ============================================================================

fn check_arity(name: &str, expected: &AritySpec, got: usize) -> Result<()> {
    let ok = match expected {
        AritySpec::Exact(n) => got == *n,
        AritySpec::AtLeast(n) => got >= *n,
        AritySpec::Range(min, max) => (*min..=*max).contains(&got),
    };
    if ok {
        Ok(())
    } else {
        Err(Error::ArityError {
            expected: expected.clone(),
            got,
            name: Some(name.to_string()),
        })
    }
}

/// A native implementation with an arity check in front of it.
fn native(
    name: &'static str,
    arity: AritySpec,
    f: impl Fn(&[StrataVal]) -> Result<StrataVal> + 'static,
) -> StrataFn {
    StrataFn::new(name, move |args| {
        check_arity(name, &arity, args.len())?;
        f(args)
    })
}

fn seq_val(coll: &StrataVal) -> Result<StrataVal> {
    Ok(coll.try_seq()?.map_or(StrataVal::Nil, StrataVal::Seq))
}

fn count_val(coll: &StrataVal) -> Result<usize> {
    if let StrataVal::Str(s) = coll {
        return Ok(s.chars().count());
    }
    if let Some(n) = coll.fast_count() {
        return Ok(n);
    }
    match coll.as_counted() {
        Some(c) => Ok(c.count()),
        None => SeqIter::from(coll.try_seq()?).try_fold(0, |n, item| item.map(|_| n + 1)),
    }
}

fn nth_val(coll: &StrataVal, index: usize) -> Result<Option<StrataVal>> {
    match (coll, coll.as_indexed()) {
        (_, Some(c)) => Ok(c.nth(index)),
        (StrataVal::Seq(s), None) => s.nth(index),
        (_, None) => SeqIter::from(coll.try_seq()?).nth(index).transpose(),
    }
}

fn lookup_val(coll: &StrataVal, key: &StrataVal) -> Option<StrataVal> {
    match coll {
        StrataVal::Object(obj) => match key {
            StrataVal::Int(i) => usize::try_from(*i).ok().and_then(|i| obj.element(i)),
            _ => None,
        },
        other => other.as_lookup().and_then(|c| c.lookup(key)),
    }
}

fn int_arg(op: &'static str, val: &StrataVal) -> Result<i64> {
    match val {
        StrataVal::Int(n) => Ok(*n),
        other => Err(Error::type_error_in(op, "int", other.type_name())),
    }
}

fn fn_arg(op: &'static str, val: &StrataVal) -> Result<StrataFn> {
    match val {
        StrataVal::Fn(f) => Ok(f.clone()),
        other => Err(Error::type_error_in(op, "fn", other.type_name())),
    }
}

fn meta_arg(val: &StrataVal) -> Option<StrataVal> {
    (!val.is_nil()).then(|| val.clone())
}

// ============================================================================
// Installation
// ============================================================================

fn on_tags(registry: &ProtocolRegistry, protocol: &str, op: &str, tags: &[TypeTag], f: StrataFn) {
    for tag in tags {
        registry.insert_impl(protocol, op, ImplTarget::Tag(*tag), f.clone());
    }
}

fn on_nil(registry: &ProtocolRegistry, protocol: &str, op: &str, f: StrataFn) {
    registry.insert_impl(protocol, op, ImplTarget::Tag(TypeTag::Nil), f);
}

/// Declare the core protocols and register the builtin implementations.
pub(crate) fn install(registry: &ProtocolRegistry) {
    registry.define(names::SEQABLE, &["seq"]);
    registry.define(names::SEQ, &["first", "rest"]);
    registry.define(names::NEXT, &["next"]);
    registry.define(names::COUNTED, &["count"]);
    registry.define(names::COLLECTION, &["conj", "empty"]);
    registry.define(names::INDEXED, &["nth"]);
    registry.define(names::LOOKUP, &["get"]);
    registry.define(names::ASSOCIATIVE, &["assoc", "contains-key"]);
    registry.define(names::MAP, &["dissoc"]);
    registry.define(names::SET, &["disj"]);
    registry.define(names::STACK, &["peek", "pop"]);
    registry.define(names::REDUCIBLE, &["reduce"]);
    registry.define(names::EQUIV, &["equiv"]);
    registry.define(names::HASHABLE, &["hash"]);
    registry.define(names::META, &["meta", "with-meta"]);

    install_seqs(registry);
    install_collections(registry);
    install_lookups(registry);
    install_stacks(registry);
    install_defaults(registry);
}

fn install_seqs(registry: &ProtocolRegistry) {
    let one = || AritySpec::Exact(1);

    on_tags(registry, names::SEQABLE, "seq", &READABLE, native("seq", one(), |args| seq_val(&args[0])));
    on_nil(registry, names::SEQABLE, "seq", native("seq", one(), |_| Ok(StrataVal::Nil)));

    let first = native("first", one(), |args| {
        Ok(args[0].try_seq()?.map_or(StrataVal::Nil, |s| s.first()))
    });
    on_tags(registry, names::SEQ, "first", &READABLE, first.clone());
    on_nil(registry, names::SEQ, "first", first);

    let rest = native("rest", one(), |args| {
        Ok(match args[0].try_seq()? {
            Some(s) => s.rest(),
            None => StrataVal::List(PersistentList::new()),
        })
    });
    on_tags(registry, names::SEQ, "rest", &READABLE, rest.clone());
    on_nil(registry, names::SEQ, "rest", rest);

    let next = native("next", one(), |args| {
        let next = match args[0].try_seq()? {
            Some(s) => s.next()?,
            None => None,
        };
        Ok(next.map_or(StrataVal::Nil, StrataVal::Seq))
    });
    on_tags(registry, names::NEXT, "next", &READABLE, next.clone());
    on_nil(registry, names::NEXT, "next", next);

    let count = native("count", one(), |args| {
        Ok(StrataVal::from(count_val(&args[0])?))
    });
    on_tags(registry, names::COUNTED, "count", &READABLE, count);
    on_nil(registry, names::COUNTED, "count", native("count", one(), |_| Ok(StrataVal::Int(0))));

    let reduce = native("reduce", AritySpec::Exact(3), |args| {
        let f = fn_arg("reduce", &args[1])?;
        let step = |acc: StrataVal, x: StrataVal| f.call(&[acc, x]);
        match args[0].as_reducible() {
            Some(coll) => coll.reduce(&step, args[2].clone()),
            None => SeqIter::from(args[0].try_seq()?).try_fold(args[2].clone(), |acc, x| step(acc, x?)),
        }
    });
    on_tags(registry, names::REDUCIBLE, "reduce", &READABLE, reduce.clone());
    on_nil(registry, names::REDUCIBLE, "reduce", reduce);
}

fn install_collections(registry: &ProtocolRegistry) {
    let conj = native("conj", AritySpec::AtLeast(2), |args| {
        let mut acc = args[0].clone();
        for x in &args[1..] {
            acc = match acc.as_collection() {
                Some(coll) => coll.conj(x.clone())?,
                None => return Err(Error::missing_protocol(names::COLLECTION, "conj", &acc)),
            };
        }
        Ok(acc)
    });
    on_tags(registry, names::COLLECTION, "conj", &TypeTag::COLLECTIONS, conj);
    on_nil(
        registry,
        names::COLLECTION,
        "conj",
        native("conj", AritySpec::AtLeast(2), |args| {
            let mut items = args[1..].to_vec();
            items.reverse();
            Ok(StrataVal::list(items))
        }),
    );

    let empty = native("empty", AritySpec::Exact(1), |args| {
        args[0]
            .as_collection()
            .map(|c| c.empty())
            .ok_or_else(|| Error::missing_protocol(names::COLLECTION, "empty", &args[0]))
    });
    on_tags(registry, names::COLLECTION, "empty", &TypeTag::COLLECTIONS, empty);
    on_nil(registry, names::COLLECTION, "empty", native("empty", AritySpec::Exact(1), |_| Ok(StrataVal::Nil)));

    let nth = native("nth", AritySpec::Range(2, 3), |args| {
        let index = int_arg("nth", &args[1])?;
        let found = match usize::try_from(index) {
            Ok(i) => nth_val(&args[0], i)?,
            Err(_) => None,
        };
        match (found, args.get(2)) {
            (Some(x), _) => Ok(x),
            (None, Some(not_found)) => Ok(not_found.clone()),
            (None, None) => Err(Error::out_of_bounds(index, count_val(&args[0])?)),
        }
    });
    on_tags(registry, names::INDEXED, "nth", &INDEXED, nth);
    on_nil(
        registry,
        names::INDEXED,
        "nth",
        native("nth", AritySpec::Range(2, 3), |args| {
            Ok(args.get(2).cloned().unwrap_or(StrataVal::Nil))
        }),
    );

    let with_meta = native("with-meta", AritySpec::Exact(2), |args| {
        args[0].with_meta(meta_arg(&args[1]))
    });
    on_tags(registry, names::META, "with-meta", &WITH_META, with_meta);
    let meta = native("meta", AritySpec::Exact(1), |args| {
        Ok(args[0].meta().cloned().unwrap_or(StrataVal::Nil))
    });
    registry.insert_impl(names::META, "meta", ImplTarget::Default, meta);
}

fn install_lookups(registry: &ProtocolRegistry) {
    let get = native("get", AritySpec::Range(2, 3), |args| {
        match (lookup_val(&args[0], &args[1]), args.get(2)) {
            (Some(x), _) => Ok(x),
            (None, Some(not_found)) => Ok(not_found.clone()),
            (None, None) => Err(Error::key_not_found(&args[1])),
        }
    });
    on_tags(registry, names::LOOKUP, "get", &LOOKUP, get);
    on_nil(
        registry,
        names::LOOKUP,
        "get",
        native("get", AritySpec::Range(2, 3), |args| {
            Ok(args.get(2).cloned().unwrap_or(StrataVal::Nil))
        }),
    );

    let contains_key = native("contains-key", AritySpec::Exact(2), |args| {
        Ok(StrataVal::Bool(lookup_val(&args[0], &args[1]).is_some()))
    });
    on_tags(registry, names::ASSOCIATIVE, "contains-key", &LOOKUP, contains_key);
    on_nil(
        registry,
        names::ASSOCIATIVE,
        "contains-key",
        native("contains-key", AritySpec::Exact(2), |_| Ok(StrataVal::Bool(false))),
    );

    let assoc = native("assoc", AritySpec::Exact(3), |args| {
        args[0]
            .as_associative()
            .ok_or_else(|| Error::missing_protocol(names::ASSOCIATIVE, "assoc", &args[0]))?
            .assoc(args[1].clone(), args[2].clone())
    });
    on_tags(registry, names::ASSOCIATIVE, "assoc", &ASSOCIATIVE, assoc);
    on_nil(
        registry,
        names::ASSOCIATIVE,
        "assoc",
        native("assoc", AritySpec::Exact(3), |args| {
            Ok(StrataVal::map(vec![(args[1].clone(), args[2].clone())]))
        }),
    );

    let dissoc = native("dissoc", AritySpec::Exact(2), |args| {
        args[0]
            .as_map()
            .map(|m| m.dissoc(&args[1]))
            .ok_or_else(|| Error::missing_protocol(names::MAP, "dissoc", &args[0]))
    });
    on_tags(registry, names::MAP, "dissoc", &MAPS, dissoc);
    on_nil(registry, names::MAP, "dissoc", native("dissoc", AritySpec::Exact(2), |_| Ok(StrataVal::Nil)));

    let disj = native("disj", AritySpec::Exact(2), |args| {
        args[0]
            .as_set()
            .map(|s| s.disj(&args[1]))
            .ok_or_else(|| Error::missing_protocol(names::SET, "disj", &args[0]))
    });
    on_tags(registry, names::SET, "disj", &[TypeTag::SET], disj);
    on_nil(registry, names::SET, "disj", native("disj", AritySpec::Exact(2), |_| Ok(StrataVal::Nil)));
}

fn install_stacks(registry: &ProtocolRegistry) {
    let peek = native("peek", AritySpec::Exact(1), |args| {
        args[0]
            .as_stack()
            .ok_or_else(|| Error::missing_protocol(names::STACK, "peek", &args[0]))?
            .peek()
    });
    on_tags(registry, names::STACK, "peek", &STACKS, peek);
    on_nil(registry, names::STACK, "peek", native("peek", AritySpec::Exact(1), |_| Ok(StrataVal::Nil)));

    let pop = native("pop", AritySpec::Exact(1), |args| {
        args[0]
            .as_stack()
            .ok_or_else(|| Error::missing_protocol(names::STACK, "pop", &args[0]))?
            .pop()
    });
    on_tags(registry, names::STACK, "pop", &STACKS, pop);
    on_nil(registry, names::STACK, "pop", native("pop", AritySpec::Exact(1), |_| Ok(StrataVal::Nil)));
}

fn install_defaults(registry: &ProtocolRegistry) {
    registry.insert_impl(
        names::EQUIV,
        "equiv",
        ImplTarget::Default,
        native("equiv", AritySpec::Exact(2), |args| {
            Ok(StrataVal::Bool(args[0].equiv(&args[1])))
        }),
    );
    registry.insert_impl(
        names::HASHABLE,
        "hash",
        ImplTarget::Default,
        native("hash", AritySpec::Exact(1), |args| {
            Ok(StrataVal::Int(args[0].hash_code() as i64))
        }),
    );
}
