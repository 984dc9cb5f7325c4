// strata-core - Protocol table
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Named protocols and the type-tag side table that resolves them.
//!
//! A protocol declares a set of operations. Implementations are registered
//! per [`TypeTag`] or against the `"_"` default. Resolving an operation for a
//! value tries, in order:
//!
//! 1. the value's own hook ([`StrataObject::protocol_method`]),
//! 2. the table entry for the value's type tag,
//! 3. the protocol's default entry,
//!
//! and fails with [`Error::MissingProtocol`] when none applies. Exactly one
//! implementation is ever invoked.
//!
//! [`StrataObject::protocol_method`]: strata_value::StrataObject::protocol_method

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use strata_value::{Error, Result, StrataFn, StrataVal, TypeTag, tag_of};
use tracing::debug;

/// Names of the core protocols and their operations.
pub mod names {
    pub const SEQABLE: &str = "Seqable";
    pub const SEQ: &str = "Seq";
    pub const NEXT: &str = "Next";
    pub const COUNTED: &str = "Counted";
    pub const COLLECTION: &str = "Collection";
    pub const INDEXED: &str = "Indexed";
    pub const LOOKUP: &str = "Lookup";
    pub const ASSOCIATIVE: &str = "Associative";
    pub const MAP: &str = "Map";
    pub const SET: &str = "Set";
    pub const STACK: &str = "Stack";
    pub const REDUCIBLE: &str = "Reducible";
    pub const EQUIV: &str = "Equiv";
    pub const HASHABLE: &str = "Hashable";
    pub const META: &str = "Meta";
}

/// Where an implementation is registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImplTarget {
    Tag(TypeTag),
    /// The `"_"` fallback used when no tag entry matches
    Default,
}

impl From<TypeTag> for ImplTarget {
    fn from(tag: TypeTag) -> Self {
        ImplTarget::Tag(tag)
    }
}

impl fmt::Display for ImplTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImplTarget::Tag(tag) => write!(f, "{}", tag),
            ImplTarget::Default => f.write_str("_"),
        }
    }
}

// ============================================================================
// Protocols
// ============================================================================

/// Method implementations registered for one target.
#[derive(Clone, Default)]
pub struct TypeImpl {
    pub methods: HashMap<String, StrataFn>,
}

/// A named protocol with its declared operations and implementations.
pub struct Protocol {
    name: String,
    ops: Vec<String>,
    impls: HashMap<ImplTarget, TypeImpl>,
}

impl Protocol {
    fn new(name: &str) -> Self {
        Protocol {
            name: name.to_string(),
            ops: Vec::new(),
            impls: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared operations in declaration order.
    pub fn ops(&self) -> &[String] {
        &self.ops
    }

    pub fn declares(&self, op: &str) -> bool {
        self.ops.iter().any(|o| o == op)
    }

    fn method(&self, target: ImplTarget, op: &str) -> Option<StrataFn> {
        self.impls.get(&target)?.methods.get(op).cloned()
    }
}

impl fmt::Debug for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Protocol {}>", self.name)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// The protocol table.
#[derive(Default)]
pub struct ProtocolRegistry {
    protocols: RefCell<HashMap<String, Protocol>>,
}

impl ProtocolRegistry {
    /// An empty registry with no protocols declared.
    pub fn new() -> Self {
        ProtocolRegistry::default()
    }

    /// A registry with the core collection protocols declared and
    /// implemented for every builtin type.
    pub fn with_core_protocols() -> Self {
        let registry = ProtocolRegistry::new();
        crate::core_protocols::install(&registry);
        registry
    }

    /// Declare `protocol` with operations `ops`.
    ///
    /// Declaring an existing protocol again adds any new operations and keeps
    /// its implementations.
    pub fn define(&self, protocol: &str, ops: &[&str]) {
        let mut protocols = self.protocols.borrow_mut();
        let proto = protocols
            .entry(protocol.to_string())
            .or_insert_with(|| Protocol::new(protocol));
        for op in ops {
            if !proto.declares(op) {
                proto.ops.push((*op).to_string());
            }
        }
        debug!(protocol, ops = ?proto.ops, "defined protocol");
    }

    pub fn is_defined(&self, protocol: &str) -> bool {
        self.protocols.borrow().contains_key(protocol)
    }

    /// Declared operations of `protocol`, if it exists.
    pub fn ops(&self, protocol: &str) -> Option<Vec<String>> {
        self.protocols.borrow().get(protocol).map(|p| p.ops.clone())
    }

    /// Register `method` as the implementation of `protocol/op` for `target`.
    ///
    /// The protocol and the operation must already be declared.
    pub fn register(
        &self,
        protocol: &str,
        op: &str,
        target: impl Into<ImplTarget>,
        method: StrataFn,
    ) -> Result<()> {
        {
            let protocols = self.protocols.borrow();
            let proto = protocols.get(protocol).ok_or_else(|| {
                Error::argument("register", format!("undeclared protocol {}", protocol))
            })?;
            if !proto.declares(op) {
                return Err(Error::argument(
                    "register",
                    format!("protocol {} has no operation {}", protocol, op),
                ));
            }
        }
        self.insert_impl(protocol, op, target.into(), method);
        Ok(())
    }

    /// Store an implementation, declaring the protocol and operation if needed.
    pub(crate) fn insert_impl(
        &self,
        protocol: &str,
        op: &str,
        target: ImplTarget,
        method: StrataFn,
    ) {
        let mut protocols = self.protocols.borrow_mut();
        let proto = protocols
            .entry(protocol.to_string())
            .or_insert_with(|| Protocol::new(protocol));
        if !proto.declares(op) {
            proto.ops.push(op.to_string());
        }
        proto
            .impls
            .entry(target)
            .or_default()
            .methods
            .insert(op.to_string(), method);
        debug!(protocol, op, %target, "registered implementation");
    }

    /// Register several operations of `protocol` for one target.
    pub fn extend(
        &self,
        protocol: &str,
        target: impl Into<ImplTarget>,
        methods: Vec<(&str, StrataFn)>,
    ) -> Result<()> {
        let target = target.into();
        for (op, method) in methods {
            self.register(protocol, op, target, method)?;
        }
        Ok(())
    }

    /// Find the implementation of `protocol/op` for `value`.
    pub fn resolve(&self, protocol: &str, op: &str, value: &StrataVal) -> Result<StrataFn> {
        if let StrataVal::Object(obj) = value
            && let Some(method) = obj.protocol_method(protocol, op)
        {
            return Ok(method);
        }

        let protocols = self.protocols.borrow();
        let Some(proto) = protocols.get(protocol) else {
            return Err(Error::missing_protocol(protocol, op, value));
        };
        proto
            .method(ImplTarget::Tag(tag_of(value)), op)
            .or_else(|| proto.method(ImplTarget::Default, op))
            .ok_or_else(|| Error::missing_protocol(protocol, op, value))
    }

    /// Resolve `protocol/op` on the first argument and apply it to `args`.
    pub fn invoke(&self, protocol: &str, op: &str, args: &[StrataVal]) -> Result<StrataVal> {
        let Some(target) = args.first() else {
            return Err(Error::ArityError {
                expected: strata_value::AritySpec::AtLeast(1),
                got: 0,
                name: Some(format!("{}/{}", protocol, op)),
            });
        };
        // The borrow on the table is released before the method runs, so
        // implementations may dispatch back into the registry.
        let method = self.resolve(protocol, op, target)?;
        method.call(args)
    }

    /// True when every operation of `protocol` resolves for `value`.
    pub fn satisfies(&self, protocol: &str, value: &StrataVal) -> bool {
        let Some(ops) = self.ops(protocol) else {
            return false;
        };
        !ops.is_empty() && ops.iter().all(|op| self.resolve(protocol, op, value).is_ok())
    }

    /// True when `target` has its own entry for every operation of `protocol`.
    pub fn extends(&self, protocol: &str, target: impl Into<ImplTarget>) -> bool {
        let target = target.into();
        let protocols = self.protocols.borrow();
        protocols.get(protocol).is_some_and(|proto| {
            proto
                .impls
                .get(&target)
                .is_some_and(|imp| proto.ops.iter().all(|op| imp.methods.contains_key(op)))
        })
    }

    /// Targets with at least one implementation of `protocol`.
    pub fn extenders(&self, protocol: &str) -> Vec<ImplTarget> {
        self.protocols
            .borrow()
            .get(protocol)
            .map(|proto| proto.impls.keys().copied().collect())
            .unwrap_or_default()
    }
}

impl fmt::Debug for ProtocolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let protocols = self.protocols.borrow();
        let mut names: Vec<_> = protocols.keys().collect();
        names.sort();
        f.debug_struct("ProtocolRegistry")
            .field("protocols", &names)
            .finish()
    }
}
