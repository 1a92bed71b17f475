//! Field declaration factories.
//!
//! Fields are declared with [`field`], [`seq`], and [`mapping`], then
//! attached to a type declaration. Each descriptor records its creation
//! order in a process-global counter; schemas list their fields in that
//! order, so declaration order in source is iteration order at runtime.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::schema::NodeTypeId;
use crate::value::{Primitive, Value};

// Written once per descriptor during declaration, read-only afterward.
static NEXT_ORDER: AtomicU64 = AtomicU64::new(0);

/// One acceptable shape for a field's values, as declared.
///
/// Compiled into an [`Accept`](crate::constraint::Accept) when the owning
/// type is declared.
#[derive(Clone, Debug, PartialEq)]
pub enum Member {
    /// Accept exactly this value.
    Literal(Value),
    /// Accept any value of this primitive kind.
    Primitive(Primitive),
    /// Accept nodes of this type or any type descending from it.
    Node(NodeTypeId),
    /// Accept text matching this pattern from the start.
    Pattern(Arc<str>),
}

/// Shorthand for a text member.
#[must_use]
pub fn text() -> Member {
    Member::Primitive(Primitive::Str)
}

/// Shorthand for an integer member.
#[must_use]
pub fn int() -> Member {
    Member::Primitive(Primitive::Int)
}

/// Shorthand for a float member.
#[must_use]
pub fn float() -> Member {
    Member::Primitive(Primitive::Float)
}

/// Shorthand for a boolean member.
#[must_use]
pub fn boolean() -> Member {
    Member::Primitive(Primitive::Bool)
}

/// A member accepting exactly the given value.
#[must_use]
pub fn lit(value: impl Into<Value>) -> Member {
    Member::Literal(value.into())
}

/// A member accepting text the pattern matches from the start.
#[must_use]
pub fn pattern(source: impl Into<Arc<str>>) -> Member {
    Member::Pattern(source.into())
}

/// The declared member list of a field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Members(Vec<Member>);

impl Members {
    /// Returns the declared members.
    #[must_use]
    pub fn as_slice(&self) -> &[Member] {
        &self.0
    }

    /// Returns an iterator over the declared members.
    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.0.iter()
    }

    /// Returns the number of declared members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no members were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Member> for Members {
    fn from(member: Member) -> Self {
        Self(vec![member])
    }
}

impl From<NodeTypeId> for Member {
    fn from(id: NodeTypeId) -> Self {
        Self::Node(id)
    }
}

impl From<NodeTypeId> for Members {
    fn from(id: NodeTypeId) -> Self {
        Self(vec![Member::Node(id)])
    }
}

impl From<Vec<Member>> for Members {
    fn from(members: Vec<Member>) -> Self {
        Self(members)
    }
}

impl<const N: usize> From<[Member; N]> for Members {
    fn from(members: [Member; N]) -> Self {
        Self(members.into())
    }
}

/// How many values a field holds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one value.
    Single,
    /// An ordered sequence of values.
    Seq,
    /// A string-keyed mapping of values.
    Map,
}

/// A declared field, before compilation into a schema.
#[derive(Clone, Debug)]
pub struct FieldDef {
    members: Members,
    cardinality: Cardinality,
    nullable: bool,
    default: Option<Value>,
    order: u64,
}

/// Declares a single-valued field constrained to the given members.
#[must_use]
pub fn field(members: impl Into<Members>) -> FieldDef {
    FieldDef::new(members.into(), Cardinality::Single)
}

/// Declares a sequence field whose elements are constrained to the given
/// members.
#[must_use]
pub fn seq(members: impl Into<Members>) -> FieldDef {
    FieldDef::new(members.into(), Cardinality::Seq)
}

/// Declares a mapping field whose values are constrained to the given
/// members.
#[must_use]
pub fn mapping(members: impl Into<Members>) -> FieldDef {
    FieldDef::new(members.into(), Cardinality::Map)
}

impl FieldDef {
    fn new(members: Members, cardinality: Cardinality) -> Self {
        Self {
            members,
            cardinality,
            nullable: false,
            default: None,
            order: NEXT_ORDER.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Permits null for single fields, and emptying by removal for
    /// containers.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the value used when construction supplies no argument for this
    /// field.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the declared members.
    #[must_use]
    pub fn members(&self) -> &Members {
        &self.members
    }

    /// Returns the field's cardinality.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns true if the field is nullable.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the declared default, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the field's position in the global declaration order.
    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }
}
