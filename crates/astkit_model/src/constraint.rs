//! Compiled membership constraints for schema fields.
//!
//! A constraint is a non-empty set of members; a value satisfies the
//! constraint when at least one member accepts it. Members of different
//! kinds may be mixed freely, in which case each candidate is resolved
//! member by member.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use astkit_foundation::{Error, Result};

use crate::schema::NodeTypeId;
use crate::value::{Primitive, Value};

/// A compiled text pattern.
///
/// Matching is anchored to the start: the pattern accepts a string when its
/// leftmost match begins at offset zero. The rest of the string may be
/// anything, so `[a-z]+` accepts `"hi22"` but not `"22hi"`.
#[derive(Clone)]
pub struct Pattern {
    source: Arc<str>,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern from its source text.
    ///
    /// # Errors
    ///
    /// Returns a declaration error if the source is not a valid regular
    /// expression.
    pub fn new(source: impl Into<Arc<str>>) -> Result<Self> {
        let source = source.into();
        let regex = Regex::new(&source)
            .map_err(|e| Error::declaration(format!("invalid pattern {source:?}: {e}")))?;
        Ok(Self { source, regex })
    }

    /// Returns the pattern's source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if the pattern matches at the start of `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.regex.find(text).is_some_and(|m| m.start() == 0)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern(/{}/)", self.source)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

/// One compiled constraint member.
#[derive(Clone, Debug)]
pub enum Accept {
    /// Accepts exactly this value.
    Literal(Value),
    /// Accepts any value of this primitive kind.
    Primitive(Primitive),
    /// Accepts nodes of the named type or any type descending from it.
    Node {
        /// The target type's id.
        id: NodeTypeId,
        /// The target type's name, captured for messages.
        name: Arc<str>,
    },
    /// Accepts text the pattern matches from the start.
    Pattern(Pattern),
}

impl Accept {
    fn admits(&self, value: &Value) -> bool {
        match self {
            Self::Literal(literal) => value == literal,
            Self::Primitive(primitive) => value.primitive() == Some(*primitive),
            Self::Node { id, .. } => value.as_node().is_some_and(|n| n.node_type().is(*id)),
            Self::Pattern(pattern) => value.as_str().is_some_and(|s| pattern.matches(s)),
        }
    }

    const fn kind(&self) -> ConstraintKind {
        match self {
            Self::Literal(_) => ConstraintKind::Literal,
            Self::Primitive(_) | Self::Node { .. } => ConstraintKind::Class,
            Self::Pattern(_) => ConstraintKind::Pattern,
        }
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(v) => write!(f, "{v:?}"),
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Node { name, .. } => write!(f, "{name}"),
            Self::Pattern(p) => write!(f, "{p}"),
        }
    }
}

/// The matching discipline of a constraint, fixed when it is compiled.
///
/// Determined by the first declared member; a heterogeneous member list is
/// `Mixed`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstraintKind {
    /// All members are literal values.
    Literal,
    /// All members are primitive kinds or node types.
    Class,
    /// All members are text patterns.
    Pattern,
    /// Members of more than one kind.
    Mixed,
}

/// A compiled, immutable constraint owned by one schema field.
#[derive(Clone, Debug)]
pub struct Constraint {
    accepts: Vec<Accept>,
    kind: ConstraintKind,
}

impl Constraint {
    /// Builds a constraint from compiled members.
    ///
    /// # Errors
    ///
    /// Returns a declaration error if the member list is empty or a literal
    /// member is not a primitive value.
    pub fn new(accepts: Vec<Accept>) -> Result<Self> {
        let Some(first) = accepts.first() else {
            return Err(Error::declaration("constraint needs at least one member"));
        };
        for accept in &accepts {
            if let Accept::Literal(v) = accept {
                if v.primitive().is_none() {
                    return Err(Error::declaration(format!(
                        "literal member must be a primitive value, got {v:?}"
                    )));
                }
            }
        }
        let first_kind = first.kind();
        let kind = if accepts.iter().all(|a| a.kind() == first_kind) {
            first_kind
        } else {
            ConstraintKind::Mixed
        };
        Ok(Self { accepts, kind })
    }

    /// Returns the constraint's matching discipline.
    #[must_use]
    pub const fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Returns the compiled members.
    #[must_use]
    pub fn members(&self) -> &[Accept] {
        &self.accepts
    }

    /// Returns true if at least one member accepts the value.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        self.accepts.iter().any(|a| a.admits(value))
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, accept) in self.accepts.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{accept}")?;
        }
        Ok(())
    }
}
