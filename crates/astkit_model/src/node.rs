//! Schema-validated AST nodes.
//!
//! A [`Node`] holds one slot per schema field plus a map of extra
//! attributes. Construction always validates against the schema; what the
//! node's [`Mode`](crate::schema::Mode) controls is whether later field
//! assignments are revalidated.

use std::fmt;
use std::sync::Arc;

use astkit_foundation::{AstMap, Error, Result};

use crate::schema::{Mode, NodeType};
use crate::typed_list::TypedList;
use crate::typed_map::TypedMap;
use crate::value::Value;

/// The stored form of one schema field.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldSlot {
    /// A single value, or `Null` for an unset nullable field.
    Value(Value),
    /// A sequence field.
    List(TypedList),
    /// A mapping field.
    Map(TypedMap),
}

impl FieldSlot {
    /// Returns the single value, if this is a value slot.
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the list, if this is a sequence slot.
    #[must_use]
    pub fn as_list(&self) -> Option<&TypedList> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the map, if this is a mapping slot.
    #[must_use]
    pub fn as_map(&self) -> Option<&TypedMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => v.fmt(f),
            Self::List(l) => l.fmt(f),
            Self::Map(m) => m.fmt(f),
        }
    }
}

/// Constructor arguments for [`Node::new`].
///
/// Keyword arguments claim their fields first; positional arguments then
/// fill the remaining fields in declaration order. Arguments that match no
/// schema field are ignored.
#[derive(Clone, Debug, Default)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Vec<(Arc<str>, Value)>,
}

impl Args {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn pos(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Appends a keyword argument. A keyword given twice keeps the last
    /// value.
    #[must_use]
    pub fn kw(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.keywords.push((name.into(), value.into()));
        self
    }
}

fn take_keyword(keywords: &mut Vec<(Arc<str>, Value)>, name: &str) -> Option<Value> {
    let i = keywords.iter().rposition(|(k, _)| k.as_ref() == name)?;
    Some(keywords.swap_remove(i).1)
}

/// An instance of a declared node type.
#[derive(Clone)]
pub struct Node {
    node_type: Arc<NodeType>,
    mode: Mode,
    slots: Vec<FieldSlot>,
    extras: AstMap<Arc<str>, Value>,
}

impl Node {
    /// Constructs a node, validating every field against the schema.
    ///
    /// Fields not covered by an argument take their declared default, or
    /// `Null` when there is none. Defaults are copied into the node, never
    /// shared between instances.
    ///
    /// # Errors
    ///
    /// Fails if the type is abstract or any field candidate violates its
    /// constraint. Both checks apply in both modes.
    pub fn new(node_type: &Arc<NodeType>, args: Args) -> Result<Self> {
        if node_type.is_abstract() {
            return Err(Error::abstract_type(node_type.name()));
        }
        let Args {
            positional,
            mut keywords,
        } = args;
        let mut positional = positional.into_iter();

        let mut slots = Vec::with_capacity(node_type.schema().len());
        for field in node_type.schema().fields() {
            let candidate = take_keyword(&mut keywords, field.name())
                .or_else(|| positional.next())
                .unwrap_or_else(|| field.initial());
            let slot = field
                .init(candidate)
                .map_err(|e| e.with_type(node_type.name()))?;
            slots.push(slot);
        }
        Ok(Self {
            node_type: Arc::clone(node_type),
            mode: node_type.mode(),
            slots,
            extras: AstMap::new(),
        })
    }

    /// Returns the node's type.
    #[must_use]
    pub fn node_type(&self) -> &Arc<NodeType> {
        &self.node_type
    }

    /// Returns the node's type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.node_type.name()
    }

    /// Returns the node's validation mode, copied from its type.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the slot for a schema field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldSlot> {
        let i = self.node_type.schema().position(name)?;
        Some(&self.slots[i])
    }

    /// Returns a single-valued schema field.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name)?.as_value()
    }

    /// Returns a sequence schema field.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&TypedList> {
        self.get(name)?.as_list()
    }

    /// Returns a sequence schema field for mutation. The list itself
    /// validates every change, in both modes.
    #[must_use]
    pub fn list_mut(&mut self, name: &str) -> Option<&mut TypedList> {
        let i = self.node_type.schema().position(name)?;
        match &mut self.slots[i] {
            FieldSlot::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns a mapping schema field.
    #[must_use]
    pub fn map(&self, name: &str) -> Option<&TypedMap> {
        self.get(name)?.as_map()
    }

    /// Returns a mapping schema field for mutation. The map itself
    /// validates every change, in both modes.
    #[must_use]
    pub fn map_mut(&mut self, name: &str) -> Option<&mut TypedMap> {
        let i = self.node_type.schema().position(name)?;
        match &mut self.slots[i] {
            FieldSlot::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns a single-valued schema field holding a child node.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.value(name)?.as_node()
    }

    /// Returns an extra attribute set outside the schema.
    #[must_use]
    pub fn extra(&self, name: &str) -> Option<&Value> {
        self.extras.get(name)
    }

    /// Iterates the schema fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSlot)> {
        self.node_type.schema().names().zip(self.slots.iter())
    }

    /// Assigns a field.
    ///
    /// Schema fields are validated in [`Mode::Debug`] and stored unchecked
    /// in [`Mode::Fast`]; either way a well-shaped container candidate is
    /// wrapped so both modes store valid input identically. Names outside
    /// the schema become extra attributes.
    ///
    /// # Errors
    ///
    /// Fails in debug mode when the candidate violates the field's
    /// constraint; the node is left unchanged.
    pub fn set(&mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        let value = value.into();
        if let Some(i) = self.node_type.schema().position(&name) {
            let ty = Arc::clone(&self.node_type);
            let field = &ty.schema().fields()[i];
            let slot = match self.mode {
                Mode::Debug => field.init(value).map_err(|e| e.with_type(ty.name()))?,
                Mode::Fast => field.slot_unchecked(value),
            };
            self.slots[i] = slot;
        } else {
            self.extras = self.extras.insert(name, value);
        }
        Ok(())
    }

    /// Removes an extra attribute, returning its value if it was present.
    ///
    /// # Errors
    ///
    /// Fails with an integrity error when `name` is a schema field; those
    /// can never be removed, in either mode.
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>> {
        if self.node_type.has_field(name) {
            return Err(Error::integrity(name).with_type(self.node_type.name()));
        }
        match self.extras.remove(name) {
            Some((rest, value)) => {
                self.extras = rest;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Renders the node through its type's template.
    #[must_use]
    pub fn render(&self) -> String {
        crate::template::render(self)
    }
}

/// Nodes compare structurally: two nodes are equal when they carry the same
/// field names with equal values, regardless of their concrete types.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node_type, &other.node_type) {
            return self.slots == other.slots && self.extras == other.extras;
        }
        self.node_type.schema().len() == other.node_type.schema().len()
            && self
                .fields()
                .all(|(name, slot)| other.get(name).is_some_and(|o| o == slot))
            && self.extras == other.extras
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name());
        for (name, slot) in self.fields() {
            s.field(name, slot);
        }
        if !self.extras.is_empty() {
            s.field("extras", &self.extras);
        }
        s.finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
