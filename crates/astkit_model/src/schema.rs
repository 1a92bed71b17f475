//! Node type declarations, schema composition, and the type registry.
//!
//! A [`NodeDecl`] is compiled by [`Registry::declare`] into an immutable
//! [`NodeType`]: parent schemas are merged in declaration order with later
//! parents (and then local fields) winning name collisions, constraints are
//! compiled, and the merged fields are sorted by their descriptors' global
//! declaration order.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use astkit_foundation::{AstMap, AstVec, Error, Result};

use crate::constraint::{Accept, Constraint, Pattern};
use crate::descriptor::{Cardinality, FieldDef, Member};
use crate::node::{Args, FieldSlot, Node};
use crate::template::{SeqTemplate, Template};
use crate::typed_list::TypedList;
use crate::typed_map::TypedMap;
use crate::value::Value;

/// Identifies a node type within its registry.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeTypeId(pub(crate) u32);

impl NodeTypeId {
    /// Returns the id as a registry index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeTypeId({})", self.0)
    }
}

/// Validation mode for nodes of a type.
///
/// Both modes validate construction and container mutations; they differ
/// only in whether field assignment revalidates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Revalidate every field assignment.
    #[default]
    Debug,
    /// Skip assignment validation.
    Fast,
}

/// A compiled schema field.
#[derive(Clone, Debug)]
pub struct SchemaField {
    name: Arc<str>,
    constraint: Arc<Constraint>,
    cardinality: Cardinality,
    nullable: bool,
    default: Option<Value>,
    order: u64,
}

impl SchemaField {
    /// Returns the field's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field's compiled constraint.
    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
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

    /// Returns the field's normalized default. Container fields without a
    /// declared default get an empty container here.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the field's position in the global declaration order.
    #[must_use]
    pub fn order(&self) -> u64 {
        self.order
    }

    /// The candidate used when construction supplies no argument.
    pub(crate) fn initial(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }

    /// Validates a candidate and produces the slot to store.
    pub(crate) fn init(&self, candidate: Value) -> Result<FieldSlot> {
        match self.cardinality {
            Cardinality::Single => {
                if candidate.is_null() {
                    if self.nullable {
                        Ok(FieldSlot::Value(Value::Null))
                    } else {
                        Err(Error::must_not_be_empty().with_field(self.name.to_string()))
                    }
                } else if self.constraint.matches(&candidate) {
                    Ok(FieldSlot::Value(candidate))
                } else {
                    Err(
                        Error::unacceptable(self.constraint.to_string(), format!("{candidate:?}"))
                            .with_field(self.name.to_string()),
                    )
                }
            }
            Cardinality::Seq => match candidate {
                Value::Null => TypedList::new(self.constraint.clone(), [], self.nullable)
                    .map(FieldSlot::List)
                    .map_err(|e| e.with_field(self.name.to_string())),
                Value::List(items) => TypedList::new(self.constraint.clone(), items, self.nullable)
                    .map(FieldSlot::List)
                    .map_err(|e| e.with_field(self.name.to_string())),
                other => {
                    Err(Error::not_a_sequence(format!("{other:?}"))
                        .with_field(self.name.to_string()))
                }
            },
            Cardinality::Map => match candidate {
                Value::Null => TypedMap::new(
                    self.constraint.clone(),
                    std::iter::empty::<(Arc<str>, Value)>(),
                    self.nullable,
                )
                .map(FieldSlot::Map)
                .map_err(|e| e.with_field(self.name.to_string())),
                Value::Map(entries) => {
                    TypedMap::new(self.constraint.clone(), entries, self.nullable)
                        .map(FieldSlot::Map)
                        .map_err(|e| e.with_field(self.name.to_string()))
                }
                other => {
                    Err(Error::not_a_mapping(format!("{other:?}"))
                        .with_field(self.name.to_string()))
                }
            },
        }
    }

    /// Produces the slot for a fast-mode assignment: no validation, but
    /// well-shaped container candidates are still wrapped so both modes
    /// store valid input identically.
    pub(crate) fn slot_unchecked(&self, candidate: Value) -> FieldSlot {
        match self.cardinality {
            Cardinality::Single => FieldSlot::Value(candidate),
            Cardinality::Seq => match candidate {
                Value::List(items) => {
                    FieldSlot::List(TypedList::from_parts(self.constraint.clone(), items, self.nullable))
                }
                Value::Null => FieldSlot::List(TypedList::from_parts(
                    self.constraint.clone(),
                    AstVec::new(),
                    self.nullable,
                )),
                other => FieldSlot::Value(other),
            },
            Cardinality::Map => match candidate {
                Value::Map(entries) => FieldSlot::Map(TypedMap::from_parts(
                    self.constraint.clone(),
                    entries,
                    self.nullable,
                )),
                Value::Null => FieldSlot::Map(TypedMap::from_parts(
                    self.constraint.clone(),
                    AstMap::new(),
                    self.nullable,
                )),
                other => FieldSlot::Value(other),
            },
        }
    }
}

/// The ordered, merged field list of a node type.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<SchemaField>,
    index: HashMap<Arc<str>, usize>,
}

impl Schema {
    fn from_fields(fields: Vec<SchemaField>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self { fields, index }
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.position(name).map(|i| &self.fields[i])
    }

    /// Returns true if the schema declares the field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(SchemaField::name)
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// An immutable, fully-compiled node type.
pub struct NodeType {
    id: NodeTypeId,
    name: Arc<str>,
    abstract_: bool,
    mode: Mode,
    ancestors: Vec<NodeTypeId>,
    schema: Schema,
    template: Option<Template>,
    seq_templates: HashMap<Arc<str>, SeqTemplate>,
}

impl NodeType {
    /// Returns the type's id.
    #[must_use]
    pub fn id(&self) -> NodeTypeId {
        self.id
    }

    /// Returns the type's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the type cannot be constructed.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.abstract_
    }

    /// Returns the validation mode for nodes of this type.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the merged schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns true if this type is `ancestor` or descends from it.
    #[must_use]
    pub fn is(&self, ancestor: NodeTypeId) -> bool {
        self.id == ancestor || self.ancestors.contains(&ancestor)
    }

    /// Returns true if the merged schema declares the field.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.schema.contains(name)
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.schema.names()
    }

    /// Returns the rendering template, if one was declared.
    #[must_use]
    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Returns the sequence sub-template for a field, if one was declared.
    #[must_use]
    pub fn seq_template(&self, field: &str) -> Option<&SeqTemplate> {
        self.seq_templates.get(field)
    }
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("name", &self.name)
            .field("abstract", &self.abstract_)
            .field("fields", &self.schema.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Builder for a node type declaration.
#[derive(Clone, Debug)]
pub struct NodeDecl {
    name: Arc<str>,
    parents: Vec<NodeTypeId>,
    fields: Vec<(Arc<str>, FieldDef)>,
    abstract_: bool,
    mode: Option<Mode>,
    template: Option<Template>,
    seq_templates: Vec<(Arc<str>, SeqTemplate)>,
}

impl NodeDecl {
    /// Starts a declaration for the named type.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            fields: Vec::new(),
            abstract_: false,
            mode: None,
            template: None,
            seq_templates: Vec::new(),
        }
    }

    /// Adds a parent type. Parents contribute their full schemas in the
    /// order they are added; later parents win name collisions.
    #[must_use]
    pub fn with_parent(mut self, parent: NodeTypeId) -> Self {
        self.parents.push(parent);
        self
    }

    /// Adds a field declaration. Local fields win collisions with inherited
    /// ones.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<Arc<str>>, def: FieldDef) -> Self {
        self.fields.push((name.into(), def));
        self
    }

    /// Marks the type abstract. Abstract types cannot be constructed and
    /// the flag is never inherited.
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.abstract_ = true;
        self
    }

    /// Sets the validation mode. When not set, the mode of the first parent
    /// is used, defaulting to [`Mode::Debug`].
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Sets a literal rendering template with `%(name)s` placeholders.
    #[must_use]
    pub fn with_template(mut self, text: impl Into<Arc<str>>) -> Self {
        self.template = Some(Template::Text(text.into()));
        self
    }

    /// Sets a template function, re-evaluated on every render.
    #[must_use]
    pub fn with_template_fn(mut self, func: fn(&Node) -> String) -> Self {
        self.template = Some(Template::Dynamic(func));
        self
    }

    /// Declares per-position prefixes for rendering a sequence field.
    #[must_use]
    pub fn with_seq_template(mut self, field: impl Into<Arc<str>>, template: SeqTemplate) -> Self {
        self.seq_templates.push((field.into(), template));
        self
    }
}

/// Registry of declared node types.
#[derive(Debug, Default)]
pub struct Registry {
    types: Vec<Arc<NodeType>>,
    names: HashMap<Arc<str>, NodeTypeId>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types have been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Looks up a type by id.
    #[must_use]
    pub fn get(&self, id: NodeTypeId) -> Option<&Arc<NodeType>> {
        self.types.get(id.index())
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<NodeType>> {
        self.names.get(name).and_then(|id| self.get(*id))
    }

    /// Returns an iterator over all declared types.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<NodeType>> {
        self.types.iter()
    }

    /// Compiles and stores a declaration.
    ///
    /// # Errors
    ///
    /// Returns a declaration error if the name is taken, a parent or
    /// constraint target is unknown, a local field is declared twice, a
    /// pattern fails to compile, a member list is empty, or a sequence
    /// sub-template names a non-sequence field. A failed declaration leaves
    /// the registry unchanged.
    pub fn declare(&mut self, decl: NodeDecl) -> Result<NodeTypeId> {
        let type_name = decl.name.clone();
        self.declare_inner(decl)
            .map_err(|e| e.with_type(type_name.to_string()))
    }

    /// Constructs a node of the identified type.
    ///
    /// # Errors
    ///
    /// Fails if the id is unknown, the type is abstract, or any constructor
    /// argument violates the schema.
    pub fn build(&self, id: NodeTypeId, args: Args) -> Result<Node> {
        let node_type = self
            .get(id)
            .ok_or_else(|| Error::unknown_type(format!("{id:?}")))?;
        Node::new(node_type, args)
    }

    fn declare_inner(&mut self, decl: NodeDecl) -> Result<NodeTypeId> {
        if self.names.contains_key(&decl.name) {
            return Err(Error::declaration(format!(
                "duplicate type name {}",
                decl.name
            )));
        }
        for parent in &decl.parents {
            if self.get(*parent).is_none() {
                return Err(Error::declaration(format!("unknown parent {parent:?}")));
            }
        }

        let mut local_names: HashSet<&str> = HashSet::new();
        for (name, _) in &decl.fields {
            if !local_names.insert(name.as_ref()) {
                return Err(Error::declaration(format!("field {name} declared twice")));
            }
        }

        // Transitive ancestors, each listed once.
        let mut ancestors: Vec<NodeTypeId> = Vec::new();
        for parent in &decl.parents {
            for ancestor in &self.types[parent.index()].ancestors {
                if !ancestors.contains(ancestor) {
                    ancestors.push(*ancestor);
                }
            }
            if !ancestors.contains(parent) {
                ancestors.push(*parent);
            }
        }

        // Merge: parents in order, later wins, then local fields.
        let mut merged: Vec<SchemaField> = Vec::new();
        let mut positions: HashMap<Arc<str>, usize> = HashMap::new();
        let mut upsert = |merged: &mut Vec<SchemaField>, field: SchemaField| {
            if let Some(&i) = positions.get(&field.name) {
                merged[i] = field;
            } else {
                positions.insert(field.name.clone(), merged.len());
                merged.push(field);
            }
        };
        for parent in &decl.parents {
            for field in self.types[parent.index()].schema.fields() {
                upsert(&mut merged, field.clone());
            }
        }
        for (name, def) in &decl.fields {
            let field = self.compile_field(name.clone(), def)?;
            upsert(&mut merged, field);
        }
        merged.sort_by_key(SchemaField::order);
        let schema = Schema::from_fields(merged);

        let mut seq_templates = HashMap::new();
        for (field, template) in decl.seq_templates {
            match schema.field(&field) {
                Some(f) if f.cardinality() == Cardinality::Seq => {
                    seq_templates.insert(field, template);
                }
                Some(_) => {
                    return Err(Error::declaration(format!(
                        "sequence template on non-sequence field {field}"
                    )));
                }
                None => {
                    return Err(Error::declaration(format!(
                        "sequence template on unknown field {field}"
                    )));
                }
            }
        }

        let mode = decl
            .mode
            .or_else(|| {
                decl.parents
                    .first()
                    .map(|p| self.types[p.index()].mode())
            })
            .unwrap_or_default();

        let id = NodeTypeId(
            u32::try_from(self.types.len())
                .map_err(|_| Error::declaration("type registry full"))?,
        );
        let node_type = NodeType {
            id,
            name: decl.name.clone(),
            abstract_: decl.abstract_,
            mode,
            ancestors,
            schema,
            template: decl.template,
            seq_templates,
        };
        self.types.push(Arc::new(node_type));
        self.names.insert(decl.name, id);
        Ok(id)
    }

    fn compile_field(&self, name: Arc<str>, def: &FieldDef) -> Result<SchemaField> {
        let mut accepts = Vec::with_capacity(def.members().len());
        for member in def.members().iter() {
            let accept = match member {
                Member::Literal(v) => Accept::Literal(v.clone()),
                Member::Primitive(p) => Accept::Primitive(*p),
                Member::Node(id) => {
                    let target = self.get(*id).ok_or_else(|| {
                        Error::declaration(format!("unknown node type {id:?} in constraint"))
                            .with_field(name.to_string())
                    })?;
                    Accept::Node {
                        id: *id,
                        name: target.name.clone(),
                    }
                }
                Member::Pattern(source) => Accept::Pattern(
                    Pattern::new(source.clone()).map_err(|e| e.with_field(name.to_string()))?,
                ),
            };
            accepts.push(accept);
        }
        let constraint =
            Constraint::new(accepts).map_err(|e| e.with_field(name.to_string()))?;

        let default = match (def.cardinality(), def.default_value()) {
            (Cardinality::Seq, None) => Some(Value::List(AstVec::new())),
            (Cardinality::Map, None) => Some(Value::Map(AstMap::new())),
            (_, d) => d.cloned(),
        };

        Ok(SchemaField {
            name,
            constraint: Arc::new(constraint),
            cardinality: def.cardinality(),
            nullable: def.is_nullable(),
            default,
            order: def.order(),
        })
    }
}
