//! Schema-constrained AST node model.
//!
//! - [`Value`] - Dynamic values carried by node fields
//! - [`Constraint`] - Compiled field membership constraints
//! - [`FieldDef`] - Declarative field descriptors
//! - [`TypedList`] / [`TypedMap`] - Containers that validate every mutation
//! - [`Registry`] - Node type declaration, composition, and construction
//! - [`Template`] - Placeholder rendering for nodes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constraint;
pub mod descriptor;
pub mod node;
pub mod schema;
pub mod template;
pub mod typed_list;
pub mod typed_map;
pub mod value;

pub use constraint::{Accept, Constraint, ConstraintKind, Pattern};
pub use descriptor::{
    Cardinality, FieldDef, Member, Members, boolean, field, float, int, lit, mapping, pattern,
    seq, text,
};
pub use node::{Args, FieldSlot, Node};
pub use schema::{Mode, NodeDecl, NodeType, NodeTypeId, Registry, Schema, SchemaField};
pub use template::{SeqTemplate, Template};
pub use typed_list::TypedList;
pub use typed_map::TypedMap;
pub use value::{Primitive, Value};
