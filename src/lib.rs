//! Astkit - Declarative, schema-validated AST nodes
//!
//! This crate re-exports all layers of the astkit system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: astkit_dump       - JSON and text dumps of node trees
//! Layer 1: astkit_model      - Constraints, schemas, nodes, templates
//! Layer 0: astkit_foundation - Errors and persistent collections
//! ```

pub use astkit_dump as dump;
pub use astkit_foundation as foundation;
pub use astkit_model as model;
