//! Dump collaborators for astkit node trees.
//!
//! - [`json`] - JSON serialization, one object per node
//! - [`tree`] - Indented text outlines for inspection

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod json;
pub mod tree;

pub use json::to_json;
