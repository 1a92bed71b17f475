//! Errors and persistent collections for astkit.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - Persistent collections ([`AstVec`], [`AstMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;

pub use collections::{AstMap, AstVec};
pub use error::{Error, ErrorContext, ErrorKind, Result, Violation};
