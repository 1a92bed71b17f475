//! Integration tests for Layer 0: Foundation
//!
//! Tests for the error taxonomy and the persistent collections.

mod collections;
