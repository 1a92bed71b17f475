//! A string-keyed mapping container that enforces a constraint on every
//! insert.

use std::fmt;
use std::sync::Arc;

use astkit_foundation::{AstMap, Error, Result};

use crate::constraint::Constraint;
use crate::value::Value;

/// A mapping whose values all satisfy one constraint.
///
/// Keys are text and iterate in sorted order. Every insert validates the
/// value first; a non-nullable map refuses any removal that would empty it.
#[derive(Clone)]
pub struct TypedMap {
    constraint: Arc<Constraint>,
    nullable: bool,
    entries: AstMap<Arc<str>, Value>,
}

impl TypedMap {
    /// Builds a map from initial entries, validating each value.
    ///
    /// # Errors
    ///
    /// Fails if the map would start empty while non-nullable, or if any
    /// value violates the constraint. No partially-filled map is ever
    /// produced.
    pub fn new<K, V, I>(constraint: Arc<Constraint>, entries: I, nullable: bool) -> Result<Self>
    where
        K: Into<Arc<str>>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: AstMap<Arc<str>, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if entries.is_empty() && !nullable {
            return Err(Error::must_not_be_empty());
        }
        let map = Self {
            constraint,
            nullable,
            entries,
        };
        for (_, value) in map.entries.iter() {
            map.check(value)?;
        }
        Ok(map)
    }

    /// Builds a map without validating, for fast-mode assignment.
    pub(crate) fn from_parts(
        constraint: Arc<Constraint>,
        entries: AstMap<Arc<str>, Value>,
        nullable: bool,
    ) -> Self {
        Self {
            constraint,
            nullable,
            entries,
        }
    }

    /// Returns the constraint shared by all values.
    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Returns true if removals may empty this map.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns true if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns an iterator over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Returns an iterator over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(AsRef::as_ref)
    }

    /// Returns an iterator over values, in key order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// Returns the backing persistent map.
    #[must_use]
    pub fn entries(&self) -> &AstMap<Arc<str>, Value> {
        &self.entries
    }

    /// Inserts or replaces an entry, returning the previous value if the
    /// key was present.
    ///
    /// # Errors
    ///
    /// Fails if the value violates the constraint; the map is unchanged.
    pub fn insert(
        &mut self,
        key: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let value = value.into();
        self.check(&value)?;
        let key = key.into();
        let previous = self.entries.get(key.as_ref()).cloned();
        self.entries = self.entries.insert(key, value);
        Ok(previous)
    }

    /// Removes and returns the value for `key`.
    ///
    /// # Errors
    ///
    /// Fails if the removal would empty a non-nullable map (checked before
    /// the key lookup), or if the key is absent.
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        if !self.nullable && self.entries.len() == 1 {
            return Err(Error::must_not_be_empty());
        }
        let (entries, value) = self
            .entries
            .remove(key)
            .ok_or_else(|| Error::missing_key(key))?;
        self.entries = entries;
        Ok(value)
    }

    fn check(&self, value: &Value) -> Result<()> {
        if self.constraint.matches(value) {
            Ok(())
        } else {
            Err(Error::unacceptable(
                self.constraint.to_string(),
                format!("{value:?}"),
            ))
        }
    }
}

impl PartialEq for TypedMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for TypedMap {}

impl fmt::Debug for TypedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
