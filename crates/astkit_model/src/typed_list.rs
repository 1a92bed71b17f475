//! A sequence container that enforces a constraint on every mutation.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use astkit_foundation::{AstVec, Error, Result};

use crate::constraint::Constraint;
use crate::value::Value;

/// An ordered sequence whose elements all satisfy one constraint.
///
/// Every mutation validates before applying; a failed mutation returns an
/// error and leaves the list exactly as it was. A non-nullable list refuses
/// any removal that would empty it.
#[derive(Clone)]
pub struct TypedList {
    constraint: Arc<Constraint>,
    nullable: bool,
    items: AstVec<Value>,
}

impl TypedList {
    /// Builds a list from initial elements, validating each one.
    ///
    /// # Errors
    ///
    /// Fails if the list would start empty while non-nullable, or if any
    /// element violates the constraint. No partially-filled list is ever
    /// produced.
    pub fn new(
        constraint: Arc<Constraint>,
        items: impl IntoIterator<Item = Value>,
        nullable: bool,
    ) -> Result<Self> {
        let items: AstVec<Value> = items.into_iter().collect();
        if items.is_empty() && !nullable {
            return Err(Error::must_not_be_empty());
        }
        let list = Self {
            constraint,
            nullable,
            items,
        };
        for item in list.items.iter() {
            list.check(item)?;
        }
        Ok(list)
    }

    /// Builds a list without validating, for fast-mode assignment.
    pub(crate) fn from_parts(
        constraint: Arc<Constraint>,
        items: AstVec<Value>,
        nullable: bool,
    ) -> Self {
        Self {
            constraint,
            nullable,
            items,
        }
    }

    /// Returns the constraint shared by all elements.
    #[must_use]
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Returns true if removals may empty this list.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Gets an element by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns the first element.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    /// Returns the last element.
    #[must_use]
    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    /// Returns the backing persistent vector.
    #[must_use]
    pub fn items(&self) -> &AstVec<Value> {
        &self.items
    }

    /// Appends an element.
    ///
    /// # Errors
    ///
    /// Fails if the element violates the constraint.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check(&value)?;
        self.items = self.items.push_back(value);
        Ok(())
    }

    /// Inserts an element, shifting later elements right. An index past the
    /// end is clamped to the length, so the element is appended.
    ///
    /// # Errors
    ///
    /// Fails if the element violates the constraint.
    pub fn insert(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check(&value)?;
        let index = index.min(self.items.len());
        self.items = self
            .items
            .insert_at(index, value)
            .ok_or_else(|| Error::index_out_of_bounds(index, self.items.len()))?;
        Ok(())
    }

    /// Appends every element of `values`.
    ///
    /// # Errors
    ///
    /// Fails if any element violates the constraint; in that case nothing is
    /// appended.
    pub fn extend<T: Into<Value>>(&mut self, values: impl IntoIterator<Item = T>) -> Result<()> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        for value in &values {
            self.check(value)?;
        }
        let mut items = self.items.clone();
        for value in values {
            items = items.push_back(value);
        }
        self.items = items;
        Ok(())
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    ///
    /// Fails if the element violates the constraint or the index is out of
    /// bounds.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check(&value)?;
        self.items = self
            .items
            .update(index, value)
            .ok_or_else(|| Error::index_out_of_bounds(index, self.items.len()))?;
        Ok(())
    }

    /// Replaces the elements in `range` with `values`, clamping the range to
    /// the list. Replacement elements are validated; the non-empty rule does
    /// not apply, so a splice may leave a non-nullable list empty.
    ///
    /// # Errors
    ///
    /// Fails if any replacement element violates the constraint; in that
    /// case the list is unchanged.
    pub fn splice<T: Into<Value>>(
        &mut self,
        range: Range<usize>,
        values: impl IntoIterator<Item = T>,
    ) -> Result<()> {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        for value in &values {
            self.check(value)?;
        }
        let start = range.start.min(self.items.len());
        let end = range.end.clamp(start, self.items.len());
        let (left, rest) = self.items.split_at(start);
        let (_, right) = rest.split_at(end - start);
        let mut joined = left;
        for value in values {
            joined = joined.push_back(value);
        }
        self.items = joined.concat(&right);
        Ok(())
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// Fails if the removal would empty a non-nullable list, or if the list
    /// is already empty.
    pub fn pop(&mut self) -> Result<Value> {
        self.guard_removal()?;
        let (items, value) = self
            .items
            .pop_back()
            .ok_or_else(|| Error::index_out_of_bounds(0, 0))?;
        self.items = items;
        Ok(value)
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Fails if the removal would empty a non-nullable list (checked before
    /// bounds), or if the index is out of bounds.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        self.guard_removal()?;
        let (items, value) = self
            .items
            .remove_at(index)
            .ok_or_else(|| Error::index_out_of_bounds(index, self.items.len()))?;
        self.items = items;
        Ok(value)
    }

    /// Removes the elements in `range`, clamping the range to the list.
    ///
    /// # Errors
    ///
    /// Fails if the clamped range covers the whole of a non-nullable list.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<()> {
        let start = range.start.min(self.items.len());
        let end = range.end.clamp(start, self.items.len());
        let width = end - start;
        if !self.nullable && width >= self.items.len() {
            return Err(Error::must_not_be_empty());
        }
        if width == 0 {
            return Ok(());
        }
        let (left, rest) = self.items.split_at(start);
        let (_, right) = rest.split_at(width);
        self.items = left.concat(&right);
        Ok(())
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

    fn guard_removal(&self) -> Result<()> {
        if !self.nullable && self.items.len() == 1 {
            return Err(Error::must_not_be_empty());
        }
        Ok(())
    }
}

impl PartialEq for TypedList {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for TypedList {}

impl fmt::Debug for TypedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a TypedList {
    type Item = &'a Value;
    type IntoIter = <&'a AstVec<Value> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        (&self.items).into_iter()
    }
}
