//! Persistent collections with structural sharing.
//!
//! Thin wrappers around the `im` crate's persistent data structures,
//! providing astkit-specific semantics and future-proofing the API.
//! Cloning is O(1), which is what makes copying container defaults into
//! every new node cheap.

use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;

/// Persistent vector with structural sharing.
///
/// Modifications return a new vector sharing structure with the original.
#[derive(Clone, Default)]
pub struct AstVec<T>(im::Vector<T>)
where
    T: Clone;

impl<T: Clone> AstVec<T> {
    /// Creates an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self(im::Vector::new())
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the vector is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets an element by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    /// Returns the first element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.0.front()
    }

    /// Returns the last element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.0.back()
    }

    /// Returns a new vector with the element appended.
    #[must_use]
    pub fn push_back(&self, value: T) -> Self {
        let mut new = self.0.clone();
        new.push_back(value);
        Self(new)
    }

    /// Returns a new vector with the element at `index` replaced.
    ///
    /// Returns `None` if `index` is out of bounds.
    #[must_use]
    pub fn update(&self, index: usize, value: T) -> Option<Self> {
        if index >= self.len() {
            return None;
        }
        let mut new = self.0.clone();
        new.set(index, value);
        Some(Self(new))
    }

    /// Returns a new vector with the element inserted at `index`, shifting
    /// later elements right.
    ///
    /// Returns `None` if `index` is greater than the length.
    #[must_use]
    pub fn insert_at(&self, index: usize, value: T) -> Option<Self> {
        if index > self.len() {
            return None;
        }
        let mut new = self.0.clone();
        new.insert(index, value);
        Some(Self(new))
    }

    /// Returns a new vector with the element at `index` removed, along with
    /// the removed element.
    ///
    /// Returns `None` if `index` is out of bounds.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Option<(Self, T)> {
        if index >= self.len() {
            return None;
        }
        let mut new = self.0.clone();
        let value = new.remove(index);
        Some((Self(new), value))
    }

    /// Returns a new vector with the last element removed.
    ///
    /// Returns `None` if the vector is empty.
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let mut new = self.0.clone();
        let value = new.pop_back()?;
        Some((Self(new), value))
    }

    /// Splits into the elements before `index` and the elements from `index`
    /// on. An `index` past the end yields an empty right half.
    #[must_use]
    pub fn split_at(&self, index: usize) -> (Self, Self) {
        let index = index.min(self.len());
        let mut left = self.0.clone();
        let right = left.split_off(index);
        (Self(left), Self(right))
    }

    /// Returns a new vector holding this vector's elements followed by
    /// `other`'s.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut new = self.0.clone();
        new.append(other.0.clone());
        Self(new)
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for AstVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone + PartialEq> PartialEq for AstVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Clone + Eq> Eq for AstVec<T> {}

impl<T: Clone> FromIterator<T> for AstVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(im::Vector::from_iter(iter))
    }
}

impl<T: Clone> IntoIterator for AstVec<T> {
    type Item = T;
    type IntoIter = im::vector::ConsumingIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T: Clone> IntoIterator for &'a AstVec<T> {
    type Item = &'a T;
    type IntoIter = im::vector::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Persistent ordered map with structural sharing.
///
/// Backed by `im::OrdMap` rather than a hash map so that iteration order is
/// deterministic, which rendering and dumps rely on.
#[derive(Clone, Default)]
pub struct AstMap<K, V>(im::OrdMap<K, V>)
where
    K: Clone + Ord,
    V: Clone;

impl<K: Clone + Ord, V: Clone> AstMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(im::OrdMap::new())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets a value by key.
    #[must_use]
    pub fn get<BK>(&self, key: &BK) -> Option<&V>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.0.get(key)
    }

    /// Returns true if the map contains the key.
    #[must_use]
    pub fn contains_key<BK>(&self, key: &BK) -> bool
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        self.0.contains_key(key)
    }

    /// Returns a new map with the key-value pair inserted, replacing any
    /// previous entry for the key.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut new = self.0.clone();
        new.insert(key, value);
        Self(new)
    }

    /// Returns a new map with the key removed, along with the removed value.
    ///
    /// Returns `None` if the key is absent.
    #[must_use]
    pub fn remove<BK>(&self, key: &BK) -> Option<(Self, V)>
    where
        BK: Ord + ?Sized,
        K: Borrow<BK>,
    {
        let mut new = self.0.clone();
        let value = new.remove(key)?;
        Some((Self(new), value))
    }

    /// Returns an iterator over key-value pairs, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter()
    }

    /// Returns an iterator over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.keys()
    }

    /// Returns an iterator over values, ordered by key.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.values()
    }
}

impl<K: Clone + Ord + fmt::Debug, V: Clone + fmt::Debug> fmt::Debug for AstMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Clone + Ord, V: Clone + PartialEq> PartialEq for AstMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K: Clone + Ord, V: Clone + Eq> Eq for AstMap<K, V> {}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for AstMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(im::OrdMap::from_iter(iter))
    }
}

impl<K: Clone + Ord, V: Clone> IntoIterator for AstMap<K, V> {
    type Item = (K, V);
    type IntoIter = im::ordmap::ConsumingIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, K: Clone + Ord, V: Clone> IntoIterator for &'a AstMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = im::ordmap::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
