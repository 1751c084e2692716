use indexmap::IndexMap;
use seqflow_api::element::canonical_eq;
use seqflow_api::function::{FilterFunction, MapFunction, Predicate};
use seqflow_api::sequence::PSequence;
use seqflow_common::error::{SeqFlowError, SeqFlowResult};
use seqflow_common::types::Key;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::lazy::LazyCollection;

mod aggregate;
mod ordering;
mod transform;

/// Eager, ordered, keyed in-memory sequence.
///
/// Iteration follows insertion order. `==` compares keys and values in order;
/// [`Collection::eq_canonical`] compares values only, ignoring order.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: IndexMap<Key, T>,
}

impl<T> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    pub fn from_vec(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }

    /// Builds from explicit keys. A repeated key overwrites the earlier value
    /// but keeps its first position.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, T)>,
    {
        Self {
            items: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub(crate) fn from_entries(items: IndexMap<Key, T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<&T> {
        self.items.get(key)
    }

    pub fn keys(&self) -> Vec<Key> {
        self.items.keys().cloned().collect()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items.into_values().collect()
    }

    pub fn push(&mut self, value: T) -> &mut Self {
        let key = Key::Index(self.next_index());
        self.items.insert(key, value);
        self
    }

    pub fn put(&mut self, key: impl Into<Key>, value: T) -> &mut Self {
        self.items.insert(key.into(), value);
        self
    }

    /// Removes the most recently inserted entry.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop().map(|(_, v)| v)
    }

    pub fn eq_canonical(&self, other: &Collection<T>) -> bool
    where
        T: PartialEq,
    {
        let left: Vec<&T> = self.items.values().collect();
        let right: Vec<&T> = other.items.values().collect();
        canonical_eq(&left, &right)
    }

    pub fn to_json(&self) -> SeqFlowResult<String>
    where
        T: Serialize,
    {
        serde_json::to_string(self).map_err(|e| SeqFlowError::Serialization(format!("{e}")))
    }

    fn next_index(&self) -> usize {
        self.items
            .keys()
            .filter_map(Key::as_index)
            .max()
            .map_or(0, |max| max + 1)
    }

    fn is_list(&self) -> bool {
        self.items
            .keys()
            .enumerate()
            .all(|(pos, key)| key.as_index() == Some(pos))
    }
}

impl<T: Clone> Collection<T> {
    pub fn all(&self) -> Vec<T> {
        self.items.values().cloned().collect()
    }

    /// Lazy view over a snapshot of the current entries.
    pub fn lazy(&self) -> LazyCollection<T>
    where
        T: Send + Sync + 'static,
    {
        LazyCollection::from_entries(self.items.clone())
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().zip(other.items.iter()).all(|(a, b)| a == b)
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Key::Index(i), v))
                .collect(),
        }
    }
}

impl<T> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = (Key, T);
    type IntoIter = indexmap::map::IntoIter<Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = (&'a Key, &'a T);
    type IntoIter = indexmap::map::Iter<'a, Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_list() {
            let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
            for value in self.items.values() {
                seq.serialize_element(value)?;
            }
            seq.end()
        } else {
            let mut map = serializer.serialize_map(Some(self.items.len()))?;
            for (key, value) in &self.items {
                map.serialize_entry(&key.to_string(), value)?;
            }
            map.end()
        }
    }
}

impl<T> PSequence<T> for Collection<T> {
    type Output<R: 'static> = Collection<R>;

    fn map<R, F>(self, func: F) -> Self::Output<R>
    where
        R: 'static,
        F: MapFunction<T, R> + Fn(T) -> R,
    {
        let items = self
            .items
            .into_iter()
            .map(|(k, v)| (k, func.map(v)))
            .collect();
        Collection { items }
    }

    fn filter<F>(self, func: F) -> Self
    where
        F: FilterFunction<T> + Fn(&T, &Key) -> bool,
    {
        let items = self
            .items
            .into_iter()
            .filter(|(k, v)| func.filter(v, k))
            .collect();
        Collection { items }
    }

    fn take(self, n: usize) -> Self {
        Collection {
            items: self.items.into_iter().take(n).collect(),
        }
    }

    fn skip(self, n: usize) -> Self {
        Collection {
            items: self.items.into_iter().skip(n).collect(),
        }
    }

    fn take_while<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool,
    {
        let items = self
            .items
            .into_iter()
            .take_while(|(_, v)| predicate.test(v))
            .collect();
        Collection { items }
    }

    fn skip_while<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool,
    {
        let items = self
            .items
            .into_iter()
            .skip_while(|(_, v)| predicate.test(v))
            .collect();
        Collection { items }
    }

    fn values(self) -> Self {
        self.items.into_values().collect()
    }

    fn collect(self) -> SeqFlowResult<Vec<T>> {
        Ok(self.into_vec())
    }
}
