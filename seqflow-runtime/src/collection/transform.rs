use indexmap::IndexMap;
use seqflow_api::element::FieldLookup;
use seqflow_common::error::{SeqFlowError, SeqFlowResult};
use seqflow_common::types::Key;

use super::Collection;

impl<T> Collection<T> {
    pub fn map_with_key<R, F>(&self, func: F) -> Collection<R>
    where
        F: Fn(&T, &Key) -> R,
    {
        Collection::from_entries(
            self.items
                .iter()
                .map(|(k, v)| (k.clone(), func(v, k)))
                .collect(),
        )
    }

    /// Like `map`, but the first failing element aborts the whole operation.
    pub fn try_map<R, F>(&self, func: F) -> SeqFlowResult<Collection<R>>
    where
        F: Fn(&T) -> SeqFlowResult<R>,
    {
        let items = self
            .items
            .iter()
            .map(|(k, v)| func(v).map(|r| (k.clone(), r)))
            .collect::<SeqFlowResult<IndexMap<_, _>>>()?;
        Ok(Collection::from_entries(items))
    }

    pub fn map_into<R>(&self) -> Collection<R>
    where
        T: Clone + Into<R>,
    {
        self.map_with_key(|v, _| v.clone().into())
    }

    /// Calls `func` with the inner elements of each (list-like) element.
    pub fn map_spread<U, R, F>(&self, func: F) -> Collection<R>
    where
        T: AsRef<[U]>,
        F: Fn(&[U]) -> R,
    {
        self.map_with_key(|v, _| func(v.as_ref()))
    }

    pub fn map_to_groups<K, V, F>(&self, func: F) -> Collection<Collection<V>>
    where
        K: Into<Key>,
        F: Fn(&T, &Key) -> (K, V),
    {
        let mut groups: IndexMap<Key, Collection<V>> = IndexMap::new();
        for (k, v) in &self.items {
            let (group, value) = func(v, k);
            groups.entry(group.into()).or_default().push(value);
        }
        Collection::from_entries(groups)
    }

    pub fn flat_map<R, I, F>(&self, func: F) -> Collection<R>
    where
        I: IntoIterator<Item = R>,
        F: Fn(&T, &Key) -> I,
    {
        self.items.iter().flat_map(|(k, v)| func(v, k)).collect()
    }

    pub fn collapse<U>(&self) -> Collection<U>
    where
        T: Clone + IntoIterator<Item = U>,
    {
        self.items.values().cloned().flatten().collect()
    }

    pub fn zip<U: Clone>(&self, other: &Collection<U>) -> Collection<(T, U)>
    where
        T: Clone,
    {
        self.items
            .values()
            .zip(other.items.values())
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect()
    }

    /// Appends the values of `other` with fresh integer keys.
    pub fn concat(&self, other: &Collection<T>) -> Collection<T>
    where
        T: Clone,
    {
        let mut out = self.clone();
        out.extend(other.items.values().cloned());
        out
    }

    /// Uses this collection's elements as keys for `values`.
    pub fn combine<U: Clone>(&self, values: &Collection<U>) -> SeqFlowResult<Collection<U>>
    where
        T: Clone + Into<Key>,
    {
        if self.len() != values.len() {
            return Err(SeqFlowError::InvalidArgument(format!(
                "combine needs equal lengths, got {} keys and {} values",
                self.len(),
                values.len()
            )));
        }
        Ok(Collection::from_pairs(
            self.items
                .values()
                .cloned()
                .zip(values.items.values().cloned()),
        ))
    }

    pub fn partition<F>(&self, func: F) -> (Collection<T>, Collection<T>)
    where
        T: Clone,
        F: Fn(&T, &Key) -> bool,
    {
        let (matched, rest): (IndexMap<_, _>, IndexMap<_, _>) = self
            .items
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .partition(|(k, v)| func(v, k));
        (Collection::from_entries(matched), Collection::from_entries(rest))
    }

    pub fn group_by<K, F>(&self, func: F) -> Collection<Collection<T>>
    where
        T: Clone,
        K: Into<Key>,
        F: Fn(&T, &Key) -> K,
    {
        self.map_to_groups(|v, k| (func(v, k), v.clone()))
    }

    /// Groups structured elements by a named field; elements without the
    /// field land in the `""` group.
    pub fn group_by_field(&self, name: &str) -> Collection<Collection<T>>
    where
        T: Clone + FieldLookup,
    {
        self.group_by(|v, _| v.field_key(name).unwrap_or_else(|| Key::Name(String::new())))
    }

    /// Consecutive chunks of `size` elements; chunks keep the original keys.
    pub fn chunk(&self, size: usize) -> SeqFlowResult<Collection<Collection<T>>>
    where
        T: Clone,
    {
        if size == 0 {
            return Err(SeqFlowError::InvalidArgument(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        let entries: Vec<(Key, T)> = self
            .items
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(entries
            .chunks(size)
            .map(|c| Collection::from_entries(c.iter().cloned().collect()))
            .collect())
    }

    /// `offset` past the end yields an empty collection.
    pub fn slice(&self, offset: usize, length: Option<usize>) -> Collection<T>
    where
        T: Clone,
    {
        Collection::from_entries(
            self.items
                .iter()
                .skip(offset)
                .take(length.unwrap_or(usize::MAX))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
