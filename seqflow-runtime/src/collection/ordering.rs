use seqflow_api::element::natural_order;
use seqflow_common::error::SeqFlowResult;
use seqflow_common::types::Key;
use std::cmp::Ordering;

use super::Collection;

impl<T: Clone> Collection<T> {
    /// Stable ascending sort by natural order; keys travel with their values.
    pub fn sort(&self) -> SeqFlowResult<Collection<T>>
    where
        T: PartialOrd,
    {
        self.sorted_by(|a, b| natural_order(a, b))
    }

    /// Stable descending sort: equal elements keep their original order.
    pub fn sort_desc(&self) -> SeqFlowResult<Collection<T>>
    where
        T: PartialOrd,
    {
        self.sorted_by(|a, b| natural_order(b, a))
    }

    pub fn sort_by_key<K, F>(&self, func: F) -> SeqFlowResult<Collection<T>>
    where
        K: PartialOrd,
        F: Fn(&T) -> K,
    {
        self.sorted_by(|a, b| natural_order(&func(a), &func(b)))
    }

    fn sorted_by<C>(&self, mut cmp: C) -> SeqFlowResult<Collection<T>>
    where
        C: FnMut(&T, &T) -> SeqFlowResult<Ordering>,
    {
        let entries: Vec<(Key, T)> = self
            .items
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let sorted = merge_sort(entries, &mut |a: &(Key, T), b: &(Key, T)| cmp(&a.1, &b.1))?;
        Ok(Collection::from_entries(sorted.into_iter().collect()))
    }
}

// Top-down merge sort that stops at the first failed comparison. Ties take
// from the left half, which keeps the sort stable.
fn merge_sort<E, C>(mut items: Vec<E>, cmp: &mut C) -> SeqFlowResult<Vec<E>>
where
    C: FnMut(&E, &E) -> SeqFlowResult<Ordering>,
{
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, cmp)?;
    let right = merge_sort(right, cmp)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if cmp(l, r)? == Ordering::Greater {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}
