use rand::Rng;
use seqflow_api::element::{natural_order, require_number, Numeric};
use seqflow_common::error::{SeqFlowError, SeqFlowResult};
use seqflow_common::types::{Key, Number};
use std::cmp::Ordering;
use std::fmt::Display;

use super::Collection;

impl<T> Collection<T> {
    /// Left fold seeded with the first element.
    pub fn reduce<F>(&self, func: F) -> SeqFlowResult<T>
    where
        T: Clone,
        F: Fn(T, &T) -> T,
    {
        let mut values = self.items.values();
        let first = values.next().ok_or_else(|| SeqFlowError::empty("reduce"))?;
        Ok(values.fold(first.clone(), |carry, v| func(carry, v)))
    }

    pub fn reduce_with<A, F>(&self, initial: A, func: F) -> A
    where
        F: Fn(A, &T, &Key) -> A,
    {
        self.items
            .iter()
            .fold(initial, |carry, (k, v)| func(carry, v, k))
    }

    pub fn sum(&self) -> SeqFlowResult<Number>
    where
        T: Numeric,
    {
        self.items
            .values()
            .try_fold(Number::Int(0), |acc, v| {
                require_number(v, "sum").map(|n| acc.add(n))
            })
    }

    pub fn average(&self) -> SeqFlowResult<f64>
    where
        T: Numeric,
    {
        if self.is_empty() {
            return Err(SeqFlowError::empty("average"));
        }
        Ok(self.sum()?.as_f64() / self.len() as f64)
    }

    pub fn min(&self) -> SeqFlowResult<T>
    where
        T: Clone + PartialOrd,
    {
        self.extreme("min", Ordering::Less)
    }

    pub fn max(&self) -> SeqFlowResult<T>
    where
        T: Clone + PartialOrd,
    {
        self.extreme("max", Ordering::Greater)
    }

    fn extreme(&self, op: &str, wanted: Ordering) -> SeqFlowResult<T>
    where
        T: Clone + PartialOrd,
    {
        let mut values = self.items.values();
        let mut best = values.next().ok_or_else(|| SeqFlowError::empty(op))?;
        for v in values {
            if natural_order(v, best)? == wanted {
                best = v;
            }
        }
        Ok(best.clone())
    }

    pub fn first(&self) -> SeqFlowResult<T>
    where
        T: Clone,
    {
        self.items
            .values()
            .next()
            .cloned()
            .ok_or_else(|| SeqFlowError::not_found("first"))
    }

    pub fn first_where<F>(&self, func: F) -> SeqFlowResult<T>
    where
        T: Clone,
        F: Fn(&T, &Key) -> bool,
    {
        self.items
            .iter()
            .find(|(k, v)| func(v, k))
            .map(|(_, v)| v.clone())
            .ok_or_else(|| SeqFlowError::not_found("first_where"))
    }

    pub fn last(&self) -> SeqFlowResult<T>
    where
        T: Clone,
    {
        self.items
            .values()
            .next_back()
            .cloned()
            .ok_or_else(|| SeqFlowError::not_found("last"))
    }

    pub fn last_where<F>(&self, func: F) -> SeqFlowResult<T>
    where
        T: Clone,
        F: Fn(&T, &Key) -> bool,
    {
        self.items
            .iter()
            .rev()
            .find(|(k, v)| func(v, k))
            .map(|(_, v)| v.clone())
            .ok_or_else(|| SeqFlowError::not_found("last_where"))
    }

    pub fn random(&self) -> SeqFlowResult<T>
    where
        T: Clone,
    {
        self.random_with(&mut rand::rng())
    }

    pub fn random_with<R: Rng>(&self, rng: &mut R) -> SeqFlowResult<T>
    where
        T: Clone,
    {
        if self.is_empty() {
            return Err(SeqFlowError::empty("random"));
        }
        let pos = rng.random_range(0..self.len());
        self.items
            .get_index(pos)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| SeqFlowError::Internal(format!("random position {pos} out of range")))
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.values().any(|v| v == value)
    }

    pub fn contains_where<F>(&self, func: F) -> bool
    where
        F: Fn(&T, &Key) -> bool,
    {
        self.items.iter().any(|(k, v)| func(v, k))
    }

    /// Joins string forms; `last_separator` replaces the separator before the
    /// final element only.
    pub fn join(&self, separator: &str, last_separator: Option<&str>) -> String
    where
        T: Display,
    {
        let parts: Vec<String> = self.items.values().map(|v| v.to_string()).collect();
        match (last_separator, parts.split_last()) {
            (Some(last_sep), Some((last, init))) if !init.is_empty() => {
                format!("{}{}{}", init.join(separator), last_sep, last)
            }
            _ => parts.join(separator),
        }
    }
}
