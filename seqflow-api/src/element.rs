//! Ordering, equality and coercion primitives the sequence operations build on.

use indexmap::IndexMap;
use seqflow_common::error::{SeqFlowError, SeqFlowResult};
use seqflow_common::types::{Key, Number, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Elements that can take part in `sum` / `average`.
pub trait Numeric {
    fn to_number(&self) -> Option<Number>;
}

macro_rules! numeric_int {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            fn to_number(&self) -> Option<Number> {
                Some(match i64::try_from(*self) {
                    Ok(i) => Number::Int(i),
                    Err(_) => Number::Float(*self as f64),
                })
            }
        })*
    };
}

numeric_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl Numeric for f32 {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Float(f64::from(*self)))
    }
}

impl Numeric for f64 {
    fn to_number(&self) -> Option<Number> {
        Some(Number::Float(*self))
    }
}

impl Numeric for Number {
    fn to_number(&self) -> Option<Number> {
        Some(*self)
    }
}

impl Numeric for Value {
    fn to_number(&self) -> Option<Number> {
        self.as_number()
    }
}

/// Structured elements that expose named fields, used by `group_by_field`.
pub trait FieldLookup {
    fn field_key(&self, name: &str) -> Option<Key>;
}

impl FieldLookup for Value {
    fn field_key(&self, name: &str) -> Option<Key> {
        self.field(name).map(Key::from)
    }
}

impl<V> FieldLookup for IndexMap<String, V>
where
    V: Clone + Into<Key>,
{
    fn field_key(&self, name: &str) -> Option<Key> {
        self.get(name).cloned().map(Into::into)
    }
}

impl<V> FieldLookup for HashMap<String, V>
where
    V: Clone + Into<Key>,
{
    fn field_key(&self, name: &str) -> Option<Key> {
        self.get(name).cloned().map(Into::into)
    }
}

pub fn require_number<T: Numeric>(value: &T, op: &str) -> SeqFlowResult<Number> {
    value
        .to_number()
        .ok_or_else(|| SeqFlowError::TypeMismatch(format!("{op} requires numeric elements")))
}

/// Natural order of two elements; incomparable pairs are a `TypeMismatch`.
pub fn natural_order<T: PartialOrd + ?Sized>(a: &T, b: &T) -> SeqFlowResult<Ordering> {
    a.partial_cmp(b)
        .ok_or_else(|| SeqFlowError::TypeMismatch("elements are not comparable".to_string()))
}

/// Multiset equality: same elements with the same multiplicities, any order.
pub fn canonical_eq<T: PartialEq>(left: &[&T], right: &[&T]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    left.iter().all(|l| {
        match (0..right.len()).find(|&i| !used[i] && right[i] == *l) {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
