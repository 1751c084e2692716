use seqflow_common::error::SeqFlowResult;
use seqflow_common::types::Key;

/// User functions stored in a lazy chain must be shareable across clones of
/// the chain.
pub trait Function: Send + Sync + 'static {}

impl<F> Function for F where F: Send + Sync + 'static {}

/// Element transform applied by `map`; the element's key is carried over.
pub trait MapFunction<T, R>: Function {
    fn map(&self, value: T) -> R;
}

impl<T, R, F> MapFunction<T, R> for F
where
    F: Fn(T) -> R + Function,
{
    fn map(&self, value: T) -> R {
        (self)(value)
    }
}

/// Element transform that can reject an element; the first error aborts the
/// operation.
pub trait TryMapFunction<T, R>: Function {
    fn try_map(&self, value: T) -> SeqFlowResult<R>;
}

impl<T, R, F> TryMapFunction<T, R> for F
where
    F: Fn(T) -> SeqFlowResult<R> + Function,
{
    fn try_map(&self, value: T) -> SeqFlowResult<R> {
        (self)(value)
    }
}

/// Keyed predicate: receives the element and the key it is stored under.
pub trait FilterFunction<T>: Function {
    fn filter(&self, value: &T, key: &Key) -> bool;
}

impl<T, F> FilterFunction<T> for F
where
    F: Fn(&T, &Key) -> bool + Function,
{
    fn filter(&self, value: &T, key: &Key) -> bool {
        (self)(value, key)
    }
}

/// Element-only predicate used by the `*_while` / `*_until` family.
pub trait Predicate<T>: Function {
    fn test(&self, value: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Function,
{
    fn test(&self, value: &T) -> bool {
        (self)(value)
    }
}
