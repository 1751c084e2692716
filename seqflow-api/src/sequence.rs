use seqflow_common::error::SeqFlowResult;
use seqflow_common::types::Key;

use crate::function::{FilterFunction, MapFunction, Predicate};

/// Transformation vocabulary shared by eager and lazy sequences.
///
/// Functions are bound on the api function traits; the matching `Fn` bound
/// lets closure arguments be inferred at the call site.
pub trait PSequence<T>: Sized {
    type Output<R: 'static>: PSequence<R>;

    fn map<R, F>(self, func: F) -> Self::Output<R>
    where
        R: 'static,
        F: MapFunction<T, R> + Fn(T) -> R;

    fn filter<F>(self, func: F) -> Self
    where
        F: FilterFunction<T> + Fn(&T, &Key) -> bool;

    fn take(self, n: usize) -> Self;

    fn skip(self, n: usize) -> Self;

    fn take_while<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool;

    fn take_until<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool,
    {
        self.take_while(move |v: &T| !predicate.test(v))
    }

    fn skip_while<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool;

    fn skip_until<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool,
    {
        self.skip_while(move |v: &T| !predicate.test(v))
    }

    /// Renumbers keys from zero.
    fn values(self) -> Self;

    fn collect(self) -> SeqFlowResult<Vec<T>>;
}
