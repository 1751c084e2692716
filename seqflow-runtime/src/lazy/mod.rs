//! Deferred sequences over a resumable producer.
//!
//! A [`LazyCollection`] is a descriptor: a producer plus the chain of steps
//! recorded so far. Steps return new descriptors and never touch the producer.
//! Terminal operations start a fresh production run and pull one element at a
//! time through the whole chain, so bounded terminals such as `take(n)` stay
//! finite over infinite producers.

use indexmap::IndexMap;
use seqflow_api::function::{FilterFunction, MapFunction, Predicate, TryMapFunction};
use seqflow_api::sequence::PSequence;
use seqflow_common::error::{SeqFlowError, SeqFlowResult};
use seqflow_common::types::Key;
use std::sync::Arc;
use tracing::{debug, debug_span, warn};

use crate::collection::Collection;

pub mod cursor;

use cursor::{reindex, skip_accepted, Chunks, Cursor, Meter, Metered, Source};

pub struct LazyCollection<T> {
    source: Source<T>,
    pull_limit: Option<usize>,
}

impl<T> Clone for LazyCollection<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            pull_limit: self.pull_limit,
        }
    }
}

impl<T> std::fmt::Debug for LazyCollection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyCollection")
            .field("pull_limit", &self.pull_limit)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> LazyCollection<T> {
    /// `producer` is invoked once per terminal operation; every call must start
    /// an independent run. Elements are keyed by their position.
    pub fn make<F, I>(producer: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::try_make(move || producer().into_iter().map(Ok))
    }

    /// Like [`LazyCollection::make`] for producers that can fail mid-run.
    pub fn try_make<F, I>(producer: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = SeqFlowResult<T>>,
        I::IntoIter: 'static,
    {
        Self::from_source(Arc::new(move |meter: Meter| -> Cursor<T> {
            let run = producer()
                .into_iter()
                .enumerate()
                .map(|(i, item)| item.map(|v| (Key::Index(i), v)));
            Box::new(Metered::new(run, meter))
        }))
    }

    pub(crate) fn from_entries(entries: IndexMap<Key, T>) -> Self
    where
        T: Clone + Send + Sync,
    {
        let entries = Arc::new(entries);
        Self::from_source(Arc::new(move |meter: Meter| -> Cursor<T> {
            let snapshot: Vec<(Key, T)> = entries
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            Box::new(Metered::new(snapshot.into_iter().map(Ok), meter))
        }))
    }

    fn from_source(source: Source<T>) -> Self {
        Self {
            source,
            pull_limit: None,
        }
    }

    /// Fails any terminal operation that would pull the producer more than
    /// `limit` times.
    pub fn with_pull_limit(mut self, limit: usize) -> Self {
        self.pull_limit = Some(limit);
        self
    }

    pub fn pull_limit(&self) -> Option<usize> {
        self.pull_limit
    }

    fn then<R, S>(&self, step: S) -> LazyCollection<R>
    where
        R: 'static,
        S: Fn(Cursor<T>) -> Cursor<R> + Send + Sync + 'static,
    {
        let parent = Arc::clone(&self.source);
        LazyCollection {
            source: Arc::new(move |meter: Meter| step(parent(meter))),
            pull_limit: self.pull_limit,
        }
    }

    pub fn try_map<R, F>(&self, func: F) -> LazyCollection<R>
    where
        R: 'static,
        F: TryMapFunction<T, R> + Fn(T) -> SeqFlowResult<R>,
    {
        let func: Arc<dyn TryMapFunction<T, R>> = Arc::new(func);
        self.then(move |cursor| {
            let func = Arc::clone(&func);
            Box::new(cursor.map(move |pull| {
                pull.and_then(|(k, v)| func.try_map(v).map(|r| (k, r)))
            }))
        })
    }

    /// Groups consecutive elements into collections of `size`.
    pub fn chunk(&self, size: usize) -> SeqFlowResult<LazyCollection<Collection<T>>> {
        if size == 0 {
            return Err(SeqFlowError::InvalidArgument(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(self.then(move |cursor| Box::new(Chunks::new(cursor, size))))
    }

    /// Runs `consume` over a fresh production run, inside a span for `op`.
    fn run<A>(
        &self,
        op: &'static str,
        consume: impl FnOnce(Cursor<T>) -> SeqFlowResult<A>,
    ) -> SeqFlowResult<A> {
        let _span = debug_span!("lazy_terminal", op).entered();
        let meter = Meter::new(self.pull_limit);
        let result = consume((self.source)(meter.clone()));
        match &result {
            Err(SeqFlowError::PullLimitExceeded { limit }) => {
                warn!(limit, "lazy terminal aborted at pull limit");
            }
            Err(e) => debug!(pulled = meter.pulled(), error = %e, "lazy terminal failed"),
            Ok(_) => debug!(pulled = meter.pulled(), "lazy terminal finished"),
        }
        result
    }

    /// Materializes the chain. Does not return for an unbounded chain.
    pub fn all(&self) -> SeqFlowResult<Collection<T>> {
        self.run("all", |cursor| {
            cursor
                .collect::<SeqFlowResult<IndexMap<Key, T>>>()
                .map(Collection::from_entries)
        })
    }

    pub fn first(&self) -> SeqFlowResult<T> {
        self.run("first", |mut cursor| match cursor.next() {
            Some(pull) => pull.map(|(_, v)| v),
            None => Err(SeqFlowError::not_found("first")),
        })
    }

    pub fn first_where<F>(&self, func: F) -> SeqFlowResult<T>
    where
        F: Fn(&T, &Key) -> bool,
    {
        self.run("first_where", |cursor| {
            for pull in cursor {
                let (k, v) = pull?;
                if func(&v, &k) {
                    return Ok(v);
                }
            }
            Err(SeqFlowError::not_found("first_where"))
        })
    }

    /// Element at `position` (zero-based, after all steps).
    pub fn nth(&self, position: usize) -> SeqFlowResult<T> {
        self.run("nth", |cursor| {
            for (pos, pull) in cursor.enumerate() {
                let (_, v) = pull?;
                if pos == position {
                    return Ok(v);
                }
            }
            Err(SeqFlowError::NotFound(format!("no element at position {position}")))
        })
    }

    pub fn count(&self) -> SeqFlowResult<usize> {
        self.run("count", |mut cursor| {
            cursor.try_fold(0usize, |n, pull| pull.map(|_| n + 1))
        })
    }

    pub fn reduce<F>(&self, func: F) -> SeqFlowResult<T>
    where
        F: Fn(T, &T) -> T,
    {
        self.run("reduce", |mut cursor| {
            let (_, first) = cursor.next().ok_or_else(|| SeqFlowError::empty("reduce"))??;
            cursor.try_fold(first, |carry, pull| pull.map(|(_, v)| func(carry, &v)))
        })
    }

    pub fn reduce_with<A, F>(&self, initial: A, func: F) -> SeqFlowResult<A>
    where
        F: Fn(A, &T, &Key) -> A,
    {
        self.run("reduce_with", |mut cursor| {
            cursor.try_fold(initial, |carry, pull| pull.map(|(k, v)| func(carry, &v, &k)))
        })
    }

    pub fn contains_where<F>(&self, func: F) -> SeqFlowResult<bool>
    where
        F: Fn(&T, &Key) -> bool,
    {
        self.run("contains_where", |cursor| {
            for pull in cursor {
                let (k, v) = pull?;
                if func(&v, &k) {
                    return Ok(true);
                }
            }
            Ok(false)
        })
    }

    /// Visits elements until `func` returns `false`; returns how many were visited.
    pub fn each<F>(&self, mut func: F) -> SeqFlowResult<usize>
    where
        F: FnMut(&T, &Key) -> bool,
    {
        self.run("each", |cursor| {
            let mut visited = 0;
            for pull in cursor {
                let (k, v) = pull?;
                visited += 1;
                if !func(&v, &k) {
                    break;
                }
            }
            Ok(visited)
        })
    }
}

impl LazyCollection<i64> {
    /// Inclusive integer range, counting down when `start > end`.
    pub fn range(start: i64, end: i64) -> Self {
        Self::make(move || -> Box<dyn Iterator<Item = i64>> {
            if start <= end {
                Box::new(start..=end)
            } else {
                Box::new((end..=start).rev())
            }
        })
    }
}

impl<T: 'static> PSequence<T> for LazyCollection<T> {
    type Output<R: 'static> = LazyCollection<R>;

    fn map<R, F>(self, func: F) -> Self::Output<R>
    where
        R: 'static,
        F: MapFunction<T, R> + Fn(T) -> R,
    {
        let func: Arc<dyn MapFunction<T, R>> = Arc::new(func);
        self.then(move |cursor| {
            let func = Arc::clone(&func);
            Box::new(cursor.map(move |pull| pull.map(|(k, v)| (k, func.map(v)))))
        })
    }

    fn filter<F>(self, func: F) -> Self
    where
        F: FilterFunction<T> + Fn(&T, &Key) -> bool,
    {
        let func: Arc<dyn FilterFunction<T>> = Arc::new(func);
        self.then(move |cursor| {
            let func = Arc::clone(&func);
            Box::new(cursor.filter(move |pull| match pull {
                Ok((k, v)) => func.filter(v, k),
                Err(_) => true,
            }))
        })
    }

    fn take(self, n: usize) -> Self {
        self.then(move |cursor| Box::new(cursor.take(n)))
    }

    fn skip(self, n: usize) -> Self {
        self.then(move |cursor| skip_accepted(cursor, n))
    }

    fn take_while<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool,
    {
        let predicate: Arc<dyn Predicate<T>> = Arc::new(predicate);
        self.then(move |cursor| {
            let predicate = Arc::clone(&predicate);
            Box::new(cursor.take_while(move |pull| match pull {
                Ok((_, v)) => predicate.test(v),
                Err(_) => true,
            }))
        })
    }

    fn skip_while<P>(self, predicate: P) -> Self
    where
        P: Predicate<T> + Fn(&T) -> bool,
    {
        let predicate: Arc<dyn Predicate<T>> = Arc::new(predicate);
        self.then(move |cursor| {
            let predicate = Arc::clone(&predicate);
            Box::new(cursor.skip_while(move |pull| match pull {
                Ok((_, v)) => predicate.test(v),
                Err(_) => false,
            }))
        })
    }

    fn values(self) -> Self {
        self.then(reindex)
    }

    fn collect(self) -> SeqFlowResult<Vec<T>> {
        self.all().map(Collection::into_vec)
    }
}
