use indexmap::IndexMap;
use seqflow_common::error::{SeqFlowError, SeqFlowResult};
use seqflow_common::types::Key;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use crate::collection::Collection;

/// One pull from a lazy chain: a keyed element or the error that aborts the run.
pub type Pull<T> = SeqFlowResult<(Key, T)>;

/// Resumable cursor over a single production run.
pub type Cursor<T> = Box<dyn Iterator<Item = Pull<T>>>;

/// Starts a fresh production run. Each terminal operation calls it once.
pub(crate) type Source<T> = Arc<dyn Fn(Meter) -> Cursor<T> + Send + Sync>;

pub(crate) const PULLS_METRIC: &str = "seqflow_lazy_pulls_total";

/// Raw pull accounting for one terminal operation.
#[derive(Debug, Clone)]
pub(crate) struct Meter {
    pulled: Rc<Cell<usize>>,
    limit: Option<usize>,
}

impl Meter {
    pub(crate) fn new(limit: Option<usize>) -> Self {
        Self {
            pulled: Rc::new(Cell::new(0)),
            limit,
        }
    }

    pub(crate) fn pulled(&self) -> usize {
        self.pulled.get()
    }
}

/// Wraps the producer's iterator: counts raw pulls and enforces the pull limit.
pub(crate) struct Metered<I> {
    inner: I,
    meter: Meter,
    halted: bool,
}

impl<I> Metered<I> {
    pub(crate) fn new(inner: I, meter: Meter) -> Self {
        Self {
            inner,
            meter,
            halted: false,
        }
    }
}

impl<T, I> Iterator for Metered<I>
where
    I: Iterator<Item = Pull<T>>,
{
    type Item = Pull<T>;

    fn next(&mut self) -> Option<Pull<T>> {
        if self.halted {
            return None;
        }
        // an exhausted producer ends the run even at the limit
        let item = self.inner.next()?;
        if let Some(limit) = self.meter.limit {
            if self.meter.pulled() >= limit {
                self.halted = true;
                return Some(Err(SeqFlowError::PullLimitExceeded { limit }));
            }
        }
        self.meter.pulled.set(self.meter.pulled() + 1);
        metrics::counter!(PULLS_METRIC).increment(1);
        Some(item)
    }
}

/// Drops the first `n` accepted elements; errors are never swallowed.
pub(crate) fn skip_accepted<T: 'static>(cursor: Cursor<T>, n: usize) -> Cursor<T> {
    let mut remaining = n;
    Box::new(cursor.filter(move |pull| {
        if pull.is_err() || remaining == 0 {
            return true;
        }
        remaining -= 1;
        false
    }))
}

pub(crate) fn reindex<T: 'static>(cursor: Cursor<T>) -> Cursor<T> {
    Box::new(
        cursor
            .enumerate()
            .map(|(i, pull)| pull.map(|(_, v)| (Key::Index(i), v))),
    )
}

/// Groups consecutive elements into collections of `size`, keeping their keys.
pub(crate) struct Chunks<T> {
    inner: Cursor<T>,
    size: usize,
    emitted: usize,
}

impl<T> Chunks<T> {
    pub(crate) fn new(inner: Cursor<T>, size: usize) -> Self {
        Self {
            inner,
            size,
            emitted: 0,
        }
    }
}

impl<T> Iterator for Chunks<T> {
    type Item = Pull<Collection<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = IndexMap::with_capacity(self.size);
        while chunk.len() < self.size {
            match self.inner.next() {
                Some(Ok((k, v))) => {
                    chunk.insert(k, v);
                }
                Some(Err(e)) => return Some(Err(e)),
                None => break,
            }
        }
        if chunk.is_empty() {
            return None;
        }
        let key = Key::Index(self.emitted);
        self.emitted += 1;
        Some(Ok((key, Collection::from_entries(chunk))))
    }
}
