use seqflow_api::sequence::PSequence;
use seqflow_common::error::SeqFlowError;
use seqflow_common::types::Key;
use seqflow_runtime::collection::Collection;
use seqflow_runtime::lazy::LazyCollection;
use seqflow_runtime::observability::init_tracing;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn counter() -> LazyCollection<u64> {
    LazyCollection::make(|| {
        let mut value = 0u64;
        std::iter::from_fn(move || {
            let current = value;
            value += 1;
            Some(current)
        })
    })
}

fn counted_counter(pulls: &Arc<AtomicUsize>) -> LazyCollection<u64> {
    let pulls = Arc::clone(pulls);
    LazyCollection::make(move || {
        let pulls = Arc::clone(&pulls);
        (0u64..).inspect(move |_| {
            pulls.fetch_add(1, Ordering::SeqCst);
        })
    })
}

fn evens_doubled<S: PSequence<u64>>(sequence: S) -> Vec<u64> {
    sequence
        .filter(|v, _| v % 2 == 0)
        .map(|v| v * 2)
        .take(3)
        .collect()
        .unwrap()
}

#[test]
fn test_lazy_collection_take_over_infinite_producer() {
    init_tracing();
    let result = counter().take(10).collect().unwrap();
    assert_eq!(result, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

    assert!(counter().take(0).collect().unwrap().is_empty());
}

#[test]
fn test_steps_do_not_pull() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let chain = counted_counter(&pulls)
        .map(|v| v + 1)
        .filter(|v, _| v % 3 == 0)
        .take(4);
    assert_eq!(pulls.load(Ordering::SeqCst), 0);

    assert_eq!(chain.collect().unwrap(), vec![3, 6, 9, 12]);
    assert_eq!(pulls.load(Ordering::SeqCst), 12);
}

#[test]
fn test_take_pulls_only_what_it_needs() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let first_five = counted_counter(&pulls).take(5).all().unwrap();
    assert_eq!(first_five.len(), 5);
    assert_eq!(pulls.load(Ordering::SeqCst), 5);

    pulls.store(0, Ordering::SeqCst);
    let zero = counted_counter(&pulls).take(0).all().unwrap();
    assert!(zero.is_empty());
    assert_eq!(pulls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_each_terminal_restarts_the_producer() {
    let lazy = counter().skip(2);
    assert_eq!(lazy.first().unwrap(), 2);
    assert_eq!(lazy.first().unwrap(), 2);
    assert_eq!(lazy.nth(3).unwrap(), 5);
    assert_eq!(lazy.clone().take(2).collect().unwrap(), vec![2, 3]);
}

#[test]
fn test_shared_vocabulary_matches_eager() {
    let eager: Collection<u64> = (0..20).collect();
    assert_eq!(evens_doubled(eager), vec![0, 4, 8]);
    assert_eq!(evens_doubled(counter()), vec![0, 4, 8]);
}

#[test]
fn test_lazy_take_while_and_skip_until() {
    let below_five = counter().take_while(|v| *v < 5).collect().unwrap();
    assert_eq!(below_five, vec![0, 1, 2, 3, 4]);

    let from_seven = counter().skip_until(|v| *v == 7).take(3).collect().unwrap();
    assert_eq!(from_seven, vec![7, 8, 9]);

    let until_three = counter().take_until(|v| *v == 3).collect().unwrap();
    assert_eq!(until_three, vec![0, 1, 2]);

    let skipped = counter().skip_while(|v| *v < 10).take(1).collect().unwrap();
    assert_eq!(skipped, vec![10]);
}

#[test]
fn test_filter_keeps_positional_keys() {
    let odds = counter().filter(|v, _| v % 2 == 1).take(3).all().unwrap();
    assert_eq!(odds.keys(), vec![Key::Index(1), Key::Index(3), Key::Index(5)]);

    let renumbered = counter().filter(|v, _| v % 2 == 1).values().take(3).all().unwrap();
    assert_eq!(renumbered, Collection::from_vec(vec![1, 3, 5]));
}

#[test]
fn test_collection_lazy_keeps_keys() {
    let scores = Collection::from_pairs([("Jhon", 100), ("Doe", 80), ("Setiawan", 90)]);
    let passed = scores.lazy().filter(|v, _| *v >= 90).all().unwrap();
    assert_eq!(passed, Collection::from_pairs([("Jhon", 100), ("Setiawan", 90)]));
    assert_eq!(scores.len(), 3);
}

#[test]
fn test_range() {
    assert_eq!(LazyCollection::range(1, 5).collect().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(LazyCollection::range(3, 1).collect().unwrap(), vec![3, 2, 1]);
    assert_eq!(LazyCollection::range(1, 10).count().unwrap(), 10);
}

#[test]
fn test_reduce_and_each() {
    assert_eq!(LazyCollection::range(1, 9).reduce(|a, b| a + b).unwrap(), 45);
    assert_eq!(
        LazyCollection::range(1, 3).reduce_with(String::new(), |acc, v, _| acc + &v.to_string()),
        Ok("123".to_string())
    );

    let empty = LazyCollection::make(Vec::<i64>::new);
    assert!(matches!(empty.reduce(|a, b| a + b), Err(SeqFlowError::EmptySequence(_))));

    let mut seen = Vec::new();
    let visited = counter()
        .each(|v, _| {
            seen.push(*v);
            *v < 4
        })
        .unwrap();
    assert_eq!(visited, 5);
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_first_where_and_contains() {
    assert_eq!(counter().first_where(|v, _| *v * *v > 50).unwrap(), 8);
    assert!(counter().contains_where(|v, _| *v == 1_000).unwrap());

    let finite = LazyCollection::range(1, 3);
    assert!(!finite.contains_where(|v, _| *v > 3).unwrap());
    assert!(matches!(
        finite.first_where(|v, _| *v > 3),
        Err(SeqFlowError::NotFound(_))
    ));
    assert!(matches!(finite.nth(3), Err(SeqFlowError::NotFound(_))));
}

#[test]
fn test_chunk() {
    let chunks = LazyCollection::range(1, 10).chunk(3).unwrap().all().unwrap();
    let parts: Vec<Vec<i64>> = chunks.iter().map(|(_, c)| c.all()).collect();
    assert_eq!(parts, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9], vec![10]]);

    let pairs = counter().chunk(2).unwrap().take(2).collect().unwrap();
    assert_eq!(pairs[1].all(), vec![2, 3]);
    assert_eq!(pairs[1].keys(), vec![Key::Index(2), Key::Index(3)]);

    assert!(matches!(counter().chunk(0), Err(SeqFlowError::InvalidArgument(_))));
}

#[test]
fn test_producer_error_aborts_terminal() {
    let flaky = LazyCollection::try_make(|| {
        vec![
            Ok(1),
            Ok(2),
            Err(SeqFlowError::Internal("producer failed".to_string())),
            Ok(4),
        ]
    });

    assert!(matches!(flaky.all(), Err(SeqFlowError::Internal(_))));
    assert!(matches!(flaky.count(), Err(SeqFlowError::Internal(_))));
    assert_eq!(flaky.clone().take(2).collect().unwrap(), vec![1, 2]);
    assert!(matches!(flaky.clone().skip(3).collect(), Err(SeqFlowError::Internal(_))));
    assert!(matches!(
        flaky.filter(|v, _| *v > 10).collect(),
        Err(SeqFlowError::Internal(_))
    ));
}

#[test]
fn test_try_map_failure_propagates() {
    let halves = counter().try_map(|v| {
        if v % 2 == 0 {
            Ok(v / 2)
        } else {
            Err(SeqFlowError::InvalidArgument(format!("{v} is odd")))
        }
    });
    assert_eq!(halves.first().unwrap(), 0);
    assert!(matches!(halves.take(3).all(), Err(SeqFlowError::InvalidArgument(_))));
}

#[test]
fn test_pull_limit() {
    let never = counter()
        .with_pull_limit(100)
        .filter(|v, _| *v > 1_000_000)
        .take(1);
    assert_eq!(
        never.collect().unwrap_err(),
        SeqFlowError::PullLimitExceeded { limit: 100 }
    );

    let bounded = counter().with_pull_limit(10).take(10);
    assert_eq!(bounded.pull_limit(), Some(10));
    assert_eq!(bounded.count().unwrap(), 10);
}

#[test]
fn test_pull_limit_allows_exhausting_a_finite_producer() {
    let three = LazyCollection::make(|| vec![1, 2, 3]).with_pull_limit(3);
    assert_eq!(three.all().unwrap(), Collection::from_vec(vec![1, 2, 3]));
    assert_eq!(three.count().unwrap(), 3);
    assert_eq!(three.reduce(|a, b| a + b).unwrap(), 6);

    let four = LazyCollection::make(|| vec![1, 2, 3, 4]).with_pull_limit(3);
    assert_eq!(
        four.count().unwrap_err(),
        SeqFlowError::PullLimitExceeded { limit: 3 }
    );
    assert_eq!(four.take(3).collect().unwrap(), vec![1, 2, 3]);
}
