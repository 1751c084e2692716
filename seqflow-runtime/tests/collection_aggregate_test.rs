use seqflow_common::config::{keys, Configuration};
use seqflow_common::error::SeqFlowError;
use seqflow_common::types::{Key, Number, Value};
use seqflow_runtime::collection::Collection;
use seqflow_runtime::env::Environment;

fn nine() -> Collection<i64> {
    (1..=9).collect()
}

#[test]
fn test_join() {
    let names = Collection::from_vec(vec!["Jhon", "Doe", "Setiawan"]);
    assert_eq!(names.join("-", None), "Jhon-Doe-Setiawan");
    assert_eq!(names.join("-", Some("_")), "Jhon-Doe_Setiawan");
    assert_eq!(names.join(", ", Some(" and ")), "Jhon, Doe and Setiawan");
}

#[test]
fn test_join_short_collections() {
    let single = Collection::from_vec(vec!["Jhon"]);
    assert_eq!(single.join(", ", Some(" and ")), "Jhon");

    let pair = Collection::from_vec(vec!["Jhon", "Doe"]);
    assert_eq!(pair.join(", ", Some(" and ")), "Jhon and Doe");

    let empty: Collection<&str> = Collection::new();
    assert_eq!(empty.join(", ", Some(" and ")), "");
}

#[test]
fn test_first() {
    let collection = nine();
    assert_eq!(collection.first().unwrap(), 1);
    assert_eq!(collection.first_where(|v, _| *v > 5).unwrap(), 6);

    let err = collection.first_where(|v, _| *v > 100).unwrap_err();
    assert!(matches!(err, SeqFlowError::NotFound(_)));
    assert_eq!(collection.first_where(|v, _| *v > 100).unwrap_or(0), 0);
}

#[test]
fn test_last() {
    let collection = nine();
    assert_eq!(collection.last().unwrap(), 9);
    assert_eq!(collection.last_where(|v, _| *v < 5).unwrap(), 4);

    let empty: Collection<i64> = Collection::new();
    assert!(matches!(empty.last(), Err(SeqFlowError::NotFound(_))));
}

#[test]
fn test_random_membership() {
    let collection = nine();
    for _ in 0..20 {
        let picked = collection.random().unwrap();
        assert!(collection.contains(&picked));
    }

    let empty: Collection<i64> = Collection::new();
    assert!(matches!(empty.random(), Err(SeqFlowError::EmptySequence(_))));
}

#[test]
fn test_random_with_seeded_environment() {
    let mut config = Configuration::new();
    config.put(keys::RANDOM_SEED, "7");
    let env = Environment::from_config(config).unwrap();

    let collection = nine();
    let first_run: Vec<i64> = {
        let mut rng = env.rng();
        (0..5).map(|_| collection.random_with(&mut rng).unwrap()).collect()
    };
    let second_run: Vec<i64> = {
        let mut rng = env.rng();
        (0..5).map(|_| collection.random_with(&mut rng).unwrap()).collect()
    };
    assert_eq!(first_run, second_run);
    assert!(first_run.iter().all(|v| collection.contains(v)));
}

#[test]
fn test_aggregate() {
    let collection = nine();
    assert_eq!(collection.sum().unwrap(), Number::Int(45));
    assert_eq!(collection.average().unwrap(), 5.0);
    assert_eq!(collection.min().unwrap(), 1);
    assert_eq!(collection.max().unwrap(), 9);
}

#[test]
fn test_aggregate_floats_and_values() {
    let floats = Collection::from_vec(vec![1.5, 2.5]);
    assert_eq!(floats.sum().unwrap(), Number::Float(4.0));
    assert_eq!(floats.average().unwrap(), 2.0);

    let mixed = Collection::from_vec(vec![Value::Int(1), Value::Float(2.5)]);
    assert_eq!(mixed.sum().unwrap(), Number::Float(3.5));
    assert_eq!(mixed.max().unwrap(), Value::Float(2.5));
}

#[test]
fn test_aggregate_errors() {
    let empty: Collection<i64> = Collection::new();
    assert_eq!(empty.sum().unwrap(), Number::Int(0));
    assert!(matches!(empty.average(), Err(SeqFlowError::EmptySequence(_))));
    assert!(matches!(empty.min(), Err(SeqFlowError::EmptySequence(_))));
    assert!(matches!(empty.max(), Err(SeqFlowError::EmptySequence(_))));

    let words = Collection::from_vec(vec![Value::from("a"), Value::Int(1)]);
    assert!(matches!(words.sum(), Err(SeqFlowError::TypeMismatch(_))));
    assert!(matches!(words.max(), Err(SeqFlowError::TypeMismatch(_))));
}

#[test]
fn test_sum_widens_on_overflow() {
    let big = Collection::from_vec(vec![i64::MAX, 1]);
    assert_eq!(big.sum().unwrap(), Number::Float(i64::MAX as f64 + 1.0));
}

#[test]
fn test_reduce() {
    let collection = nine();
    assert_eq!(collection.reduce(|carry, item| carry + item).unwrap(), 45);

    let empty: Collection<i64> = Collection::new();
    let err = empty.reduce(|carry, item| carry + item).unwrap_err();
    assert!(matches!(err, SeqFlowError::EmptySequence(_)));
    assert_eq!(empty.reduce_with(10i64, |carry, item, _| carry + item), 10);
}

#[test]
fn test_reduce_with_keys() {
    let scores = Collection::from_pairs([("Jhon", 100), ("Doe", 80)]);
    let summary = scores.reduce_with(String::new(), |mut acc, v, k| {
        if !acc.is_empty() {
            acc.push(';');
        }
        acc.push_str(&format!("{k}:{v}"));
        acc
    });
    assert_eq!(summary, "Jhon:100;Doe:80");
}

#[test]
fn test_ordering() {
    let collection = Collection::from_vec(vec![1, 2, 3, 5, 4, 8, 9, 6]);
    assert_eq!(collection.sort().unwrap().all(), vec![1, 2, 3, 4, 5, 6, 8, 9]);
    assert_eq!(collection.sort_desc().unwrap().all(), vec![9, 8, 6, 5, 4, 3, 2, 1]);
}

#[test]
fn test_sort_keeps_keys() {
    let scores = Collection::from_pairs([("Jhon", 100), ("Doe", 80), ("Setiawan", 90)]);
    let sorted = scores.sort().unwrap();
    assert_eq!(
        sorted.keys(),
        vec![Key::from("Doe"), Key::from("Setiawan"), Key::from("Jhon")]
    );
}

#[test]
fn test_sort_is_stable() {
    let people = Collection::from_vec(vec![(2, "a"), (1, "b"), (2, "c"), (1, "d")]);
    let ascending = people.sort_by_key(|p| p.0).unwrap();
    assert_eq!(ascending.all(), vec![(1, "b"), (1, "d"), (2, "a"), (2, "c")]);

    let grades = Collection::from_vec(vec![Value::Int(2), Value::Float(2.0), Value::Int(1)]);
    let descending = grades.sort_desc().unwrap().all();
    assert!(matches!(descending[0], Value::Int(2)));
    assert!(matches!(descending[1], Value::Float(_)));
}

#[test]
fn test_sort_rejects_incomparable() {
    let floats = Collection::from_vec(vec![1.0, f64::NAN, 0.5]);
    assert!(matches!(floats.sort(), Err(SeqFlowError::TypeMismatch(_))));

    let mixed = Collection::from_vec(vec![Value::from("b"), Value::Int(3)]);
    assert!(matches!(mixed.sort_desc(), Err(SeqFlowError::TypeMismatch(_))));
}
