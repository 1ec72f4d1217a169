use pullseq::sequence::*;
use pullseq::SequenceError;
use std::cell::Cell;
use std::rc::Rc;

/// Generator source that records how many elements were produced
fn counted(values: Vec<i32>, produced: Rc<Cell<usize>>) -> IterSequence<impl Iterator<Item = i32>> {
    from_iter(values.into_iter().inspect(move |_| produced.set(produced.get() + 1)))
}

#[test]
fn test_single_pass_then_end_forever() {
    let mut seq = from_vec(vec![10, 20, 30]);
    let mut taken = Vec::new();
    while seq.has_next() {
        taken.push(seq.next().unwrap());
    }
    assert_eq!(taken, vec![10, 20, 30]);

    for _ in 0..3 {
        assert_eq!(seq.pull_next(), PullResult::EndOfSequence);
    }
}

#[test]
fn test_has_next_is_idempotent() {
    let mut seq = from_iter(vec![1, 2]);
    assert!(seq.has_next());
    assert!(seq.has_next());
    assert!(seq.has_next());
    assert_eq!(seq.next(), Ok(1));
    assert_eq!(seq.next(), Ok(2));
    assert!(!seq.has_next());
    assert!(!seq.has_next());
}

#[test]
fn test_next_on_exhausted_sequence_fails() {
    let mut seq = from_vec(vec![1]);
    assert_eq!(seq.next(), Ok(1));
    assert_eq!(seq.next(), Err(SequenceError::NoSuchElement));

    let mut generated = from_fn(|| None::<i32>);
    assert_eq!(generated.next(), Err(SequenceError::NoSuchElement));
}

#[test]
fn test_pull_next_without_has_next() {
    let mut seq = from_iter(1..=2);
    assert_eq!(seq.pull_next(), PullResult::Value(1));
    assert_eq!(seq.pull_next(), PullResult::Value(2));
    assert_eq!(seq.pull_next(), PullResult::EndOfSequence);
}

#[test]
fn test_pull_next_batch_exact_and_partial() {
    let mut seq = from_iter(1..=5);
    let first = seq.pull_next_batch(2).into_option().unwrap();
    assert_eq!(first.to_vec(), vec![1, 2]);

    let partial = seq.pull_next_batch(10).into_option().unwrap();
    assert_eq!(partial.to_vec(), vec![3, 4, 5]);

    assert!(seq.pull_next_batch(1).is_end());
}

#[test]
fn test_pull_next_batch_zero_is_empty_value() {
    let mut seq = from_iter(1..=3);
    let batch = seq.pull_next_batch(0);
    assert!(batch.is_value());
    assert!(batch.into_option().unwrap().is_empty());
    // nothing was consumed
    assert_eq!(seq.pull_next(), PullResult::Value(1));

    let mut drained = empty::<i32>();
    assert!(drained.pull_next_batch(0).is_value());
    assert!(drained.pull_next_batch(3).is_end());
}

#[test]
fn test_map_next_batch_folds_batch() {
    let mut seq = from_vec(vec![1, 2, 3, 4, 5]);
    let sum = seq.map_next_batch(3, |batch| batch.as_slice().iter().sum::<i32>());
    assert_eq!(sum, PullResult::Value(6));
    let rest = seq.map_next_batch(3, |batch| batch.len());
    assert_eq!(rest, PullResult::Value(2));
    assert_eq!(seq.map_next_batch(3, |batch| batch.len()), PullResult::EndOfSequence);
}

#[test]
fn test_generator_is_pulled_lazily() {
    let produced = Rc::new(Cell::new(0));
    let mut seq = counted(vec![1, 2, 3, 4], produced.clone()).map(|x| x * 10);
    assert_eq!(produced.get(), 0);
    assert_eq!(seq.pull_next(), PullResult::Value(10));
    assert_eq!(produced.get(), 1);
    assert!(seq.has_next());
    assert_eq!(produced.get(), 2);
}

#[test]
fn test_filter_keeps_matching_elements() {
    let evens = from_iter(1..=10).filter(|x| x % 2 == 0).collect_vec();
    assert_eq!(evens, vec![2, 4, 6, 8, 10]);
}

#[test]
fn test_boxed_sequence_forwards_protocol() {
    let mut seq: BoxSequence<'_, i32> = from_vec(vec![1, 2, 3]).boxed();
    assert!(seq.has_next());
    assert_eq!(seq.next(), Ok(1));
    assert_eq!(seq.pull_next_batch(5).into_option().unwrap().to_vec(), vec![2, 3]);
    assert!(seq.pull_next().is_end());
}

#[test]
fn test_borrowed_sequence_resumes_after_partial_use() {
    let mut seq = from_vec(vec![1, 2, 3, 4]);
    let firsts: Vec<i32> = (&mut seq).iter().take(2).collect();
    assert_eq!(firsts, vec![1, 2]);
    assert_eq!(seq.collect_vec(), vec![3, 4]);
}

#[test]
fn test_pull_result_helpers() {
    let value: PullResult<i32> = Some(3).into();
    assert_eq!(value.map(|x| x + 1), PullResult::Value(4));
    assert_eq!(value.as_ref().into_option(), Some(&3));
    assert_eq!(value.value(), Some(&3));

    let end: PullResult<i32> = None.into();
    assert!(end.is_end());
    assert_eq!(end.value(), None);
    assert_eq!(end.into_result(), Err(SequenceError::NoSuchElement));

    let pending: PullResult<i32> = PullResult::NotYetStarted;
    assert!(pending.is_not_started());
    assert_eq!(pending.into_option(), None);
}
