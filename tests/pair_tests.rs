use pullseq::sequence::*;
use std::cell::Cell;
use std::rc::Rc;

// ================================
// zip_with
// ================================

#[test]
fn test_zip_stops_at_shorter_side() {
    let pairs = from_vec(vec![1, 2, 3]).zip(from_vec(vec!["a", "b"])).collect_vec();
    assert_eq!(pairs, vec![(1, "a"), (2, "b")]);

    let pairs = from_vec(vec![1]).zip(from_vec(vec!["a", "b"])).collect_vec();
    assert_eq!(pairs, vec![(1, "a")]);
}

#[test]
fn test_zip_longest_pads_with_none() {
    let pairs = from_vec(vec![1, 2, 3]).zip_longest(from_vec(vec!['x'])).collect_vec();
    assert_eq!(pairs, vec![(Some(1), Some('x')), (Some(2), None), (Some(3), None)]);

    let pairs = from_vec(vec![1]).zip_longest(from_vec(vec!['x', 'y'])).collect_vec();
    assert_eq!(pairs, vec![(Some(1), Some('x')), (None, Some('y'))]);
}

#[test]
fn test_zip_with_policy_and_combiner() {
    let sums = from_iter(1..=4)
        .zip_with(from_iter(10..=11), PairingPolicy::AllowUnpaired, |a, b| {
            a.unwrap_or(0) + b.unwrap_or(0)
        })
        .collect_vec();
    assert_eq!(sums, vec![11, 13, 3, 4]);

    let products = from_iter(1..=4)
        .zip_with(from_iter(10..=11), PairingPolicy::RequireBoth, |a, b| {
            a.unwrap_or(0) * b.unwrap_or(0)
        })
        .collect_vec();
    assert_eq!(products, vec![10, 22]);
}

#[test]
fn test_zip_choose_takes_present_side() {
    let chosen = from_vec(vec![1, 2]).zip_choose(from_vec(vec![10, 20, 30, 40])).collect_vec();
    assert_eq!(chosen, vec![1, 2, 30, 40]);
}

#[test]
fn test_zip_empty_sides() {
    assert!(empty::<i32>().zip(from_vec(vec![1])).collect_vec().is_empty());
    assert!(empty::<i32>().zip_longest(empty::<i32>()).collect_vec().is_empty());
}

#[test]
fn test_zip_require_both_leaves_right_untouched_after_left_ends() {
    let mut right = from_vec(vec![1, 2, 3]);
    let pairs = from_vec(vec![9]).zip(&mut right).collect_vec();
    assert_eq!(pairs, vec![(9, 1)]);
    assert_eq!(right.collect_vec(), vec![2, 3]);
}

#[test]
fn test_zip_never_pulls_an_exhausted_side_again() {
    let pulls = Rc::new(Cell::new(0));
    let counter = pulls.clone();
    let left = from_fn(move || {
        counter.set(counter.get() + 1);
        if counter.get() <= 1 { Some(1) } else { None }
    });
    let pairs = left.zip_longest(from_iter(0..5)).collect_vec();
    assert_eq!(pairs.len(), 5);
    // one value, then a single end-of-sequence answer
    assert_eq!(pulls.get(), 2);
}

#[test]
fn test_zip_combiner_runs_once_per_pair() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let mut zipped = from_iter(1..=3).zip_with(from_iter(1..=3), PairingPolicy::RequireBoth, move |a, b| {
        counter.set(counter.get() + 1);
        a.unwrap_or(0) + b.unwrap_or(0)
    });
    assert!(zipped.has_next());
    assert!(zipped.has_next());
    assert_eq!(calls.get(), 0);
    assert_eq!(zipped.collect_vec(), vec![2, 4, 6]);
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_zip_end_is_latched() {
    let mut zipped = from_vec(vec![1]).zip(from_vec(vec![2]));
    assert_eq!(zipped.pull_next(), PullResult::Value((1, 2)));
    assert!(zipped.pull_next().is_end());
    assert!(zipped.pull_next().is_end());
}

// ================================
// merge
// ================================

#[test]
fn test_merge_alternates_one_at_a_time() {
    let merged = from_vec(vec![1, 3, 5]).merge(from_vec(vec![2, 4, 6])).collect_vec();
    assert_eq!(merged, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_merge_continues_with_longer_side() {
    let merged = from_vec(vec![1, 2, 3, 4]).merge(from_vec(vec![10])).collect_vec();
    assert_eq!(merged, vec![1, 10, 2, 3, 4]);

    let merged = from_vec(vec![1]).merge(from_vec(vec![10, 20, 30])).collect_vec();
    assert_eq!(merged, vec![1, 10, 20, 30]);
}

#[test]
fn test_merge_with_empty_sides() {
    let merged = empty::<i32>().merge(from_vec(vec![1, 2])).collect_vec();
    assert_eq!(merged, vec![1, 2]);
    assert!(empty::<i32>().merge(empty::<i32>()).collect_vec().is_empty());
}

#[test]
fn test_merge_require_both_stops_at_first_end() {
    let merged = from_vec(vec![1, 2, 3])
        .merge_with_policy(from_vec(vec![10]), PairingPolicy::RequireBoth)
        .collect_vec();
    assert_eq!(merged, vec![1, 10, 2]);
}

#[test]
fn test_merge_of_generated_sequences() {
    let mut n = 0;
    let evens = from_fn(move || {
        n += 2;
        if n <= 6 { Some(n) } else { None }
    });
    let merged = from_iter(vec![1, 3]).merge(evens).collect_vec();
    assert_eq!(merged, vec![1, 2, 3, 4, 6]);
}
