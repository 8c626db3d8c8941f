//! Integration tests for the public surface of the anyview crate.
//!
//! ## View Tests
//! - `test_forward_sized_copyable_view`: copies of a view traverse
//!   independently
//! - `test_random_access_arithmetic`: cursor arithmetic and ordering
//! - `test_views_of_different_sources_share_a_type`: heterogeneous sequences
//!   behind one view type
//! - `test_move_only_stream`: single-pass views over iterators
//! - `test_stream_of_items_without_clone`: items that can only be moved out
//! - `test_views_of_local_data`: views borrowing a vector on the stack
//!
//! ## Cursor Tests
//! - `test_singular_cursors`: default-constructed cursors and sentinels
//! - `test_cross_type_inequality`: cursors of different concrete sequences
//! - `test_checked_operations`: the `try_` variants and their errors
//!
//! ## Composition Tests
//! - `test_concat_of_erased_views`: joining two erased views and erasing the
//!   result again
//! - `test_prelude_is_enough`: everything needed is reachable from the prelude

use anyview::{
    AnyIter, AnySentinel, AnyView, TraversalError, concat,
    markers::*,
    sequences::{Iota, SharedView, SliceView, StreamView},
};

static NUMBERS: [i32; 5] = [1, 2, 3, 4, 5];

type Numbers = AnyView<'static, i64, Caps<RandomAccess, ExactSize, CommonEnd>>;

#[test]
fn test_forward_sized_copyable_view() {
    let view: AnyView<&i32, Caps<Forward, ExactSize, SentinelEnd, Copyable>> =
        AnyView::new(SliceView::new(&NUMBERS));
    assert_eq!(*view.begin().get(), 1);
    assert_eq!(view.len(), 5);

    let copy = view.clone();
    let mut cursor = copy.begin();
    cursor.advance();
    assert_eq!(*cursor.get(), 2);

    let original = view.begin();
    assert_eq!(*original.get(), 1);
    assert_eq!(view.iter().copied().collect::<Vec<_>>(), NUMBERS);
}

#[test]
fn test_random_access_arithmetic() {
    let view: AnyView<&i32, Caps<RandomAccess, ExactSize>> =
        AnyView::new(SliceView::new(&NUMBERS));
    let it = view.begin();
    let third = it.clone() + 3;

    assert_eq!(*third.get(), 4);
    assert_eq!(third.clone() - it.clone(), 3);
    assert_eq!(&it - &third, -3);
    assert!(it < third);
    assert!(third > it);
    assert!(it <= it.clone());

    let mut back = third.clone();
    back -= 2;
    assert_eq!(*back.get(), 2);
    back += 4;
    assert!(back == view.end());
}

#[test]
fn test_views_of_different_sources_share_a_type() {
    let views: Vec<Numbers> = vec![
        AnyView::new(Iota::new(0, 3)),
        AnyView::new(SharedView::from(vec![10i64, 20, 30, 40])),
        AnyView::default(),
    ];

    let lengths: Vec<usize> = views.iter().map(AnyView::len).collect();
    assert_eq!(lengths, [3, 4, 0]);

    let sums: Vec<i64> = views.iter().map(|view| view.iter().sum()).collect();
    assert_eq!(sums, [3, 100, 0]);

    assert!(views[..2].iter().all(AnyView::is_inline));
    assert!(!views[2].is_inline());
}

#[test]
fn test_move_only_stream() {
    let view: AnyView<u64, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
        AnyView::new(StreamView::new([3u32, 1, 4].into_iter()));
    assert_eq!(view.reserve_hint(), 3);

    let mut cursor = view.begin();
    assert_eq!(cursor.take_item(), 3);
    cursor.advance();
    assert_eq!(cursor.get(), 1);

    let rest: Vec<u64> = view.iter().collect();
    assert_eq!(rest, [1, 4]);
    assert!(cursor == view.end());
}

/// An item that cannot be cloned.
#[derive(Debug, PartialEq)]
struct Token(String);

#[test]
fn test_stream_of_items_without_clone() {
    let tokens = vec![Token(String::from("let")), Token(String::from("x"))];
    let view: AnyView<Token, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
        AnyView::new(StreamView::take_only(tokens.into_iter()));
    assert_eq!(view.reserve_hint(), 2);

    let mut cursor = view.begin();
    assert_eq!(cursor.take_item(), Token(String::from("let")));
    cursor.advance();
    assert!(cursor != view.end());

    let rest: Vec<Token> = view.iter().collect();
    assert_eq!(rest, [Token(String::from("x"))]);
    assert!(cursor == view.end());
}

#[test]
fn test_views_of_local_data() {
    let numbers: Vec<i64> = vec![4, 8, 15, 16, 23, 42];

    let indexed: AnyView<'_, &i64, Caps<RandomAccess, ExactSize, CommonEnd, Copyable, Borrowed>> =
        AnyView::new(SliceView::new(&numbers));
    let begin = indexed.begin();
    assert_eq!(*begin.at(5), 42);
    assert_eq!(indexed.end() - begin, 6);

    let contiguous: AnyView<'_, i64, Caps<Contiguous, ExactSize>> =
        AnyView::new(SliceView::new(&numbers));
    assert_eq!(contiguous.as_slice(), [4, 8, 15, 16, 23, 42]);

    let streamed: AnyView<'_, i64, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
        AnyView::new(StreamView::new(numbers.iter().copied()));
    assert_eq!(streamed.iter().sum::<i64>(), 108);

    let borrowed: AnyView<'_, &i64, Caps<Input, ApproxSize, SentinelEnd, MoveOnly>> =
        AnyView::new(StreamView::new(numbers.iter()));
    assert_eq!(borrowed.iter().max(), Some(&42));

    // Cursors of a borrowed view outlive the view, but not the vector
    let cursor = {
        let view: AnyView<'_, &i64, Caps<Forward, NoSize, SentinelEnd, Copyable, Borrowed>> =
            AnyView::new(SliceView::new(&numbers[2..]));
        view.begin()
    };
    assert_eq!(*cursor.get(), 15);
}

#[test]
fn test_singular_cursors() {
    let first = AnyIter::<i64, Forward>::default();
    let second = AnyIter::<i64, Forward>::default();
    assert!(first == second);
    assert!(first.is_singular());
    assert!(first == AnySentinel::<i64, Forward>::default());

    let view: AnyView<i64, Caps<Forward>> = AnyView::new(Iota::new(0, 1));
    assert!(view.begin() != first);
    assert!(view.end() != first);
    assert!(AnySentinel::<i64, Forward>::default() != view.begin());
}

#[test]
fn test_cross_type_inequality() {
    let counted: Numbers = AnyView::new(Iota::new(0, 2));
    let stored: Numbers = AnyView::new(SharedView::from(vec![0i64, 1]));

    // Same items, same erased type, different concrete sequences
    assert_eq!(counted.iter().collect::<Vec<_>>(), stored.iter().collect::<Vec<_>>());
    assert!(counted.begin() != stored.begin());
    assert!(counted.end() != stored.end());
    assert_eq!(counted.begin().partial_cmp(&stored.begin()), None);
}

#[test]
fn test_checked_operations() {
    let counted: Numbers = AnyView::new(Iota::new(0, 2));
    let stored: Numbers = AnyView::new(SharedView::from(vec![0i64, 1]));

    assert_eq!(counted.begin().try_distance_to(&counted.end()), Ok(2));
    assert_eq!(counted.begin().try_get(), Ok(0));

    let Err(TraversalError::Mismatched { left, right }) =
        counted.begin().try_distance_to(&stored.begin())
    else {
        panic!("cursors of different sequences must not be measurable");
    };
    assert!(left.contains("IotaCursor"));
    assert!(right.contains("SharedCursor"));

    let singular = AnyIter::<i64, RandomAccess, CommonEnd>::default();
    assert_eq!(singular.try_get(), Err(TraversalError::Singular));
    assert_eq!(
        singular.try_distance_to(&counted.begin()),
        Err(TraversalError::Singular)
    );
}

#[test]
#[should_panic(expected = "cannot be measured")]
fn test_measuring_different_sequences_panics() {
    let counted: Numbers = AnyView::new(Iota::new(0, 2));
    let stored: Numbers = AnyView::new(SharedView::from(vec![0i64, 1]));
    let _ = counted.begin().distance_to(&stored.begin());
}

#[test]
fn test_concat_of_erased_views() {
    let counted: Numbers = AnyView::new(Iota::new(0, 3));
    let stored: Numbers = AnyView::new(SharedView::from(vec![10i64, 20]));

    let joined: AnyView<i64, Caps<RandomAccess, ExactSize>> =
        AnyView::new(concat(counted, stored));
    assert_eq!(joined.len(), 5);
    assert_eq!(joined.iter().collect::<Vec<_>>(), [0, 1, 2, 10, 20]);

    let begin = joined.begin();
    assert_eq!(begin.at(3), 10);
    assert_eq!((begin.clone() + 4).at(-2), 2);

    let mut cursor = begin.clone() + 2;
    cursor.advance();
    assert_eq!(cursor.get(), 10);
    cursor.step_back();
    assert_eq!(cursor.get(), 2);
    assert_eq!(begin.distance_to(&cursor), 2);
}

#[test]
fn test_prelude_is_enough() {
    use anyview::prelude::*;

    fn collect<S: Sequence<Cursor: InputCursor<Item = i64>>>(sequence: &S) -> Vec<i64> {
        anyview::traversal::iter(sequence).collect()
    }

    let view: AnyView<i64, Caps<Bidirectional, ExactSize, CommonEnd>> =
        AnyView::new(Iota::new(5, 8));
    assert_eq!(collect(&view), [5, 6, 7]);
    assert_eq!(view.reserve_hint(), 3);
}
