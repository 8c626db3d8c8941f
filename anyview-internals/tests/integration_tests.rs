//! Integration tests for the anyview-internals crate.
//!
//! ## Storage Tests
//! - `test_storage_drops_exactly_once`: Inline and boxed values are dropped
//!   once, including after `take` and clone
//! - `test_storage_heap_address_is_stable`: Moving a cell never relocates a
//!   boxed value, while inline values travel with the cell
//! - `test_storage_clone_panic_leaves_cells_untouched`: A panicking `Clone`
//!   leaves both the source and the destination of an assignment unchanged
//! - `test_storage_move_assignment`: Assigning a taken cell empties the source
//!
//! ## Erased Traversal Tests
//! - `test_erased_view_round_trip`: A sequence erased behind a `RawView` is
//!   traversed through erased cursors and sentinels
//! - `test_erased_random_access`: Jumps and distances through the vtable
//! - `test_erased_common_end`: Cursor-shaped end markers
//! - `test_erased_view_of_local_data`: A view borrowing a local vector hands
//!   out cursors that borrow it too

use std::{
    cell::Cell,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use anyview_internals::{
    RawCursor, RawSentinel, RawStorage, RawView,
    handlers::{BoundsHandler, CursorHandler, SentinelHandler, SizeHandler},
};

/// Counts how many times it has been dropped.
#[derive(Clone)]
struct DropCounter {
    drops: Rc<Cell<usize>>,
    #[allow(dead_code)]
    padding: [usize; 2],
}

/// Same as [`DropCounter`], but too large to be stored inline.
#[derive(Clone)]
struct BigDropCounter {
    drops: Rc<Cell<usize>>,
    #[allow(dead_code)]
    padding: [usize; 8],
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl Drop for BigDropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Panics on clone when `fail` is set.
struct Fragile {
    id: u32,
    fail: bool,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        if self.fail {
            panic!("clone of fragile value {} failed", self.id);
        }
        Self {
            id: self.id,
            fail: self.fail,
        }
    }
}

#[test]
fn test_storage_drops_exactly_once() {
    let drops = Rc::new(Cell::new(0));

    {
        let small = RawStorage::<3>::new_cloneable(DropCounter {
            drops: drops.clone(),
            padding: [0; 2],
        });
        let big = RawStorage::<3>::new_cloneable(BigDropCounter {
            drops: drops.clone(),
            padding: [0; 8],
        });
        assert!(small.is_inline());
        assert!(!big.is_inline());

        let small_copy = small.try_clone().unwrap();
        let big_copy = big.try_clone().unwrap();
        assert_eq!(drops.get(), 0);

        drop(small_copy);
        drop(big_copy);
        assert_eq!(drops.get(), 2);

        let mut small = small;
        let taken = small.take();
        assert!(small.is_empty());
        drop(small);
        assert_eq!(drops.get(), 2);
        drop(taken);
        assert_eq!(drops.get(), 3);
    }

    assert_eq!(drops.get(), 4);
}

#[test]
fn test_storage_heap_address_is_stable() {
    let big = RawStorage::<3>::new([5u64; 16]);
    let before: *const [u64; 16] = big.downcast_ref::<[u64; 16]>().unwrap();

    let moved = Box::new(big);
    let after: *const [u64; 16] = moved.downcast_ref::<[u64; 16]>().unwrap();
    assert_eq!(before, after);

    let small = RawStorage::<3>::new(5u64);
    let before: *const u64 = small.downcast_ref::<u64>().unwrap();
    let moved = Box::new(small);
    let after: *const u64 = moved.downcast_ref::<u64>().unwrap();
    assert_ne!(before, after);
    assert_eq!(moved.downcast_ref::<u64>(), Some(&5));
}

#[test]
fn test_storage_clone_panic_leaves_cells_untouched() {
    let source = RawStorage::<3>::new_cloneable(Fragile { id: 1, fail: true });
    let mut destination = RawStorage::<3>::new_cloneable(Fragile { id: 2, fail: false });

    let result = catch_unwind(AssertUnwindSafe(|| {
        destination = source.try_clone().unwrap();
    }));
    assert!(result.is_err());

    assert_eq!(destination.downcast_ref::<Fragile>().unwrap().id, 2);
    assert_eq!(source.downcast_ref::<Fragile>().unwrap().id, 1);

    // Same for a value that does not fit inline
    let source = RawStorage::<0>::new_cloneable(Fragile { id: 3, fail: true });
    let mut destination = RawStorage::<0>::new_cloneable(Fragile { id: 4, fail: false });
    assert!(!source.is_inline());

    let result = catch_unwind(AssertUnwindSafe(|| {
        destination = source.try_clone().unwrap();
    }));
    assert!(result.is_err());

    assert_eq!(destination.downcast_ref::<Fragile>().unwrap().id, 4);
    assert_eq!(source.downcast_ref::<Fragile>().unwrap().id, 3);
}

#[test]
fn test_storage_move_assignment() {
    let mut source = RawStorage::<3>::new(String::from("moved"));
    let mut destination = RawStorage::<3>::new(String::from("replaced"));
    assert_eq!(destination.downcast_ref::<String>().unwrap(), "replaced");

    destination = source.take();
    assert!(source.is_empty());
    assert_eq!(destination.downcast_ref::<String>().unwrap(), "moved");

    core::mem::swap(&mut source, &mut destination);
    assert!(destination.is_empty());
    assert_eq!(source.downcast_ref::<String>().unwrap(), "moved");
}

/// A view over the numbers `start..end`.
#[derive(Clone)]
struct Numbers {
    start: i64,
    end: i64,
}

/// Cursor into [`Numbers`].
#[derive(Clone, PartialEq)]
struct NumberCursor(i64);

/// End marker of [`Numbers`].
#[derive(Clone)]
struct NumberEnd(i64);

/// Handler supporting every operation on [`Numbers`].
struct NumberHandler;

impl CursorHandler<NumberCursor, i64> for NumberHandler {
    fn get(cursor: &NumberCursor) -> i64 {
        cursor.0
    }

    fn advance(cursor: &mut NumberCursor) {
        cursor.0 += 1;
    }

    fn equals(left: &NumberCursor, right: &NumberCursor) -> bool {
        left == right
    }

    fn step_back(cursor: &mut NumberCursor) {
        cursor.0 -= 1;
    }

    fn jump(cursor: &mut NumberCursor, offset: isize) {
        cursor.0 += offset as i64;
    }

    fn offset_from(cursor: &NumberCursor, origin: &NumberCursor) -> isize {
        (cursor.0 - origin.0) as isize
    }
}

impl SentinelHandler<NumberEnd, NumberCursor> for NumberHandler {
    fn is_end(sentinel: &NumberEnd, cursor: &NumberCursor) -> bool {
        cursor.0 >= sentinel.0
    }
}

impl BoundsHandler<Numbers, i64> for NumberHandler {
    fn begin<'a>(view: &Numbers) -> RawCursor<'a, i64>
    where
        Numbers: 'a,
    {
        RawCursor::new_cloneable::<NumberCursor, NumberHandler>(NumberCursor(view.start))
    }

    fn end_sentinel<'a>(view: &Numbers) -> RawSentinel<'a>
    where
        Numbers: 'a,
    {
        RawSentinel::new::<NumberEnd, NumberCursor, NumberHandler>(NumberEnd(view.end))
    }

    fn end_cursor<'a>(view: &Numbers) -> RawCursor<'a, i64>
    where
        Numbers: 'a,
    {
        RawCursor::new_cloneable::<NumberCursor, NumberHandler>(NumberCursor(view.end))
    }
}

impl SizeHandler<Numbers> for NumberHandler {
    fn len(view: &Numbers) -> usize {
        (view.end - view.start) as usize
    }
}

#[test]
fn test_erased_view_round_trip() {
    let view = RawView::new_cloneable::<Numbers, NumberHandler, NumberHandler>(Numbers {
        start: 1,
        end: 6,
    });
    assert!(view.is_inline());
    assert_eq!(view.len(), 5);

    let mut cursor = view.begin();
    let end = view.end_sentinel();
    let mut items = Vec::new();
    while !end.is_end(&cursor) {
        items.push(cursor.get());
        cursor.advance();
    }
    assert_eq!(items, [1, 2, 3, 4, 5]);

    // A copy of the view traverses independently
    let copy = view.try_clone().unwrap();
    let mut copy_cursor = copy.begin();
    copy_cursor.advance();
    assert_eq!(copy_cursor.get(), 2);
    assert_eq!(view.begin().get(), 1);
}

#[test]
fn test_erased_random_access() {
    let view = RawView::new::<Numbers, NumberHandler, NumberHandler>(Numbers { start: 1, end: 6 });
    let begin = view.begin();
    let mut cursor = begin.try_clone().unwrap();

    cursor.jump(3);
    assert_eq!(cursor.get(), 4);
    assert_eq!(cursor.offset_from(&begin), 3);
    assert_eq!(begin.offset_from(&cursor), -3);

    cursor.step_back();
    assert_eq!(cursor.get(), 3);
}

#[test]
fn test_erased_common_end() {
    let view = RawView::new::<Numbers, NumberHandler, NumberHandler>(Numbers { start: 0, end: 3 });
    let mut cursor = view.begin();
    let end = view.end_cursor();

    let mut steps = 0;
    while !cursor.equals(&end) {
        cursor.advance();
        steps += 1;
    }
    assert_eq!(steps, 3);
    assert_eq!(end.offset_from(&view.begin()), 3);
}

/// A view of the words in a borrowed slice.
struct Words<'w>(&'w [String]);

/// Cursor into [`Words`].
#[derive(Clone)]
struct WordCursor<'w> {
    words: &'w [String],
    index: usize,
}

/// Handler for [`Words`] yielding borrowed items.
struct WordHandler;

impl<'w> CursorHandler<WordCursor<'w>, &'w str> for WordHandler {
    fn get(cursor: &WordCursor<'w>) -> &'w str {
        &cursor.words[cursor.index]
    }

    fn advance(cursor: &mut WordCursor<'w>) {
        cursor.index += 1;
    }

    fn equals(left: &WordCursor<'w>, right: &WordCursor<'w>) -> bool {
        left.index == right.index
    }
}

impl<'w> BoundsHandler<Words<'w>, &'w str> for WordHandler {
    fn begin<'a>(view: &Words<'w>) -> RawCursor<'a, &'w str>
    where
        Words<'w>: 'a,
    {
        RawCursor::new_cloneable::<WordCursor<'w>, WordHandler>(WordCursor {
            words: view.0,
            index: 0,
        })
    }

    fn end_cursor<'a>(view: &Words<'w>) -> RawCursor<'a, &'w str>
    where
        Words<'w>: 'a,
    {
        RawCursor::new_cloneable::<WordCursor<'w>, WordHandler>(WordCursor {
            words: view.0,
            index: view.0.len(),
        })
    }
}

impl<'w> SizeHandler<Words<'w>> for WordHandler {
    fn len(view: &Words<'w>) -> usize {
        view.0.len()
    }
}

#[test]
fn test_erased_view_of_local_data() {
    let words: Vec<String> = ["erased", "but", "borrowed"].map(String::from).to_vec();
    let view = RawView::new::<Words<'_>, WordHandler, WordHandler>(Words(&words));
    assert_eq!(view.len(), 3);

    let mut cursor = view.begin();
    let end = view.end_cursor();
    let mut items = Vec::new();
    while !cursor.equals(&end) {
        items.push(cursor.get());
        cursor.advance();
    }
    drop(view);
    assert_eq!(items, ["erased", "but", "borrowed"]);
    assert!(cursor.equals(&end));
}
