use alloc::vec::Vec;
use core::fmt;

use triomphe::Arc;

use crate::traversal::{
    BidirectionalCursor, ContiguousSequence, ForwardCursor, InputCursor, RandomAccessCursor,
    Sequence, SizedSequence,
};

/// A sequence owning its items behind a reference-counted slice.
///
/// Cloning the view or its cursors only bumps a reference count. Cursors
/// yield clones of the items.
///
/// # Examples
///
/// ```
/// use anyview::{AnyView, markers::*, sequences::SharedView};
///
/// let names = SharedView::from(vec![String::from("ada"), String::from("grace")]);
/// let view: AnyView<String, Caps<RandomAccess, ExactSize>> = AnyView::new(names);
/// assert_eq!(view.begin().at(1), "grace");
/// ```
pub struct SharedView<T> {
    /// The items
    items: Arc<[T]>,
}

impl<T> SharedView<T> {
    /// Creates a view sharing `items`.
    #[inline]
    #[must_use]
    pub fn new(items: Arc<[T]>) -> Self {
        Self { items }
    }
}

impl<T> From<Vec<T>> for SharedView<T> {
    #[inline]
    fn from(items: Vec<T>) -> Self {
        Self::new(Arc::from(items))
    }
}

impl<T> FromIterator<T> for SharedView<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T> Clone for SharedView<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedView").field(&&*self.items).finish()
    }
}

impl<T: Clone> Sequence for SharedView<T> {
    type Cursor = SharedCursor<T>;
    type End = SharedCursor<T>;

    #[inline]
    fn begin(&self) -> SharedCursor<T> {
        SharedCursor {
            items: Arc::clone(&self.items),
            index: 0,
        }
    }

    #[inline]
    fn end(&self) -> SharedCursor<T> {
        SharedCursor {
            items: Arc::clone(&self.items),
            index: self.items.len(),
        }
    }
}

impl<T: Clone> SizedSequence for SharedView<T> {
    #[inline]
    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> ContiguousSequence for SharedView<T> {
    type Elem = T;

    #[inline]
    fn as_slice(&self) -> &[T] {
        &self.items
    }
}

/// A cursor into a [`SharedView`], yielding clones of its items.
///
/// Cursors into different views are never equal, even if the items are.
pub struct SharedCursor<T> {
    /// The items traversed
    items: Arc<[T]>,
    /// Position within `items`, `items.len()` at the end
    index: usize,
}

impl<T> Clone for SharedCursor<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            index: self.index,
        }
    }
}

impl<T> PartialEq for SharedCursor<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items) && self.index == other.index
    }
}

impl<T> fmt::Debug for SharedCursor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCursor")
            .field("index", &self.index)
            .field("len", &self.items.len())
            .finish()
    }
}

impl<T: Clone> InputCursor for SharedCursor<T> {
    type Item = T;

    /// # Panics
    ///
    /// Panics if the cursor is at the end of its view.
    #[inline]
    #[track_caller]
    fn get(&self) -> T {
        self.items[self.index].clone()
    }

    #[inline]
    fn advance(&mut self) {
        self.index += 1;
    }
}

impl<T: Clone> ForwardCursor for SharedCursor<T> {}

impl<T: Clone> BidirectionalCursor for SharedCursor<T> {
    #[inline]
    fn step_back(&mut self) {
        self.index -= 1;
    }
}

impl<T: Clone> RandomAccessCursor for SharedCursor<T> {
    #[inline]
    fn jump(&mut self, offset: isize) {
        self.index = self.index.wrapping_add_signed(offset);
    }

    #[inline]
    fn offset_from(&self, origin: &Self) -> isize {
        self.index.wrapping_sub(origin.index) as isize
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::traversal;

    #[test]
    fn test_shared_view_traversal() {
        let view = SharedView::from(vec![1, 2, 3]);
        assert_eq!(traversal::iter(&view).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(view.len(), 3);
        assert_eq!(view.as_slice(), [1, 2, 3]);
    }

    #[test]
    fn test_shared_cursor_identity() {
        let first: SharedView<u8> = [1, 2].into_iter().collect();
        let second = first.clone();
        let other: SharedView<u8> = [1, 2].into_iter().collect();

        assert!(first.begin() == second.begin());
        assert!(first.begin() != other.begin());
        assert_eq!(first.end().offset_from(&first.begin()), 2);
    }
}
