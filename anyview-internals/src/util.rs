//! Internal utility types.

use core::{any::TypeId, marker::PhantomData};

/// Marker type used when type-erasing stored values.
///
/// This zero-sized type serves as a placeholder pointee when the actual
/// concrete type has been erased. For example, a `NonNull<Erased>` points at a
/// value whose concrete type is only known to the vtable that accompanies it.
pub(crate) struct Erased;

/// Panics because an operation was requested on a singular value.
#[cold]
#[track_caller]
pub(crate) fn singular(kind: &'static str, operation: &'static str) -> ! {
    panic!("called `{operation}` on a singular {kind}")
}

/// Returns the [`TypeId`] of `T` with every lifetime in `T` erased.
///
/// Types that differ only in their lifetimes share an identifier. For a
/// `'static` type the result equals [`TypeId::of`].
pub(crate) fn erased_type_id<T: ?Sized>() -> TypeId {
    /// Object-safe access to [`TypeId::of`] that can be named for
    /// non-`'static` types.
    trait NonStaticAny {
        /// Returns the [`TypeId`] of the type this is implemented for.
        fn type_id(&self) -> TypeId
        where
            Self: 'static;
    }

    impl<T: ?Sized> NonStaticAny for PhantomData<T> {
        fn type_id(&self) -> TypeId
        where
            Self: 'static,
        {
            TypeId::of::<T>()
        }
    }

    let marker = PhantomData::<T>;
    let marker: &dyn NonStaticAny = &marker;
    // SAFETY: Only the lifetime bound of the trait object changes, so the
    // layout is the same. `TypeId::of` does not depend on lifetimes after
    // monomorphization and does not read the marker.
    let marker: &(dyn NonStaticAny + 'static) = unsafe {
        core::mem::transmute::<&dyn NonStaticAny, &(dyn NonStaticAny + 'static)>(marker)
    };
    marker.type_id()
}
