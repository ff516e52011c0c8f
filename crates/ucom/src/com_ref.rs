//! Owning reference handle
//!
//! [`ComRef<I>`] owns exactly one strong reference to an object viewed through
//! interface `I`. Cloning acquires a reference, dropping releases it, and a
//! Rust move transfers it without touching the count. The empty handle is
//! `Option<ComRef<I>>::None`; `Option::take` moves out and leaves the source
//! empty.

use std::alloc::{self, Layout};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::Deref;
use std::ptr::NonNull;

use crate::types::{ComError, Result};
use crate::unknown::IUnknown;

/// Strong reference to an object through interface `I`
pub struct ComRef<I: ?Sized + IUnknown> {
    ptr: NonNull<I>,
}

// SAFETY: IUnknown requires Send + Sync and the count is atomic
unsafe impl<I: ?Sized + IUnknown> Send for ComRef<I> {}
// SAFETY: as above
unsafe impl<I: ?Sized + IUnknown> Sync for ComRef<I> {}

impl<T: IUnknown> ComRef<T> {
    /// Move `object` to the heap and take its initial reference
    pub fn new(object: T) -> Self {
        // SAFETY: Box::into_raw never returns null
        let ptr = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(object))) };
        // SAFETY: ptr owns a fresh Box<T> allocation
        unsafe { Self::adopt(ptr) }
    }

    /// Like [`ComRef::new`], reporting allocation failure instead of aborting
    pub fn try_new(object: T) -> Result<Self> {
        let layout = Layout::new::<T>();
        let ptr = if layout.size() == 0 {
            NonNull::<T>::dangling()
        } else {
            // SAFETY: layout has a non-zero size. The allocation comes from the
            // global allocator with `Layout::new::<T>()`, which is exactly what
            // the counter later frees as a `Box<T>`.
            let raw = unsafe { alloc::alloc(layout) }.cast::<T>();
            NonNull::new(raw).ok_or(ComError::OutOfMemory)?
        };
        // SAFETY: ptr is non-null, aligned for T and valid for writes
        unsafe { ptr.as_ptr().write(object) };
        // SAFETY: ptr now owns an initialized Box<T>-compatible allocation
        Ok(unsafe { Self::adopt(ptr) })
    }

    /// Attach the object's counter and wrap its first reference
    ///
    /// # Safety
    ///
    /// `ptr` must own a `Box<T>`-compatible allocation not shared with anyone.
    unsafe fn adopt(ptr: NonNull<T>) -> Self {
        // SAFETY: guaranteed by the caller
        unsafe { ptr.as_ref().ref_counter().attach(ptr) };
        Self { ptr }
    }
}

impl<I: ?Sized + IUnknown> ComRef<I> {
    /// Take ownership of a reference the caller already holds
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object and the caller must own one strong
    /// reference to it, which is transferred to the handle.
    pub unsafe fn from_raw(ptr: NonNull<I>) -> Self {
        Self { ptr }
    }

    /// Release a reference held as a raw pointer, returning the count before
    /// the decrement
    ///
    /// The object is destroyed when the released reference was the last one.
    ///
    /// # Safety
    ///
    /// `ptr` must point to a live object and the caller must own one strong
    /// reference to it, which is consumed. `ptr` must not be used afterwards.
    pub unsafe fn release_raw(ptr: NonNull<I>) -> i32 {
        // SAFETY: the caller owns the reference being released
        let prior = unsafe { ptr.as_ref().release_reference() };
        if prior != 1 {
            return prior;
        }

        // SAFETY: the count went through zero, so this thread alone still reaches the object
        let allocation = unsafe { ptr.as_ref() }.ref_counter().allocation();
        if let Some(allocation) = allocation {
            // SAFETY: last reference released and no borrow of the object is live
            unsafe { allocation.free() };
        }
        prior
    }

    /// Acquire a new reference to a borrowed view
    ///
    /// Returns `None` when no handle owns the object.
    pub fn from_borrowed(view: &I) -> Option<Self> {
        (view.add_reference() > 0).then(|| Self {
            ptr: NonNull::from(view),
        })
    }

    /// Give up the handle without releasing its reference
    pub fn into_raw(this: Self) -> NonNull<I> {
        let ptr = this.ptr;
        mem::forget(this);
        ptr
    }

    /// Raw pointer to the view, without transferring ownership
    pub fn as_ptr(this: &Self) -> NonNull<I> {
        this.ptr
    }

    /// Check if two handles refer to the same object, whatever their views
    pub fn ptr_eq<J: ?Sized + IUnknown>(this: &Self, other: &ComRef<J>) -> bool {
        this.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        self.ptr.as_ptr() as *const ()
    }
}

impl<I: ?Sized + IUnknown> Deref for ComRef<I> {
    type Target = I;

    fn deref(&self) -> &I {
        // SAFETY: the handle keeps the object alive
        unsafe { self.ptr.as_ref() }
    }
}

impl<I: ?Sized + IUnknown> Clone for ComRef<I> {
    fn clone(&self) -> Self {
        // A live handle keeps the count above zero
        self.add_reference();
        Self { ptr: self.ptr }
    }

    fn clone_from(&mut self, source: &Self) {
        if self.addr() == source.addr() {
            return;
        }
        *self = source.clone();
    }
}

impl<I: ?Sized + IUnknown> Drop for ComRef<I> {
    fn drop(&mut self) {
        // SAFETY: the handle owns one reference and is never used again
        unsafe { Self::release_raw(self.ptr) };
    }
}

impl<I: ?Sized + IUnknown> PartialEq for ComRef<I> {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl<I: ?Sized + IUnknown> Eq for ComRef<I> {}

impl<I: ?Sized + IUnknown> Hash for ComRef<I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<I: ?Sized + IUnknown> fmt::Debug for ComRef<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComRef({:p})", self.addr())
    }
}
