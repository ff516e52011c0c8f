//! Strong reference counting
//!
//! Each object embeds one [`RefCount`]. A fresh counter is detached: it
//! belongs to a value that no [`ComRef`](crate::ComRef) owns yet, and every
//! attempt to acquire a reference through it is refused. `ComRef::new` and
//! `ComRef::try_new` move the object to the heap and attach the counter, which
//! sets the count to 1 and records how to free the allocation.
//!
//! The object is freed on the transition through zero. Exactly one releasing
//! thread observes a prior value of 1, so destruction happens once even under
//! concurrent releases.

use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::OnceLock;

/// Atomic strong reference counter
pub struct RefCount {
    count: AtomicI32,
    owner: OnceLock<Allocation>,
}

impl RefCount {
    /// Create a detached counter
    pub const fn new() -> Self {
        Self {
            count: AtomicI32::new(0),
            owner: OnceLock::new(),
        }
    }

    /// Check if a handle owns the object
    pub fn is_attached(&self) -> bool {
        self.owner.get().is_some()
    }

    /// Increment a live count, returning the resulting count
    ///
    /// Returns 0 and acquires nothing when the counter is detached.
    pub fn increment(&self) -> i32 {
        match self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count > 0).then_some(count + 1)
            }) {
            Ok(prior) => prior + 1,
            Err(_) => 0,
        }
    }

    /// Current count
    ///
    /// Only a snapshot: other threads may change it concurrently.
    pub fn get(&self) -> i32 {
        self.count.load(Ordering::Acquire)
    }

    /// Decrement, returning the count before the decrement
    ///
    /// A return value of 1 means the caller released the last reference.
    pub(crate) fn decrement(&self) -> i32 {
        self.count.fetch_sub(1, Ordering::AcqRel)
    }

    /// Hand the object to its first handle
    ///
    /// # Safety
    ///
    /// `base` must be the owning pointer of a `Box<T>` allocation holding the
    /// object this counter is embedded in, not yet shared with anyone.
    pub(crate) unsafe fn attach<T>(&self, base: NonNull<T>) {
        let allocation = Allocation {
            base: base.cast(),
            free: free_boxed::<T>,
        };
        if self.owner.set(allocation).is_ok() {
            self.count.store(1, Ordering::Release);
        }
    }

    /// Allocation recorded when the counter was attached
    pub(crate) fn allocation(&self) -> Option<Allocation> {
        self.owner.get().copied()
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RefCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefCount({})", self.get())
    }
}

/// Owning pointer of a counted object and the function that frees it
#[derive(Clone, Copy)]
pub(crate) struct Allocation {
    base: NonNull<()>,
    free: unsafe fn(NonNull<()>),
}

// SAFETY: base is only dereferenced by the single thread that releases the
// last reference, and objects are Send + Sync
unsafe impl Send for Allocation {}
// SAFETY: as above
unsafe impl Sync for Allocation {}

impl Allocation {
    /// Drop the object and free its allocation
    ///
    /// # Safety
    ///
    /// The last strong reference must have been released and no reference to
    /// the object may be live.
    pub(crate) unsafe fn free(self) {
        // SAFETY: guaranteed by the caller
        unsafe { (self.free)(self.base) }
    }
}

unsafe fn free_boxed<T>(base: NonNull<()>) {
    tracing::trace!(object = std::any::type_name::<T>(), "destroying object");
    // SAFETY: base came from a Box<T> allocation handed to `attach`
    drop(unsafe { Box::from_raw(base.cast::<T>().as_ptr()) });
}

/// Implement [`IUnknown::ref_counter`](crate::IUnknown::ref_counter) over a
/// [`RefCount`] field
///
/// Expands inside an `unsafe impl IUnknown for T` block.
#[macro_export]
macro_rules! impl_ref_count {
    ($field:ident) => {
        fn ref_counter(&self) -> &$crate::RefCount {
            &self.$field
        }
    };
}
