//! Capability-query core
//!
//! Every object in the model implements [`IUnknown`]: acquire a strong
//! reference, release a strong reference, and query for another interface by
//! identifier. Objects embed a [`RefCount`] exposed through
//! [`impl_ref_count!`](crate::impl_ref_count); queries are answered with a
//! [`QueryTable`].
//!
//! ```
//! use ucom::{declare_iid, impl_ref_count, ComRef, IUnknown, InterfaceSlot, QueryInterfaceExt,
//!            QueryTable, RefCount, ResultCode, Uuid};
//!
//! pub trait ICounter: IUnknown {
//!     fn value(&self) -> u32;
//! }
//! declare_iid!(dyn ICounter, 0x1111, 0x2222);
//!
//! struct Counter {
//!     refs: RefCount,
//!     value: u32,
//! }
//!
//! unsafe impl IUnknown for Counter {
//!     impl_ref_count!(refs);
//!
//!     fn query_interface(&self, iid: &Uuid, slot: Option<&mut InterfaceSlot>) -> ResultCode {
//!         QueryTable::new(iid, slot)
//!             .entry::<dyn IUnknown>(self)
//!             .entry::<dyn ICounter>(self)
//!             .finish()
//!     }
//! }
//!
//! impl ICounter for Counter {
//!     fn value(&self) -> u32 {
//!         self.value
//!     }
//! }
//!
//! let counter = ComRef::new(Counter { refs: RefCount::new(), value: 7 });
//! let view = counter.query::<dyn ICounter>().unwrap();
//! assert_eq!(view.value(), 7);
//! assert!(ComRef::ptr_eq(&counter, &view));
//! ```

mod ref_count;
mod slot;

pub use ref_count::*;
pub use slot::*;

use crate::com_ref::ComRef;
use crate::types::{ComError, Interface, Result, ResultCode, Uuid};

/// Base capability every object implements
///
/// Objects embed a [`RefCount`] and are owned by [`ComRef`] handles created
/// with [`ComRef::new`] or [`ComRef::try_new`]. A value no handle owns yet
/// refuses to hand out references: queries on it return
/// [`ResultCode::NotReady`].
///
/// # Safety
///
/// `ref_counter` must return the counter embedded in `self`, the same one on
/// every call, and overrides of `add_reference` / `release_reference` must
/// forward to it. [`impl_ref_count!`](crate::impl_ref_count) implements
/// `ref_counter` over a field.
pub unsafe trait IUnknown: Send + Sync + 'static {
    /// Counter embedded in this object
    fn ref_counter(&self) -> &RefCount;

    /// Acquire a strong reference, returning the resulting count
    ///
    /// Returns 0 and acquires nothing when no handle owns the object.
    fn add_reference(&self) -> i32 {
        self.ref_counter().increment()
    }

    /// Release a strong reference, returning the count before the decrement
    ///
    /// # Safety
    ///
    /// The caller must own the strong reference being released and must not
    /// use it afterwards. Releasing through `&self` never frees the object:
    /// the last reference has to go through [`ComRef::release_raw`] or a
    /// dropped [`ComRef`], otherwise the object leaks.
    unsafe fn release_reference(&self) -> i32 {
        self.ref_counter().decrement()
    }

    /// Query for the interface named by `iid`
    ///
    /// Returns [`ResultCode::NullParam`] when `slot` is absent. On success the
    /// slot holds a new strong reference to the requested view. When the
    /// interface is unsupported, returns [`ResultCode::InterfaceNotFound`] and
    /// leaves the slot untouched.
    fn query_interface(&self, iid: &Uuid, slot: Option<&mut InterfaceSlot>) -> ResultCode;
}

crate::declare_iid!(dyn IUnknown, 0x89D0171D1E547699, 0x3513C89A25664A40);

/// Typed form of [`IUnknown::query_interface`]
pub trait QueryInterfaceExt: IUnknown {
    /// Query for interface `I`, resolving its identifier statically
    fn query<I: ?Sized + Interface + IUnknown>(&self) -> Result<ComRef<I>> {
        let mut slot = InterfaceSlot::new();
        self.query_interface(&I::IID, Some(&mut slot)).into_result()?;
        slot.take::<I>().ok_or(ComError::InterfaceNotFound)
    }
}

impl<T: ?Sized + IUnknown> QueryInterfaceExt for T {}
