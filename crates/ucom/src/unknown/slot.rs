//! Untyped output slot and per-type capability tables

use std::any::Any;
use std::fmt;

use super::IUnknown;
use crate::com_ref::ComRef;
use crate::types::{Interface, ResultCode, Uuid};

/// Untyped output slot filled by queries and factories
///
/// Holds at most one strong reference to some interface view. Dropping or
/// clearing a filled slot releases that reference.
#[derive(Default)]
pub struct InterfaceSlot {
    iid: Option<Uuid>,
    value: Option<Box<dyn Any>>,
}

impl InterfaceSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the slot is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Identifier of the view currently held
    pub fn iid(&self) -> Option<Uuid> {
        self.iid
    }

    /// Store a new strong reference to `view`
    ///
    /// Acquires one reference on the object and releases any previous content.
    /// Returns `false` and leaves the slot untouched when no handle owns the
    /// object.
    pub fn store<I: ?Sized + Interface + IUnknown>(&mut self, view: &I) -> bool {
        match ComRef::from_borrowed(view) {
            Some(reference) => {
                self.put(reference);
                true
            }
            None => false,
        }
    }

    /// Move an owned reference into the slot without touching the count
    pub fn put<I: ?Sized + Interface + IUnknown>(&mut self, reference: ComRef<I>) {
        self.iid = Some(I::IID);
        self.value = Some(Box::new(reference));
    }

    /// Take the held reference out as interface `I`
    ///
    /// Returns `None` when the slot is empty or holds a different view; in the
    /// latter case the held reference is released.
    pub fn take<I: ?Sized + Interface + IUnknown>(&mut self) -> Option<ComRef<I>> {
        let held = self.iid.take();
        let value = self.value.take()?;
        match value.downcast::<ComRef<I>>() {
            Ok(reference) => Some(*reference),
            Err(_) => {
                tracing::warn!(
                    held = ?held,
                    requested = %I::IID,
                    "interface slot holds a different view"
                );
                None
            }
        }
    }

    /// Release whatever the slot holds
    pub fn clear(&mut self) {
        self.iid = None;
        self.value = None;
    }
}

impl fmt::Debug for InterfaceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceSlot")
            .field("iid", &self.iid)
            .field("filled", &self.value.is_some())
            .finish()
    }
}

/// Capability table answering one `query_interface` call
///
/// Entries are matched in order against the requested identifier; the first
/// match stores its view, or reports [`ResultCode::NotReady`] when no handle
/// owns the object. Several entries may expose the same object under
/// different identifiers.
pub struct QueryTable<'s> {
    iid: Uuid,
    slot: Option<&'s mut InterfaceSlot>,
    outcome: Option<ResultCode>,
}

impl<'s> QueryTable<'s> {
    /// Start answering a query for `iid`
    pub fn new(iid: &Uuid, slot: Option<&'s mut InterfaceSlot>) -> Self {
        let outcome = slot.is_none().then_some(ResultCode::NullParam);
        Self {
            iid: *iid,
            slot,
            outcome,
        }
    }

    /// Offer `view` for interface `I`
    pub fn entry<I: ?Sized + Interface + IUnknown>(mut self, view: &I) -> Self {
        if self.outcome.is_none() && self.iid == I::IID {
            if let Some(slot) = self.slot.as_deref_mut() {
                self.outcome = Some(if slot.store(view) {
                    ResultCode::Success
                } else {
                    ResultCode::NotReady
                });
            }
        }
        self
    }

    /// Outcome of the query
    pub fn finish(self) -> ResultCode {
        let outcome = self.outcome.unwrap_or(ResultCode::InterfaceNotFound);
        tracing::trace!(iid = %self.iid, %outcome, "query_interface");
        outcome
    }
}
