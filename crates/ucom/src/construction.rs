//! Construction-info chains
//!
//! Object creation goes through one untyped entry point, so interface-specific
//! construction arguments travel as a chain of tagged records. Each record
//! names the interface whose parameters it carries and borrows its payload;
//! records are built on the caller's stack right before a create call and the
//! borrow lifetimes keep callees from retaining them.

use std::any::Any;
use std::fmt;

use crate::types::{Interface, Uuid};

/// One record in a construction-info chain
#[derive(Clone, Copy)]
pub struct ConstructionInfo<'a> {
    iid: Uuid,
    payload: Option<&'a dyn Any>,
    next: Option<&'a ConstructionInfo<'a>>,
}

impl<'a> ConstructionInfo<'a> {
    /// Record tagged with `iid` carrying no payload
    pub fn new(iid: Uuid) -> Self {
        Self {
            iid,
            payload: None,
            next: None,
        }
    }

    /// Record tagged with `iid` carrying `payload`
    pub fn with_payload<P: Any>(iid: Uuid, payload: &'a P) -> Self {
        Self {
            iid,
            payload: Some(payload),
            next: None,
        }
    }

    /// Record carrying `payload` for interface `I`
    pub fn for_interface<I: ?Sized + Interface, P: Any>(payload: &'a P) -> Self {
        Self::with_payload(I::IID, payload)
    }

    /// Link this record to a prior record
    pub fn chain(mut self, next: &'a ConstructionInfo<'a>) -> Self {
        self.next = Some(next);
        self
    }

    /// Identifier tag of this record
    pub fn iid(&self) -> Uuid {
        self.iid
    }

    /// Prior record in the chain
    pub fn next(&self) -> Option<&'a ConstructionInfo<'a>> {
        self.next
    }

    /// Payload of this record as `P`
    pub fn payload<P: Any>(&self) -> Option<&'a P> {
        self.payload?.downcast_ref::<P>()
    }

    /// Walk this record and every linked record
    pub fn iter(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// First record in the chain tagged with `iid`
    pub fn find(&self, iid: &Uuid) -> Option<&ConstructionInfo<'a>> {
        let mut current = Some(self);
        while let Some(info) = current {
            if info.iid == *iid {
                return Some(info);
            }
            current = info.next;
        }
        None
    }
}

impl fmt::Debug for ConstructionInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionInfo")
            .field("iid", &self.iid)
            .field("payload", &self.payload.is_some())
            .field("next", &self.next)
            .finish()
    }
}

/// Iterator over a construction-info chain
pub struct Chain<'c> {
    next: Option<&'c ConstructionInfo<'c>>,
}

impl<'c> Iterator for Chain<'c> {
    type Item = &'c ConstructionInfo<'c>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next;
        Some(current)
    }
}
