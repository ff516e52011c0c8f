//! Object manager: the factory registry
//!
//! The manager maps interface identifiers to factory functions and creates
//! objects through them. It is itself a reference-counted object queried
//! through [`IComManager`] and the extended [`IComManager1`].
//!
//! # Concurrency
//!
//! Each registry operation is atomic with respect to the others on the same
//! manager. Factories run after the registry lock has been released, so a
//! factory may call back into the manager that is invoking it.

mod com_manager;
mod global;

pub use com_manager::*;
pub use global::*;

use std::collections::HashMap;
use std::fmt;

use crate::com_ref::ComRef;
use crate::construction::ConstructionInfo;
use crate::types::{ComError, Interface, Result, ResultCode, Uuid};
use crate::unknown::{IUnknown, InterfaceSlot};

/// Factory function: the only call shape the registry invokes
///
/// Receives the requested identifier, the output slot, and the caller's
/// construction-info chain.
pub type FactoryFn = fn(&Uuid, Option<&mut InterfaceSlot>, Option<&ConstructionInfo<'_>>) -> ResultCode;

/// Identifier to factory mapping
pub type FactoryMap = HashMap<Uuid, FactoryFn>;

/// Base manager interface
pub trait IComManager: IUnknown {
    /// Register `factory` under `iid`
    ///
    /// Returns [`ResultCode::NullParam`] if `factory` is absent. An existing
    /// entry is overwritten and reported with the soft success
    /// [`ResultCode::FactoryAlreadyRegistered`].
    fn register_iid_factory(&self, iid: &Uuid, factory: Option<FactoryFn>) -> ResultCode;

    /// Create an object through the factory registered under `iid`
    ///
    /// Returns [`ResultCode::InterfaceNotFound`] without touching `slot` when
    /// nothing is registered; otherwise returns the factory's result verbatim.
    fn create_object(
        &self,
        iid: &Uuid,
        slot: Option<&mut InterfaceSlot>,
        info: Option<&ConstructionInfo<'_>>,
    ) -> ResultCode;
}

crate::declare_iid!(dyn IComManager, 0xA84460A844FB841C, 0x8441F8C9B9F14C8D);

/// Extended manager interface
pub trait IComManager1: IComManager {
    /// Remove the factory registered under `iid`
    fn unregister_iid_factory(&self, iid: &Uuid) -> ResultCode;

    /// Copy out the factory registered under `iid`
    ///
    /// Clears `out` and returns [`ResultCode::InterfaceNotFound`] when nothing
    /// is registered.
    fn get_iid_factory(&self, iid: &Uuid, out: Option<&mut Option<FactoryFn>>) -> ResultCode;

    /// Create an independent manager holding a copy of this registry
    ///
    /// The copy is created through this manager's own `create_object`, so the
    /// manager factory must be registered here.
    fn duplicate(&self, out: Option<&mut Option<ComRef<dyn IComManager1>>>) -> ResultCode;
}

crate::declare_iid!(dyn IComManager1, 0x5C3B8E0FA1D24E97, 0xB7E4416AF09D2C35);

/// Construction payload for manager identifiers
#[derive(Clone, Default)]
pub struct ComManagerParams {
    /// Registry the new manager starts with
    pub factories: FactoryMap,
}

impl fmt::Debug for ComManagerParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComManagerParams")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Typed conveniences over [`IComManager`]
pub trait ComManagerExt: IComManager {
    /// Create an object for interface `I` without construction info
    fn create<I: ?Sized + Interface + IUnknown>(&self) -> Result<ComRef<I>> {
        create_typed(self, None)
    }

    /// Create an object for interface `I` with a construction-info chain
    fn create_with<I: ?Sized + Interface + IUnknown>(
        &self,
        info: &ConstructionInfo<'_>,
    ) -> Result<ComRef<I>> {
        create_typed(self, Some(info))
    }

    /// Register `factory` under the identifier of interface `I`
    fn register<I: ?Sized + Interface>(&self, factory: FactoryFn) -> ResultCode {
        self.register_iid_factory(&I::IID, Some(factory))
    }
}

impl<T: ?Sized + IComManager> ComManagerExt for T {}

fn create_typed<M, I>(manager: &M, info: Option<&ConstructionInfo<'_>>) -> Result<ComRef<I>>
where
    M: ?Sized + IComManager,
    I: ?Sized + Interface + IUnknown,
{
    let mut slot = InterfaceSlot::new();
    manager
        .create_object(&I::IID, Some(&mut slot), info)
        .into_result()?;
    slot.take::<I>().ok_or(ComError::InterfaceNotFound)
}
