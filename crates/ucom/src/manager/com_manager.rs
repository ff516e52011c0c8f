//! Default object manager implementation

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use super::{ComManagerParams, FactoryFn, FactoryMap, IComManager, IComManager1};
use crate::com_ref::ComRef;
use crate::construction::ConstructionInfo;
use crate::types::{iid_of, ResultCode, Uuid};
use crate::unknown::{IUnknown, InterfaceSlot, QueryTable, RefCount};

/// Reference-counted factory registry
///
/// One concrete object answers to [`IUnknown`], [`IComManager`] and
/// [`IComManager1`].
pub struct ComManager {
    refs: RefCount,
    factories: RwLock<FactoryMap>,
}

impl ComManager {
    /// Create a manager with an empty registry
    pub fn new() -> Self {
        Self::with_factories(FactoryMap::new())
    }

    /// Create a manager seeded with `factories`
    pub fn with_factories(factories: FactoryMap) -> Self {
        Self {
            refs: RefCount::new(),
            factories: RwLock::new(factories),
        }
    }

    /// Create a manager that can create managers
    ///
    /// [`ComManager::factory`] is registered under both manager identifiers,
    /// which is what [`IComManager1::duplicate`] relies on.
    pub fn bootstrapped() -> Self {
        let mut factories = FactoryMap::new();
        factories.insert(iid_of::<dyn IComManager>(), Self::factory as FactoryFn);
        factories.insert(iid_of::<dyn IComManager1>(), Self::factory as FactoryFn);
        Self::with_factories(factories)
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.factories.read().len()
    }

    /// Check if no factory is registered
    pub fn is_empty(&self) -> bool {
        self.factories.read().is_empty()
    }

    /// Check if a factory is registered under `iid`
    pub fn contains(&self, iid: &Uuid) -> bool {
        self.factories.read().contains_key(iid)
    }

    /// Factory for the manager identifiers
    ///
    /// With construction info, the head record must be tagged with a manager
    /// identifier and carry [`ComManagerParams`]; the new manager starts with a
    /// copy of that registry. Without construction info the new manager is
    /// empty.
    pub fn factory(
        iid: &Uuid,
        slot: Option<&mut InterfaceSlot>,
        info: Option<&ConstructionInfo<'_>>,
    ) -> ResultCode {
        let Some(slot) = slot else {
            return ResultCode::NullParam;
        };

        if !is_manager_iid(iid) {
            return ResultCode::InterfaceNotFound;
        }

        let manager = match info {
            Some(info) => {
                if !is_manager_iid(&info.iid()) {
                    return ResultCode::InterfaceNotFound;
                }
                match info.payload::<ComManagerParams>() {
                    Some(params) => Self::with_factories(params.factories.clone()),
                    None => {
                        warn!(tag = %info.iid(), "manager construction info without registry payload");
                        return ResultCode::InvalidParam;
                    }
                }
            }
            None => Self::new(),
        };

        let object = match ComRef::try_new(manager) {
            Ok(object) => object,
            Err(err) => return err.code(),
        };
        debug!(factories = object.len(), "created object manager");

        object.query_interface(iid, Some(slot))
    }
}

impl Default for ComManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_manager_iid(iid: &Uuid) -> bool {
    *iid == iid_of::<dyn IComManager>() || *iid == iid_of::<dyn IComManager1>()
}

// SAFETY: ref_counter returns the embedded `refs` field
unsafe impl IUnknown for ComManager {
    crate::impl_ref_count!(refs);

    fn query_interface(&self, iid: &Uuid, slot: Option<&mut InterfaceSlot>) -> ResultCode {
        QueryTable::new(iid, slot)
            .entry::<dyn IUnknown>(self)
            .entry::<dyn IComManager>(self)
            .entry::<dyn IComManager1>(self)
            .finish()
    }
}

impl IComManager for ComManager {
    fn register_iid_factory(&self, iid: &Uuid, factory: Option<FactoryFn>) -> ResultCode {
        let Some(factory) = factory else {
            return ResultCode::NullParam;
        };

        let previous = self.factories.write().insert(*iid, factory);
        if previous.is_some() {
            debug!(%iid, "factory overwritten");
            ResultCode::FactoryAlreadyRegistered
        } else {
            debug!(%iid, "factory registered");
            ResultCode::Success
        }
    }

    fn create_object(
        &self,
        iid: &Uuid,
        slot: Option<&mut InterfaceSlot>,
        info: Option<&ConstructionInfo<'_>>,
    ) -> ResultCode {
        let factory = self.factories.read().get(iid).copied();
        let Some(factory) = factory else {
            trace!(%iid, "no factory registered");
            return ResultCode::InterfaceNotFound;
        };

        let code = factory(iid, slot, info);
        if code.is_failure() {
            debug!(%iid, %code, "factory failed");
        } else {
            trace!(%iid, %code, "object created");
        }
        code
    }
}

impl IComManager1 for ComManager {
    fn unregister_iid_factory(&self, iid: &Uuid) -> ResultCode {
        match self.factories.write().remove(iid) {
            Some(_) => {
                debug!(%iid, "factory unregistered");
                ResultCode::Success
            }
            None => ResultCode::InterfaceNotFound,
        }
    }

    fn get_iid_factory(&self, iid: &Uuid, out: Option<&mut Option<FactoryFn>>) -> ResultCode {
        let Some(out) = out else {
            return ResultCode::NullParam;
        };

        *out = self.factories.read().get(iid).copied();
        if out.is_some() {
            ResultCode::Success
        } else {
            ResultCode::InterfaceNotFound
        }
    }

    fn duplicate(&self, out: Option<&mut Option<ComRef<dyn IComManager1>>>) -> ResultCode {
        let Some(out) = out else {
            return ResultCode::NullParam;
        };

        let params = ComManagerParams {
            factories: self.factories.read().clone(),
        };
        let info = ConstructionInfo::with_payload(iid_of::<dyn IComManager1>(), &params);

        let mut slot = InterfaceSlot::new();
        let code = self.create_object(&iid_of::<dyn IComManager1>(), Some(&mut slot), Some(&info));
        if code.is_failure() {
            return code;
        }

        match slot.take::<dyn IComManager1>() {
            Some(copy) => {
                *out = Some(copy);
                code
            }
            None => ResultCode::Fail,
        }
    }
}
