//! Common test utilities for integration tests
//!
//! Provides a tracked test object whose destruction is recorded in a shared
//! log, two interfaces it answers to, and factories for both.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use ucom::{
    ComRef, ConstructionInfo, IUnknown, InterfaceSlot, QueryTable, RefCount, ResultCode, Uuid,
};

/// Counter view of a tracked object
pub trait ICounter: IUnknown {
    fn value(&self) -> i32;
    fn bump(&self) -> i32;
}

ucom::declare_iid!(dyn ICounter, 0x0C0F_FEE0_0000_0001, 0x7E57_0000_0000_00A1);

/// Name view of a tracked object
pub trait INamed: IUnknown {
    fn name(&self) -> String;
}

ucom::declare_iid!(dyn INamed, 0x0C0F_FEE0_0000_0002, 0x7E57_0000_0000_00B2);

/// Identifier nothing answers to
pub const UNKNOWN_IID: Uuid = Uuid::new(0xDEAD, 0xBEEF);

/// Log of destroyed objects, shared between a test and its objects
#[derive(Clone, Default)]
pub struct DropLog(Arc<Mutex<Vec<String>>>);

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.0.lock().push(name.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// How many times `name` was destroyed
    pub fn count(&self, name: &str) -> usize {
        self.0.lock().iter().filter(|entry| entry.as_str() == name).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

/// Object answering to [`ICounter`] and [`INamed`]
pub struct Tracked {
    refs: RefCount,
    name: String,
    value: AtomicI32,
    log: DropLog,
}

impl Tracked {
    pub fn new(name: &str, log: &DropLog) -> Self {
        Self {
            refs: RefCount::new(),
            name: name.to_string(),
            value: AtomicI32::new(0),
            log: log.clone(),
        }
    }

    /// Current strong count, for assertions
    pub fn ref_count(&self) -> i32 {
        self.refs.get()
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.record(&self.name);
    }
}

unsafe impl IUnknown for Tracked {
    ucom::impl_ref_count!(refs);

    fn query_interface(&self, iid: &Uuid, slot: Option<&mut InterfaceSlot>) -> ResultCode {
        QueryTable::new(iid, slot)
            .entry::<dyn IUnknown>(self)
            .entry::<dyn ICounter>(self)
            .entry::<dyn INamed>(self)
            .finish()
    }
}

impl ICounter for Tracked {
    fn value(&self) -> i32 {
        self.value.load(Ordering::SeqCst)
    }

    fn bump(&self) -> i32 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl INamed for Tracked {
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Create a tracked object owned by a fresh handle
pub fn tracked(name: &str, log: &DropLog) -> ComRef<Tracked> {
    ComRef::new(Tracked::new(name, log))
}

/// Construction payload understood by the tracked factories
#[derive(Clone, Default)]
pub struct TrackedParams {
    pub name: String,
    pub log: DropLog,
}

fn make_tracked(
    default_name: &str,
    iid: &Uuid,
    slot: Option<&mut InterfaceSlot>,
    info: Option<&ConstructionInfo<'_>>,
) -> ResultCode {
    let Some(slot) = slot else {
        return ResultCode::NullParam;
    };

    let object = match info.and_then(|info| info.find(iid)).and_then(|record| record.payload::<TrackedParams>()) {
        Some(params) => Tracked::new(&params.name, &params.log),
        None => Tracked::new(default_name, &DropLog::new()),
    };
    ComRef::new(object).query_interface(iid, Some(slot))
}

/// Factory producing objects named "A" unless told otherwise
pub fn factory_a(
    iid: &Uuid,
    slot: Option<&mut InterfaceSlot>,
    info: Option<&ConstructionInfo<'_>>,
) -> ResultCode {
    make_tracked("A", iid, slot, info)
}

/// Factory producing objects named "B" unless told otherwise
pub fn factory_b(
    iid: &Uuid,
    slot: Option<&mut InterfaceSlot>,
    info: Option<&ConstructionInfo<'_>>,
) -> ResultCode {
    make_tracked("B", iid, slot, info)
}

/// Factory that always fails without touching the slot
pub fn failing_factory(
    _iid: &Uuid,
    _slot: Option<&mut InterfaceSlot>,
    _info: Option<&ConstructionInfo<'_>>,
) -> ResultCode {
    ResultCode::Fail
}

/// Factory producing objects named "M" and reporting a soft success
pub fn more_items_factory(
    iid: &Uuid,
    slot: Option<&mut InterfaceSlot>,
    info: Option<&ConstructionInfo<'_>>,
) -> ResultCode {
    match make_tracked("M", iid, slot, info) {
        ResultCode::Success => ResultCode::MoreItems,
        code => code,
    }
}
