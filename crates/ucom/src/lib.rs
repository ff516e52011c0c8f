//! Minimal binary-stable component object model
//!
//! Independently built modules expose and consume polymorphic interfaces
//! through opaque 128-bit identifiers and reference-counted objects.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  get_com_manager()  ── process-wide entry point             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Object manager       │  Construction info                  │
//! │  - IComManager        │  - tagged, chained records          │
//! │  - IComManager1       │  - caller-owned, call-scoped        │
//! │  - factory registry   │                                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IUnknown             │  ComRef<I>                          │
//! │  - add / release      │  - acquire on clone                 │
//! │  - query_interface    │  - release on drop                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Uuid identifiers     │  ResultCode outcomes                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! - **Identifier**: a [`Uuid`] naming an interface; bound to a `dyn Trait`
//!   type with [`declare_iid!`]
//! - **Capability object**: anything implementing [`IUnknown`]
//! - **Strong reference**: one unit of the object's count, owned by a
//!   [`ComRef`]
//! - **Factory**: a [`FactoryFn`] registered in the object manager
//!
//! # Modules
//!
//! - [`types`]: identifiers, outcome codes and errors
//! - [`unknown`]: the capability-query core
//! - [`com_ref`]: the owning reference handle
//! - [`construction`]: construction-info chains
//! - [`manager`]: the object manager and the global accessor

pub mod types;
pub mod unknown;
pub mod com_ref;
pub mod construction;
pub mod manager;

// Re-export main types and the entry point
pub use types::{iid_of, ComError, Interface, Result, ResultCode, Uuid};
pub use unknown::{IUnknown, InterfaceSlot, QueryInterfaceExt, QueryTable, RefCount};
pub use com_ref::ComRef;
pub use construction::ConstructionInfo;
pub use manager::{
    com_manager, get_com_manager,
    ComManager, ComManagerExt, ComManagerParams,
    FactoryFn, FactoryMap, IComManager, IComManager1,
};
