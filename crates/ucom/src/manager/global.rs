//! Process-wide object manager
//!
//! [`get_com_manager`] is the single entry point of the object model. The
//! manager behind it is created on first use, seeded with its own factory,
//! and lives until the process exits.

use std::sync::OnceLock;

use tracing::debug;

use super::{ComManager, IComManager};
use crate::com_ref::ComRef;
use crate::types::{ComError, Result, ResultCode};
use crate::unknown::QueryInterfaceExt;

static GLOBAL_MANAGER: OnceLock<ComRef<ComManager>> = OnceLock::new();

fn global_manager() -> Result<&'static ComRef<ComManager>> {
    if let Some(manager) = GLOBAL_MANAGER.get() {
        return Ok(manager);
    }

    let fresh = ComRef::try_new(ComManager::bootstrapped())?;
    // A concurrent first call may win the race; its instance is kept and ours dropped.
    if GLOBAL_MANAGER.set(fresh).is_ok() {
        debug!("global object manager initialized");
    }
    GLOBAL_MANAGER.get().ok_or(ComError::InitializationError)
}

/// Get the process-wide object manager
///
/// Returns [`ResultCode::NullParam`] when `out` is absent. Every call stores a
/// new strong reference to the same instance.
pub fn get_com_manager(out: Option<&mut Option<ComRef<dyn IComManager>>>) -> ResultCode {
    let Some(out) = out else {
        return ResultCode::NullParam;
    };

    let manager = match global_manager() {
        Ok(manager) => manager,
        Err(err) => return err.code(),
    };

    match manager.query::<dyn IComManager>() {
        Ok(view) => {
            *out = Some(view);
            ResultCode::Success
        }
        Err(err) => err.code(),
    }
}

/// Typed form of [`get_com_manager`]
pub fn com_manager() -> Result<ComRef<dyn IComManager>> {
    let mut out = None;
    get_com_manager(Some(&mut out)).into_result()?;
    out.ok_or(ComError::InitializationError)
}
