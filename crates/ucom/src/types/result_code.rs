//! Outcome codes returned by every contract operation
//!
//! Callers branch on sign: any non-negative code is a success, any negative
//! code is a failure.

use std::fmt;

use super::error::{ComError, Result};

/// Outcome of a contract operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    /// Operation successful
    Success = 0,
    /// Factory registered over an existing entry
    FactoryAlreadyRegistered = 1,
    /// Operation timed out (reserved for extensions)
    Timeout = 2,
    /// Result will be delivered asynchronously (reserved for extensions)
    AsyncReturn = 3,
    /// More items are available
    MoreItems = 4,
    /// A required parameter was absent
    NullParam = -1,
    /// The requested interface is not supported or not registered
    InterfaceNotFound = -2,
    /// Unspecified failure
    Fail = -3,
    /// Initialization failed
    InitializationError = -4,
    /// A parameter was present but invalid
    InvalidParam = -5,
    /// Allocation failed
    OutOfMemory = -6,
    /// The target is not ready
    NotReady = -7,
}

impl ResultCode {
    /// Check if this code denotes success (code >= 0)
    pub const fn is_success(self) -> bool {
        self as i32 >= 0
    }

    /// Check if this code denotes failure (code < 0)
    pub const fn is_failure(self) -> bool {
        !self.is_success()
    }

    /// Raw wire value
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    /// Decode a raw wire value
    pub const fn from_raw(raw: i32) -> Option<Self> {
        Some(match raw {
            0 => Self::Success,
            1 => Self::FactoryAlreadyRegistered,
            2 => Self::Timeout,
            3 => Self::AsyncReturn,
            4 => Self::MoreItems,
            -1 => Self::NullParam,
            -2 => Self::InterfaceNotFound,
            -3 => Self::Fail,
            -4 => Self::InitializationError,
            -5 => Self::InvalidParam,
            -6 => Self::OutOfMemory,
            -7 => Self::NotReady,
            _ => return None,
        })
    }

    /// Convert into a `Result`, keeping soft successes in the `Ok` arm
    pub fn into_result(self) -> Result<ResultCode> {
        match ComError::from_code(self) {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

impl From<ComError> for ResultCode {
    fn from(err: ComError) -> Self {
        err.code()
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.as_raw())
    }
}
