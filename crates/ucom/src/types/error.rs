//! Error type for the typed conveniences

use thiserror::Error;

use super::result_code::ResultCode;

/// Result type for typed object-model operations
pub type Result<T> = std::result::Result<T, ComError>;

/// Failure outcomes, one per negative [`ResultCode`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComError {
    /// A required parameter was absent
    #[error("null parameter")]
    NullParam,

    /// Interface not supported or no factory registered
    #[error("interface not found")]
    InterfaceNotFound,

    /// Unspecified failure
    #[error("unspecified failure")]
    Fail,

    /// Initialization failed
    #[error("initialization error")]
    InitializationError,

    /// A parameter was present but invalid
    #[error("invalid parameter")]
    InvalidParam,

    /// Allocation failed
    #[error("out of memory")]
    OutOfMemory,

    /// The target is not ready
    #[error("not ready")]
    NotReady,
}

impl ComError {
    /// Wire code for this error
    pub const fn code(self) -> ResultCode {
        match self {
            Self::NullParam => ResultCode::NullParam,
            Self::InterfaceNotFound => ResultCode::InterfaceNotFound,
            Self::Fail => ResultCode::Fail,
            Self::InitializationError => ResultCode::InitializationError,
            Self::InvalidParam => ResultCode::InvalidParam,
            Self::OutOfMemory => ResultCode::OutOfMemory,
            Self::NotReady => ResultCode::NotReady,
        }
    }

    /// Error for a failure code, `None` for any success code
    pub const fn from_code(code: ResultCode) -> Option<Self> {
        Some(match code {
            ResultCode::NullParam => Self::NullParam,
            ResultCode::InterfaceNotFound => Self::InterfaceNotFound,
            ResultCode::Fail => Self::Fail,
            ResultCode::InitializationError => Self::InitializationError,
            ResultCode::InvalidParam => Self::InvalidParam,
            ResultCode::OutOfMemory => Self::OutOfMemory,
            ResultCode::NotReady => Self::NotReady,
            ResultCode::Success
            | ResultCode::FactoryAlreadyRegistered
            | ResultCode::Timeout
            | ResultCode::AsyncReturn
            | ResultCode::MoreItems => return None,
        })
    }
}
