//! Core value types
//!
//! - Identifiers: [`Uuid`] and the type-to-identifier binding [`Interface`]
//! - Outcome codes: [`ResultCode`]
//! - Errors for the typed conveniences: [`ComError`]

mod error;
mod identifiers;
mod result_code;

pub use error::*;
pub use identifiers::*;
pub use result_code::*;
