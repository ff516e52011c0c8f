//! Interface identifiers
//!
//! Every interface in the object model is named by a 128-bit [`Uuid`]. The
//! identifier values form the compatibility contract between independently
//! built modules: changing one is a breaking change.

use bytes::{Buf, BufMut};
use std::fmt;

/// 128-bit interface identifier
///
/// Stored as two 64-bit halves. Equality and hashing are bitwise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Uuid {
    /// Low 64 bits
    pub low: u64,
    /// High 64 bits
    pub high: u64,
}

impl Uuid {
    /// Size of an identifier in bytes
    pub const SIZE: usize = 16;

    /// The all-zero identifier, used for types with no bound identifier
    pub const NIL: Self = Self::new(0, 0);

    /// Create an identifier from its two halves
    pub const fn new(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    /// Check if this is the nil identifier
    pub const fn is_nil(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// Generate a random v4 identifier
    pub fn generate() -> Self {
        Self::from(uuid::Uuid::new_v4())
    }

    /// Parse from string format "xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx"
    ///
    /// The first 64 bits of the text form are the high half.
    pub fn parse(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s.trim()).ok().map(Self::from)
    }

    /// Encode to buffer, low half first
    pub fn encode<B: BufMut>(&self, buf: &mut B, little_endian: bool) {
        if little_endian {
            buf.put_u64_le(self.low);
            buf.put_u64_le(self.high);
        } else {
            buf.put_u64(self.low);
            buf.put_u64(self.high);
        }
    }

    /// Decode from buffer
    ///
    /// Returns `None` if fewer than [`Uuid::SIZE`] bytes remain.
    pub fn decode<B: Buf>(buf: &mut B, little_endian: bool) -> Option<Self> {
        if buf.remaining() < Self::SIZE {
            return None;
        }
        let (low, high) = if little_endian {
            (buf.get_u64_le(), buf.get_u64_le())
        } else {
            (buf.get_u64(), buf.get_u64())
        };
        Some(Self::new(low, high))
    }
}

impl From<uuid::Uuid> for Uuid {
    fn from(value: uuid::Uuid) -> Self {
        let (high, low) = value.as_u64_pair();
        Self::new(low, high)
    }
}

impl From<Uuid> for uuid::Uuid {
    fn from(value: Uuid) -> Self {
        uuid::Uuid::from_u64_pair(value.high, value.low)
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UUID({})", self)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from(*self).hyphenated())
    }
}

/// Binds a type to its interface identifier
///
/// Implemented for `dyn Trait` types through [`declare_iid!`](crate::declare_iid).
/// Types that never declare an identifier resolve to [`Uuid::NIL`].
pub trait Interface: 'static {
    /// Identifier of this interface
    const IID: Uuid = Uuid::NIL;
}

/// Identifier bound to interface type `I`
pub const fn iid_of<I: ?Sized + Interface>() -> Uuid {
    I::IID
}

/// Bind an interface type to its identifier
///
/// ```
/// use ucom::{declare_iid, iid_of, IUnknown, Uuid};
///
/// pub trait IGreeter: IUnknown {
///     fn greet(&self) -> String;
/// }
///
/// declare_iid!(dyn IGreeter, 0x0123456789ABCDEF, 0xFEDCBA9876543210);
///
/// assert_eq!(iid_of::<dyn IGreeter>(), Uuid::new(0x0123456789ABCDEF, 0xFEDCBA9876543210));
/// ```
#[macro_export]
macro_rules! declare_iid {
    ($ty:ty, $low:expr, $high:expr $(,)?) => {
        impl $crate::Interface for $ty {
            const IID: $crate::Uuid = $crate::Uuid::new($low, $high);
        }
    };
}
