//! Typed record parameters

use super::format::write_general;
use std::fmt;
use std::net::Ipv4Addr;

/// Bytes reserved for a string parameter, terminator included
pub const PARAM_STR_CAPACITY: usize = 48;

/// Longest string payload a parameter can hold
pub const PARAM_STR_MAX: usize = PARAM_STR_CAPACITY - 1;

/// Fixed-size, NUL-terminated string payload
///
/// Input longer than [`PARAM_STR_MAX`] bytes is cut at the last UTF-8
/// boundary that fits. An interior NUL ends the string early.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ParamStr([u8; PARAM_STR_CAPACITY]);

impl ParamStr {
    pub const EMPTY: ParamStr = ParamStr([0; PARAM_STR_CAPACITY]);

    pub fn new(s: &str) -> Self {
        let mut end = s.len().min(PARAM_STR_MAX);
        while !s.is_char_boundary(end) {
            end -= 1;
        }

        let mut bytes = [0u8; PARAM_STR_CAPACITY];
        bytes[..end].copy_from_slice(&s.as_bytes()[..end]);
        ParamStr(bytes)
    }

    pub fn as_str(&self) -> &str {
        let len = self
            .0
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PARAM_STR_MAX);
        // Always a prefix of a &str cut on a char boundary.
        std::str::from_utf8(&self.0[..len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl Default for ParamStr {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for ParamStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl From<&str> for ParamStr {
    fn from(s: &str) -> Self {
        ParamStr::new(s)
    }
}

/// One parameter slot of a record
///
/// `#[repr(u8)]` pins the layout to a one-byte tag followed by the payload,
/// 56 bytes in total.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum Param {
    /// Nothing stored; renders as empty text
    #[default]
    Unset = 0,
    Str(ParamStr) = 1,
    Integer(i64) = 2,
    Real(f64) = 3,
    /// IPv4 address, stored in network byte order
    Ipv4(u32) = 4,
}

impl Param {
    /// Build an IPv4 parameter from a host-order address
    pub fn ipv4_from_host(addr: u32) -> Self {
        Param::Ipv4(addr.to_be())
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            Param::Unset => ParamKind::Unset,
            Param::Str(_) => ParamKind::String,
            Param::Integer(_) => ParamKind::Integer,
            Param::Real(_) => ParamKind::Real,
            Param::Ipv4(_) => ParamKind::Ipv4,
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Param::Unset)
    }

    pub fn as_ipv4(&self) -> Option<Ipv4Addr> {
        match *self {
            Param::Ipv4(network) => Some(Ipv4Addr::from(u32::from_be(network))),
            _ => None,
        }
    }
}

/// Writes the textual form used by the format engine
impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Unset => Ok(()),
            Param::Str(s) => f.write_str(s.as_str()),
            Param::Integer(i) => write!(f, "{}", i),
            Param::Real(v) => write_general(f, *v),
            Param::Ipv4(network) => write!(f, "{}", Ipv4Addr::from(u32::from_be(*network))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Unset,
    String,
    Integer,
    Real,
    Ipv4,
}

/// Conversion into a record parameter
///
/// Unsigned 32-bit values are integers; use [`Ipv4Addr`] or
/// [`Param::ipv4_from_host`] for addresses.
pub trait IntoParam {
    fn into_param(self) -> Param;
}

impl IntoParam for Param {
    fn into_param(self) -> Param {
        self
    }
}

impl IntoParam for &str {
    fn into_param(self) -> Param {
        Param::Str(ParamStr::new(self))
    }
}

impl IntoParam for &String {
    fn into_param(self) -> Param {
        Param::Str(ParamStr::new(self))
    }
}

impl IntoParam for String {
    fn into_param(self) -> Param {
        Param::Str(ParamStr::new(&self))
    }
}

macro_rules! integer_param {
    ($($ty:ty),*) => {
        $(
            impl IntoParam for $ty {
                fn into_param(self) -> Param {
                    Param::Integer(i64::from(self))
                }
            }
        )*
    };
}

integer_param!(i8, i16, i32, i64, u8, u16, u32, bool);

impl IntoParam for f64 {
    fn into_param(self) -> Param {
        Param::Real(self)
    }
}

impl IntoParam for f32 {
    fn into_param(self) -> Param {
        Param::Real(f64::from(self))
    }
}

impl IntoParam for Ipv4Addr {
    fn into_param(self) -> Param {
        Param::ipv4_from_host(u32::from(self))
    }
}
