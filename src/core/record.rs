//! Fixed-layout log record
//!
//! A [`Record`] is exactly [`RECORD_SIZE`] bytes: a 64-byte header followed
//! by [`PARAM_MAX`] parameter slots of 56 bytes each. Records live inside a
//! [`Pool`](super::pool::Pool) for the whole life of the pool and only move
//! between its lists; they are never allocated one at a time.

use super::param::{IntoParam, Param};
use super::severity::Severity;
use std::fmt;
use std::num::NonZeroU32;

/// Number of parameters a record carries (`%1` through `%8`)
pub const PARAM_MAX: usize = 8;

/// In-memory size of a record
pub const RECORD_SIZE: usize = 512;

const HEADER_RESERVED: usize = 51;

const _: () = assert!(std::mem::size_of::<Record>() == RECORD_SIZE);

/// Index of a slot in a pool, stored off by one so `Option<SlotId>` stays
/// four bytes wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SlotId(NonZeroU32);

impl SlotId {
    /// Largest index representable
    pub const MAX_INDEX: usize = (u32::MAX - 1) as usize;

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index <= Self::MAX_INDEX);
        SlotId(NonZeroU32::MIN.saturating_add(index as u32))
    }

    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct Record {
    id: u32,
    code: u32,
    /// Owned by whichever pool list currently holds the slot
    pub(crate) link: Option<SlotId>,
    severity: Severity,
    _reserved: [u8; HEADER_RESERVED],
    params: [Param; PARAM_MAX],
}

impl Record {
    /// A standalone record, useful for rendering outside a pool
    pub const fn new(code: u32, severity: Severity) -> Self {
        Self {
            id: 0,
            code,
            link: None,
            severity,
            _reserved: [0; HEADER_RESERVED],
            params: [Param::Unset; PARAM_MAX],
        }
    }

    /// Discriminator for queues carrying more than one structure type
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    #[inline]
    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn set_code(&mut self, code: u32) {
        self.code = code;
    }

    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
    }

    /// Parameter `argnum`, counted from 1 as in `%1`
    pub fn param(&self, argnum: usize) -> Option<&Param> {
        argnum.checked_sub(1).and_then(|i| self.params.get(i))
    }

    pub fn params(&self) -> &[Param; PARAM_MAX] {
        &self.params
    }

    /// Store `value` as parameter `argnum` (1-based)
    ///
    /// Returns false, leaving the record untouched, when `argnum` is not in
    /// `1..=PARAM_MAX`.
    pub fn set_param(&mut self, argnum: usize, value: impl IntoParam) -> bool {
        match argnum.checked_sub(1).and_then(|i| self.params.get_mut(i)) {
            Some(slot) => {
                *slot = value.into_param();
                true
            }
            None => false,
        }
    }

    pub fn set_string(&mut self, argnum: usize, value: &str) -> bool {
        self.set_param(argnum, value)
    }

    pub fn set_integer(&mut self, argnum: usize, value: i64) -> bool {
        self.set_param(argnum, value)
    }

    pub fn set_real(&mut self, argnum: usize, value: f64) -> bool {
        self.set_param(argnum, value)
    }

    /// Store an IPv4 address given in host byte order
    pub fn set_ipv4(&mut self, argnum: usize, host_order: u32) -> bool {
        self.set_param(argnum, Param::ipv4_from_host(host_order))
    }

    pub fn clear_params(&mut self) {
        self.params = [Param::Unset; PARAM_MAX];
    }

    /// Reset content to what a freshly claimed record holds
    pub(crate) fn reset(&mut self) {
        self.id = 0;
        self.code = 0;
        self.severity = Severity::default();
        self.clear_params();
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new(0, Severity::default())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("severity", &self.severity)
            .field("params", &self.params)
            .finish()
    }
}
