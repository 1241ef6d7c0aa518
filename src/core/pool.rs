//! Record pool and its ownership-transfer protocol
//!
//! The pool owns a fixed arena of [`Record`] slots. Each slot is, at any
//! instant, on the free list, on the busy (transfer) queue, or held by
//! exactly one [`RecordRef`]. Both lists are index chains threaded through
//! the records' `link` field and guarded by a single [`SpinLock`].
//!
//! ```text
//! producer: claim() ──► fill ──► publish() ──► [busy queue, FIFO]
//! consumer: next() ──► render ──► release() ──► [free list]
//! ```
//!
//! None of the four operations waits for another thread: an empty free list
//! makes [`Pool::claim`] return `None`, an empty queue makes [`Pool::next`]
//! return `None`.

use super::error::{LoggerError, Result};
use super::record::{Record, SlotId};
use super::spin::SpinLock;
use std::cell::UnsafeCell;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::ptr;

/// Slot count used when none is configured
pub const DEFAULT_CAPACITY: usize = 16;

/// Upper bound on slots in one pool
pub const MAX_CAPACITY: usize = 1 << 20;

struct Slot(UnsafeCell<Record>);

#[derive(Debug, Default)]
struct Lists {
    free: Option<SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    free_len: usize,
    busy_len: usize,
}

/// Snapshot of where the pool's slots are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub free: usize,
    pub queued: usize,
    /// Claimed but unpublished, or dequeued but not yet released
    pub in_flight: usize,
}

pub struct Pool {
    slots: Box<[Slot]>,
    lists: SpinLock<Lists>,
}

// SAFETY: a slot's record is only reached through the unique RecordRef that
// owns it, and its link only while holding `lists`.
unsafe impl Sync for Pool {}
unsafe impl Send for Pool {}

impl Pool {
    /// Allocate `capacity` slots, all initially free
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(LoggerError::config("Pool", "capacity must be at least 1"));
        }
        if capacity > MAX_CAPACITY {
            return Err(LoggerError::config(
                "Pool",
                format!("capacity {} exceeds maximum {}", capacity, MAX_CAPACITY),
            ));
        }
        Ok(Self::with_valid_capacity(capacity))
    }

    pub(crate) fn with_valid_capacity(capacity: usize) -> Self {
        let slots: Box<[Slot]> = (0..capacity)
            .map(|index| {
                let mut record = Record::default();
                record.link = (index + 1 < capacity).then(|| SlotId::from_index(index + 1));
                Slot(UnsafeCell::new(record))
            })
            .collect();

        Self {
            slots,
            lists: SpinLock::new(Lists {
                free: Some(SlotId::from_index(0)),
                free_len: capacity,
                ..Lists::default()
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Take a record off the free list
    ///
    /// Returns `None` when every slot is in use. Callers should skip the log
    /// line rather than retry in a loop. The record comes back reset: code 0,
    /// severity `Info`, no parameters.
    pub fn claim(&self) -> Option<RecordRef<'_>> {
        let id = {
            let mut lists = self.lists.lock();
            let id = lists.free?;
            // SAFETY: `id` is on the free list and we hold the lock.
            lists.free = unsafe { self.link(id) };
            lists.free_len -= 1;
            id
        };

        let mut record = RecordRef { pool: self, id };
        record.reset();
        Some(record)
    }

    /// Append a record to the tail of the busy queue
    ///
    /// # Panics
    ///
    /// If `record` was claimed from a different pool.
    pub fn publish(&self, record: RecordRef<'_>) {
        let id = self.adopt(record);
        let mut lists = self.lists.lock();
        // SAFETY: `id` was just adopted, `tail` is on the busy list, and we
        // hold the lock.
        unsafe {
            self.set_link(id, None);
            match lists.tail {
                Some(tail) => self.set_link(tail, Some(id)),
                None => lists.head = Some(id),
            }
        }
        lists.tail = Some(id);
        lists.busy_len += 1;
    }

    /// Take the oldest record off the busy queue
    pub fn next(&self) -> Option<RecordRef<'_>> {
        let id = {
            let mut lists = self.lists.lock();
            let id = lists.head?;
            // SAFETY: `id` is the busy head and we hold the lock.
            lists.head = unsafe { self.link(id) };
            if lists.head.is_none() {
                lists.tail = None;
            }
            lists.busy_len -= 1;
            id
        };

        Some(RecordRef { pool: self, id })
    }

    /// Give a record back to the free list
    ///
    /// # Panics
    ///
    /// If `record` was claimed from a different pool.
    pub fn release(&self, record: RecordRef<'_>) {
        let id = self.adopt(record);
        self.push_free(id);
    }

    pub fn stats(&self) -> PoolStats {
        let lists = self.lists.lock();
        PoolStats {
            capacity: self.capacity(),
            free: lists.free_len,
            queued: lists.busy_len,
            in_flight: self.capacity() - lists.free_len - lists.busy_len,
        }
    }

    fn push_free(&self, id: SlotId) {
        let mut lists = self.lists.lock();
        // SAFETY: the caller owned `id` and we hold the lock.
        unsafe { self.set_link(id, lists.free) };
        lists.free = Some(id);
        lists.free_len += 1;
    }

    fn adopt(&self, record: RecordRef<'_>) -> SlotId {
        assert!(
            ptr::eq(record.pool, self),
            "record slot {} belongs to a different pool",
            record.id.index()
        );
        ManuallyDrop::new(record).id
    }

    /// # Safety
    ///
    /// The caller holds the list lock and `id` is on one of the lists.
    unsafe fn link(&self, id: SlotId) -> Option<SlotId> {
        ptr::addr_of!((*self.slots[id.index()].0.get()).link).read()
    }

    /// # Safety
    ///
    /// The caller holds the list lock, or owns `id` outright, and no
    /// reference into the record is live.
    unsafe fn set_link(&self, id: SlotId, next: Option<SlotId>) {
        ptr::addr_of_mut!((*self.slots[id.index()].0.get()).link).write(next);
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").field("stats", &self.stats()).finish()
    }
}

/// Exclusive ownership of one record slot
///
/// Obtained from [`Pool::claim`] or [`Pool::next`] and surrendered through
/// [`Pool::publish`] or [`Pool::release`]. Dropping it without either hands
/// the slot back to the free list.
pub struct RecordRef<'a> {
    pool: &'a Pool,
    id: SlotId,
}

impl RecordRef<'_> {
    /// Index of the underlying slot; stable for the life of the pool
    pub fn slot(&self) -> usize {
        self.id.index()
    }
}

impl Deref for RecordRef<'_> {
    type Target = Record;

    fn deref(&self) -> &Record {
        // SAFETY: this RecordRef is the slot's only owner.
        unsafe { &*self.pool.slots[self.id.index()].0.get() }
    }
}

impl DerefMut for RecordRef<'_> {
    fn deref_mut(&mut self) -> &mut Record {
        // SAFETY: this RecordRef is the slot's only owner.
        unsafe { &mut *self.pool.slots[self.id.index()].0.get() }
    }
}

impl Drop for RecordRef<'_> {
    fn drop(&mut self) {
        self.pool.push_free(self.id);
    }
}

impl fmt::Debug for RecordRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef")
            .field("slot", &self.slot())
            .field("record", &**self)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::severity::Severity;

    fn assert_conserved(pool: &Pool) {
        let stats = pool.stats();
        assert_eq!(stats.free + stats.queued + stats.in_flight, stats.capacity);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            Pool::new(0),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(Pool::new(MAX_CAPACITY + 1).is_err());
    }

    #[test]
    fn test_claim_until_exhausted() {
        let pool = Pool::new(4).unwrap();
        let held: Vec<_> = (0..4).map(|_| pool.claim().expect("free slot")).collect();

        assert!(pool.claim().is_none());
        assert_eq!(pool.stats().in_flight, 4);
        assert_eq!(pool.stats().free, 0);

        drop(held);
        assert_eq!(pool.stats().free, 4);
    }

    #[test]
    fn test_claimed_slots_are_distinct() {
        let pool = Pool::new(8).unwrap();
        let held: Vec<_> = (0..8).map(|_| pool.claim().unwrap()).collect();
        let mut slots: Vec<usize> = held.iter().map(|r| r.slot()).collect();
        slots.sort_unstable();
        assert_eq!(slots, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_publish_next_is_fifo() {
        let pool = Pool::new(8).unwrap();
        for code in 0..5u32 {
            let mut record = pool.claim().unwrap();
            record.set_code(code);
            pool.publish(record);
            assert_conserved(&pool);
        }

        assert_eq!(pool.stats().queued, 5);
        for code in 0..5u32 {
            let record = pool.next().expect("queued record");
            assert_eq!(record.code(), code);
            pool.release(record);
            assert_conserved(&pool);
        }
        assert!(pool.next().is_none());
        assert_eq!(pool.stats().free, 8);
    }

    #[test]
    fn test_queue_refills_after_draining() {
        let pool = Pool::new(2).unwrap();
        for round in 0..10u32 {
            let mut a = pool.claim().unwrap();
            a.set_code(round * 2);
            let mut b = pool.claim().unwrap();
            b.set_code(round * 2 + 1);
            pool.publish(a);
            pool.publish(b);

            let first = pool.next().unwrap();
            assert_eq!(first.code(), round * 2);
            pool.release(first);

            let second = pool.next().unwrap();
            assert_eq!(second.code(), round * 2 + 1);
            pool.release(second);
        }
        assert_eq!(pool.stats().free, 2);
    }

    #[test]
    fn test_claim_resets_stale_content() {
        let pool = Pool::new(1).unwrap();
        let mut record = pool.claim().unwrap();
        record.set_code(9);
        record.set_severity(Severity::Emergency);
        record.set_string(1, "stale");
        pool.publish(record);
        let record = pool.next().unwrap();
        pool.release(record);

        let record = pool.claim().unwrap();
        assert_eq!(record.code(), 0);
        assert_eq!(record.severity(), Severity::Info);
        assert!(!record.param(1).unwrap().is_set());
    }

    #[test]
    fn test_dropped_ref_returns_to_free_list() {
        let pool = Pool::new(3).unwrap();
        {
            let _record = pool.claim().unwrap();
            assert_eq!(pool.stats().in_flight, 1);
        }
        assert_eq!(pool.stats().free, 3);

        let record = pool.claim().unwrap();
        pool.publish(record);
        drop(pool.next());
        assert_eq!(pool.stats().free, 3);
    }

    #[test]
    #[should_panic(expected = "belongs to a different pool")]
    fn test_foreign_record_rejected() {
        let a = Pool::new(1).unwrap();
        let b = Pool::new(1).unwrap();
        let record = a.claim().unwrap();
        b.publish(record);
    }
}
