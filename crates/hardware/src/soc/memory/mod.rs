//! Simulated backing stores (DRAM and disk).
//!
//! This module implements the two slow tiers below the page table. It provides:
//! 1. **Controller:** Latency modeling for each store.
//! 2. **Log:** Access events and the sinks that consume them.
//! 3. **BackingStore:** Address masking plus per-direction access counters.
//!
//! No data is stored: an access only costs time and leaves a log entry.

/// Memory controller implementations for access latency modeling.
pub mod controller;

/// Access events and sinks.
pub mod log;

use self::controller::MemoryController;
use self::log::{AccessEvent, Store};
use crate::common::{AccessType, PhysAddr};
use crate::core::clock::Nanos;

/// Read/write counts of one backing store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StoreCounters {
    /// Accesses with [`AccessType::Read`].
    pub reads: u64,
    /// Accesses with [`AccessType::Write`].
    pub writes: u64,
}

impl StoreCounters {
    /// Reads plus writes.
    pub const fn total(&self) -> u64 {
        self.reads + self.writes
    }
}

/// One simulated store: a width mask, a latency model, and counters.
pub struct BackingStore {
    store: Store,
    mask: u64,
    controller: Box<dyn MemoryController>,
    counters: StoreCounters,
}

impl std::fmt::Debug for BackingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackingStore")
            .field("store", &self.store)
            .field("mask", &format_args!("{:#x}", self.mask))
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl BackingStore {
    /// Creates a store whose addresses are masked with `mask`.
    ///
    /// # Arguments
    ///
    /// * `store` - Which store this is; carried into every event.
    /// * `mask` - Address mask derived from the store width.
    /// * `controller` - Latency model.
    pub fn new(store: Store, mask: u64, controller: Box<dyn MemoryController>) -> Self {
        Self {
            store,
            mask,
            controller,
            counters: StoreCounters::default(),
        }
    }

    /// Describes an access at `now` without charging for it.
    pub const fn event(&self, addr: PhysAddr, op: AccessType, now: Nanos) -> AccessEvent {
        AccessEvent {
            time: now,
            store: self.store,
            op,
            addr: PhysAddr::new(addr.val() & self.mask),
        }
    }

    /// Performs an access: counts it and returns its event and latency.
    pub fn access(&mut self, addr: PhysAddr, op: AccessType, now: Nanos) -> (AccessEvent, Nanos) {
        let event = self.event(addr, op, now);
        match op {
            AccessType::Read => self.counters.reads += 1,
            AccessType::Write => self.counters.writes += 1,
        }
        let latency = self.controller.access_latency(event.addr.val());
        (event, latency)
    }

    /// Access counts so far.
    pub const fn counters(&self) -> StoreCounters {
        self.counters
    }
}
