//! Construction of the top-level `System` type.
//!
//! This module assembles the backing-store side of the machine from configuration. It performs:
//! 1. **Clock setup:** Starts the logical clock at zero.
//! 2. **Store registration:** Creates the DRAM and disk stores with their width masks.
//! 3. **Memory controllers:** One fixed-latency controller per store.
//! 4. **Access logging:** Routes every access event to the installed sink.

use crate::common::{AccessType, PhysAddr};
use crate::config::{AddressLayout, Config};
use crate::core::clock::{Clock, Nanos};
use crate::soc::memory::controller::SimpleController;
use crate::soc::memory::log::{AccessSink, Discard, Store};
use crate::soc::memory::{BackingStore, StoreCounters};

/// Logical clock plus the two backing stores and the access sink.
///
/// Every latency in the simulation is charged through this type, either by
/// a store access or by [`System::advance`] for TLB lookups.
pub struct System {
    clock: Clock,
    dram: BackingStore,
    disk: BackingStore,
    sink: Box<dyn AccessSink>,
}

impl std::fmt::Debug for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("System")
            .field("clock", &self.clock)
            .field("dram", &self.dram)
            .field("disk", &self.disk)
            .finish_non_exhaustive()
    }
}

impl System {
    /// Builds a system from configuration and its validated layout.
    ///
    /// The access sink starts as [`Discard`]; install another with
    /// [`System::set_sink`].
    ///
    /// # Arguments
    ///
    /// * `config` - Simulator configuration (latencies).
    /// * `layout` - Validated address layout (store widths).
    pub fn new(config: &Config, layout: &AddressLayout) -> Self {
        Self {
            clock: Clock::new(),
            dram: BackingStore::new(
                Store::Dram,
                layout.dram_mask(),
                Box::new(SimpleController::new(config.latency.dram)),
            ),
            disk: BackingStore::new(
                Store::Disk,
                layout.disk_mask(),
                Box::new(SimpleController::new(config.latency.disk)),
            ),
            sink: Box::new(Discard),
        }
    }

    /// Replaces the access sink.
    pub fn set_sink(&mut self, sink: Box<dyn AccessSink>) {
        self.sink = sink;
    }

    /// Current logical time.
    #[inline(always)]
    pub const fn now(&self) -> Nanos {
        self.clock.now()
    }

    /// Charges `dt` of logical time.
    #[inline(always)]
    pub const fn advance(&mut self, dt: Nanos) {
        self.clock.advance(dt);
    }

    /// Read-only view of the clock.
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Performs one DRAM access: logs it, then charges the DRAM latency.
    pub fn dram_access(&mut self, addr: PhysAddr, op: AccessType) {
        let (event, latency) = self.dram.access(addr, op, self.clock.now());
        self.sink.record(&event);
        self.clock.advance(latency);
    }

    /// Performs one disk access: logs it, then charges the disk latency.
    pub fn disk_access(&mut self, addr: PhysAddr, op: AccessType) {
        let (event, latency) = self.disk.access(addr, op, self.clock.now());
        self.sink.record(&event);
        self.clock.advance(latency);
    }

    /// Logs an access without counting or charging it.
    ///
    /// Used for the data access that completes each instruction once its
    /// translation is known.
    pub fn log_access(&mut self, store: Store, addr: PhysAddr, op: AccessType) {
        let now = self.clock.now();
        let event = match store {
            Store::Dram => self.dram.event(addr, op, now),
            Store::Disk => self.disk.event(addr, op, now),
        };
        self.sink.record(&event);
    }

    /// DRAM access counts.
    pub const fn dram_counters(&self) -> StoreCounters {
        self.dram.counters()
    }

    /// Disk access counts.
    pub const fn disk_counters(&self) -> StoreCounters {
        self.disk.counters()
    }
}
