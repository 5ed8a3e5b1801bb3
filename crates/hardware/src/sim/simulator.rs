//! Simulator: the explicit simulation context.
//!
//! Owns the clock and backing stores (`System`) side-by-side with the
//! translation path (`Mmu`), so every operation receives both through one
//! `&mut self` instead of reaching for shared global state.

use crate::common::{AccessType, ConfigError, PhysAddr, TraceError, VirtAddr};
use crate::config::{AddressLayout, Config};
use crate::core::clock::Nanos;
use crate::core::units::mmu::Mmu;
use crate::core::units::mmu::tlb::TlbCounters;
use crate::sim::trace::TraceOp;
use crate::soc::System;
use crate::soc::memory::log::{AccessSink, Store};
use crate::stats::SimStats;

/// Top-level simulator: backing stores + translation path.
#[derive(Debug)]
pub struct Simulator {
    /// Clock, DRAM, disk, and access log.
    pub system: System,
    /// TLB hierarchy and page table.
    pub mmu: Mmu,
    layout: AddressLayout,
    instructions: u64,
}

impl Simulator {
    /// Creates a simulator at time zero with nothing resident.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] produced by [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let layout = config.validate()?;
        Ok(Self {
            system: System::new(config, &layout),
            mmu: Mmu::new(config, layout),
            layout,
            instructions: 0,
        })
    }

    /// Creates a simulator whose access log goes to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] produced by [`Config::validate`].
    pub fn with_sink(config: &Config, sink: Box<dyn AccessSink>) -> Result<Self, ConfigError> {
        let mut sim = Self::new(config)?;
        sim.system.set_sink(sink);
        Ok(sim)
    }

    /// Performs one access: translate, then log the data access.
    ///
    /// The address is masked to the virtual width first. The final data
    /// access is logged but its latency is not charged.
    ///
    /// # Returns
    ///
    /// The DRAM address the access resolved to.
    pub fn access(&mut self, op: AccessType, va: VirtAddr) -> PhysAddr {
        let va = VirtAddr::new(va.val() & self.layout.virtual_mask());
        let pa = self.mmu.translate(va, op, &mut self.system);
        self.system.log_access(Store::Dram, pa, op);
        self.instructions += 1;
        pa
    }

    /// Reads from a virtual address.
    pub fn read(&mut self, va: VirtAddr) -> PhysAddr {
        self.access(AccessType::Read, va)
    }

    /// Writes to a virtual address.
    pub fn write(&mut self, va: VirtAddr) -> PhysAddr {
        self.access(AccessType::Write, va)
    }

    /// Executes one trace operation.
    pub fn execute(&mut self, op: TraceOp) -> PhysAddr {
        self.access(op.op, op.addr)
    }

    /// Replays a sequence of operations in order.
    ///
    /// # Returns
    ///
    /// Number of operations executed.
    pub fn run<I>(&mut self, ops: I) -> u64
    where
        I: IntoIterator<Item = TraceOp>,
    {
        let mut count = 0;
        for op in ops {
            let _ = self.execute(op);
            count += 1;
        }
        count
    }

    /// Replays a fallible stream of operations, stopping at the first error.
    ///
    /// Operations before the failing one stay executed.
    ///
    /// # Errors
    ///
    /// The first [`TraceError`] yielded by `ops`.
    pub fn run_trace<I>(&mut self, ops: I) -> Result<u64, TraceError>
    where
        I: IntoIterator<Item = Result<TraceOp, TraceError>>,
    {
        let mut count = 0;
        for op in ops {
            let _ = self.execute(op?);
            count += 1;
        }
        Ok(count)
    }

    /// Current logical time.
    pub const fn now(&self) -> Nanos {
        self.system.now()
    }

    /// Instructions executed so far.
    pub const fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Total page faults.
    pub const fn page_faults(&self) -> u64 {
        self.mmu.page_table.page_faults()
    }

    /// Total page evictions.
    pub const fn page_evictions(&self) -> u64 {
        self.mmu.page_table.page_evictions()
    }

    /// L1 TLB counters.
    pub const fn tlb_l1(&self) -> TlbCounters {
        self.mmu.tlbs.l1.counters()
    }

    /// L2 TLB counters.
    pub const fn tlb_l2(&self) -> TlbCounters {
        self.mmu.tlbs.l2.counters()
    }

    /// Validated address layout.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Snapshot of every counter.
    pub const fn stats(&self) -> SimStats {
        SimStats {
            elapsed_ns: self.system.now(),
            instructions: self.instructions,
            paging: self.mmu.page_table.counters(),
            tlb_l1: self.mmu.tlbs.l1.counters(),
            tlb_l2: self.mmu.tlbs.l2.counters(),
            dram: self.system.dram_counters(),
            disk: self.system.disk_counters(),
        }
    }
}
