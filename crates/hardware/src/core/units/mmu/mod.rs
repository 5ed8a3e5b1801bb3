//! Memory Management Unit (MMU).
//!
//! This module implements the translation path, responsible for
//! virtual-to-DRAM address translation. It composes two fully associative
//! TLB levels with a single-level page table:
//!
//! 1. **L1 lookup:** a hit returns immediately.
//! 2. **L2 lookup:** a hit refills L1 from L2.
//! 3. **Page table walk:** resolves (and possibly faults in) the page, then
//!    refills L2 and L1.
//!
//! Dirty translations flow L1 → L2 → DRAM as slots are reused, and the page
//! table shoots down both levels whenever it evicts a page.

/// DRAM frame allocation table.
pub mod frames;

/// Single-level page table with fault handling and eviction.
pub mod page_table;

/// Per-page swap metadata and the disk page generator.
pub mod swap;

/// Translation Lookaside Buffer level with LRU replacement.
pub mod tlb;

use tracing::debug;

use crate::common::{AccessType, PhysAddr, VirtAddr};
use crate::config::{AddressLayout, Config};
use crate::soc::System;

use self::page_table::{PageTable, TlbShootdown};
use self::tlb::{Tlb, TlbEntry};

/// The two TLB levels and the write-back chain between them.
#[derive(Debug, Clone)]
pub struct TlbHierarchy {
    /// Small first level.
    pub l1: Tlb,
    /// Larger second level, victim cache for L1.
    pub l2: Tlb,
    page_bits: u32,
}

impl TlbHierarchy {
    /// Creates both levels from configuration.
    pub fn new(config: &Config, layout: &AddressLayout) -> Self {
        Self {
            l1: Tlb::new("L1", config.tlb.l1_entries, config.latency.tlb_l1),
            l2: Tlb::new("L2", config.tlb.l2_entries, config.latency.tlb_l2),
            page_bits: layout.page_bits(),
        }
    }

    /// Purges `vpn` from L1 then L2, charging each level's latency.
    pub fn invalidate(&mut self, vpn: u64, system: &mut System) {
        let _ = self.l1.invalidate(vpn);
        system.advance(self.l1.latency());
        let _ = self.l2.invalidate(vpn);
        system.advance(self.l2.latency());
    }

    /// Installs a translation in L1, pushing a dirty victim down to L2.
    pub fn refill_l1(&mut self, vpn: u64, frame: u64, op: AccessType, system: &mut System) {
        let idx = self.l1.victim();
        let victim = *self.l1.slot(idx);
        if victim.needs_write_back() {
            debug!(vpn = victim.vpn, frame = victim.frame, "TLB L1 write back to L2");
            self.write_back_to_l2(victim, system);
        }
        let _ = self.l1.install(idx, TlbEntry::filled(vpn, frame, op.is_write(), system.now()));
    }

    /// Installs a translation in L2, writing a dirty victim back to DRAM.
    pub fn refill_l2(&mut self, vpn: u64, frame: u64, op: AccessType, system: &mut System) {
        let idx = self.l2.victim();
        self.write_back_l2_slot(idx, system);
        let _ = self.l2.install(idx, TlbEntry::filled(vpn, frame, op.is_write(), system.now()));
    }

    /// Merges a dirty L1 victim into L2.
    ///
    /// An existing L2 entry for the same VPN is updated in place; otherwise
    /// the L1 victim takes an L2 slot chosen by the usual LRU rule.
    fn write_back_to_l2(&mut self, victim: TlbEntry, system: &mut System) {
        let now = system.now();
        if let Some(idx) = self.l2.find(victim.vpn) {
            let entry = self.l2.slot_mut(idx);
            entry.dirty = true;
            entry.last_access = now;
            return;
        }
        let idx = self.l2.victim();
        self.write_back_l2_slot(idx, system);
        let _ = self.l2.install(idx, TlbEntry::filled(victim.vpn, victim.frame, true, now));
    }

    /// Flushes L2 slot `idx` to DRAM if it holds a dirty translation.
    ///
    /// The write goes to the victim's own frame; no translation is redone.
    fn write_back_l2_slot(&self, idx: usize, system: &mut System) {
        let victim = self.l2.slot(idx);
        if victim.needs_write_back() {
            debug!(vpn = victim.vpn, frame = victim.frame, "TLB L2 write back");
            let addr = PhysAddr::from_parts(victim.frame, 0, self.page_bits);
            system.dram_access(addr, AccessType::Write);
        }
    }

    /// Returns `true` if either level holds a valid entry for `vpn`.
    pub fn contains(&self, vpn: u64) -> bool {
        self.l1.probe(vpn).is_some() || self.l2.probe(vpn).is_some()
    }
}

impl TlbShootdown for TlbHierarchy {
    fn shootdown(&mut self, vpn: u64, system: &mut System) {
        self.invalidate(vpn, system);
    }
}

/// Memory Management Unit: both TLB levels in front of the page table.
#[derive(Debug, Clone)]
pub struct Mmu {
    /// L1 and L2 TLBs.
    pub tlbs: TlbHierarchy,
    /// Authoritative page table.
    pub page_table: PageTable,
    layout: AddressLayout,
}

impl Mmu {
    /// Creates an MMU with empty TLBs and no resident pages.
    ///
    /// # Arguments
    ///
    /// * `config` - TLB capacities and latencies.
    /// * `layout` - Validated address layout.
    pub fn new(config: &Config, layout: AddressLayout) -> Self {
        Self {
            tlbs: TlbHierarchy::new(config, &layout),
            page_table: PageTable::new(layout),
            layout,
        }
    }

    /// Translates a virtual address to a DRAM address.
    ///
    /// Each TLB level charges its latency once per lookup, hit or miss. A
    /// full miss walks the page table (possibly faulting and evicting) and
    /// refills L2 and then L1.
    ///
    /// # Arguments
    ///
    /// * `va` - Virtual address; bits above the virtual width are ignored.
    /// * `op` - Access direction; writes mark the translation dirty.
    /// * `system` - Clock and backing stores.
    ///
    /// # Returns
    ///
    /// The DRAM address of the accessed byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmsim_core::common::{AccessType, VirtAddr};
    /// use vmsim_core::config::Config;
    /// use vmsim_core::core::units::mmu::Mmu;
    /// use vmsim_core::soc::System;
    ///
    /// let config = Config::default();
    /// let layout = config.validate().unwrap();
    /// let mut system = System::new(&config, &layout);
    /// let mut mmu = Mmu::new(&config, layout);
    ///
    /// // First touch faults the page into frame 1.
    /// let pa = mmu.translate(VirtAddr::new(0x2345), AccessType::Read, &mut system);
    /// assert_eq!(pa.val(), 0x1345);
    /// assert_eq!(mmu.page_table.page_faults(), 1);
    ///
    /// // The second access hits in L1.
    /// let _ = mmu.translate(VirtAddr::new(0x2000), AccessType::Read, &mut system);
    /// assert_eq!(mmu.tlbs.l1.counters().hits, 1);
    /// ```
    pub fn translate(&mut self, va: VirtAddr, op: AccessType, system: &mut System) -> PhysAddr {
        let (vpn, offset) = self.layout.split(va);

        let hit = self.tlbs.l1.lookup(vpn, op, system.now());
        if let Some(entry) = hit {
            system.advance(self.tlbs.l1.latency());
            if op.is_write() {
                self.page_table.mark_dirty(vpn);
            }
            return self.layout.compose(entry.frame, offset);
        }
        system.advance(self.tlbs.l1.latency());

        let hit = self.tlbs.l2.lookup(vpn, op, system.now());
        if let Some(entry) = hit {
            if op.is_write() {
                self.page_table.mark_dirty(vpn);
            }
            self.tlbs.refill_l1(vpn, entry.frame, op, system);
            system.advance(self.tlbs.l2.latency());
            return self.layout.compose(entry.frame, offset);
        }
        system.advance(self.tlbs.l2.latency());

        let pa = self.page_table.translate(va, op, system, &mut self.tlbs);
        let frame = pa.frame(self.layout.page_bits());
        self.tlbs.refill_l2(vpn, frame, op, system);
        self.tlbs.refill_l1(vpn, frame, op, system);
        pa
    }

    /// Purges `vpn` from both TLB levels.
    pub fn invalidate(&mut self, vpn: u64, system: &mut System) {
        self.tlbs.invalidate(vpn, system);
    }

    /// Address layout in use.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }
}
