//! Single-level page table with fault handling and swap.
//!
//! This module holds the authoritative VPN → DRAM frame map. It provides:
//! 1. **Translation:** A resident entry costs one DRAM read of the page table.
//! 2. **Fault Handling:** First touch (or a touch after eviction) allocates a
//!    frame, writes the new entry, and swaps the page back in if needed.
//! 3. **Eviction:** When DRAM is full, the lowest-numbered resident page is
//!    evicted; dirty pages are written to disk first.
//! 4. **Coherence:** Every eviction shoots the page down in both TLB levels
//!    before the frame is reused.
//!
//! The table itself lives in DRAM frame 0. Accesses to it are charged as
//! direct DRAM accesses and never go through the TLB.

use tracing::debug;

use crate::common::{AccessType, PAGE_TABLE_FRAME, PhysAddr, VirtAddr};
use crate::config::AddressLayout;
use crate::core::units::mmu::frames::FrameTable;
use crate::core::units::mmu::swap::{SwapSlot, SwapSpace};
use crate::soc::System;

/// Receiver of page-table eviction notices.
///
/// Implemented by the TLB hierarchy so that no cached translation outlives
/// the mapping it was copied from.
pub trait TlbShootdown {
    /// Purges every cached translation of `vpn`.
    fn shootdown(&mut self, vpn: u64, system: &mut System);
}

/// One page table entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    /// DRAM frame holding the page; meaningful only while `valid`.
    pub frame: u64,
    /// The page is resident in DRAM.
    pub valid: bool,
    /// The page was written since it was loaded.
    pub dirty: bool,
}

/// Fault, eviction, and swap traffic counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PagingCounters {
    /// Page faults handled.
    pub faults: u64,
    /// Resident pages evicted to make room.
    pub evictions: u64,
    /// Dirty pages written to disk on eviction.
    pub swap_outs: u64,
    /// Pages read back from disk on fault.
    pub swap_ins: u64,
}

/// Page table, frame allocator, and swap metadata.
#[derive(Debug, Clone)]
pub struct PageTable {
    layout: AddressLayout,
    entries: Vec<PageTableEntry>,
    frames: FrameTable,
    swap: SwapSpace,
    counters: PagingCounters,
}

impl PageTable {
    /// Creates an empty page table: no page resident, DRAM free except frame 0.
    pub fn new(layout: AddressLayout) -> Self {
        let pages = layout.total_pages() as usize;
        Self {
            layout,
            entries: vec![PageTableEntry::default(); pages],
            frames: FrameTable::new(layout.dram_frames() as usize),
            swap: SwapSpace::new(pages, layout.page_bits(), layout.disk_mask()),
            counters: PagingCounters::default(),
        }
    }

    /// DRAM address of the page table's own storage.
    #[inline(always)]
    fn table_addr(&self) -> PhysAddr {
        self.layout.compose(PAGE_TABLE_FRAME, 0)
    }

    /// Translates a virtual address, faulting the page in if needed.
    ///
    /// A resident page costs one DRAM read of the table. A write marks the
    /// entry dirty whether or not the access faulted.
    ///
    /// # Arguments
    ///
    /// * `va` - Virtual address; bits above the virtual width are ignored.
    /// * `op` - Access direction.
    /// * `system` - Clock and backing stores.
    /// * `tlbs` - Notified of every eviction.
    ///
    /// # Panics
    ///
    /// Panics if the address decomposes outside the page table or page size.
    /// Both indicate a defect in the layout arithmetic, not bad input.
    pub fn translate<S>(
        &mut self,
        va: VirtAddr,
        op: AccessType,
        system: &mut System,
        tlbs: &mut S,
    ) -> PhysAddr
    where
        S: TlbShootdown + ?Sized,
    {
        let (vpn, offset) = self.layout.split(va);
        assert!(
            vpn < self.layout.total_pages(),
            "page index {vpn:#x} out of bounds"
        );
        assert!(
            offset < self.layout.page_size(),
            "page offset {offset:#x} out of bounds"
        );

        if self.entries[vpn as usize].valid {
            system.dram_access(self.table_addr(), AccessType::Read);
        } else {
            self.handle_fault(vpn, system, tlbs);
        }

        let entry = &mut self.entries[vpn as usize];
        if op.is_write() {
            entry.dirty = true;
        }

        let pa = self.layout.compose(entry.frame, offset);
        tracing::trace!(va = %va, vpn, pa = %pa, "page table translation");
        pa
    }

    /// Brings `vpn` into DRAM.
    fn handle_fault<S>(&mut self, vpn: u64, system: &mut System, tlbs: &mut S)
    where
        S: TlbShootdown + ?Sized,
    {
        debug!(vpn, "page fault");
        self.counters.faults += 1;

        let frame = match self.frames.allocate() {
            Some(frame) => frame,
            None => {
                let freed = self.evict(system, tlbs);
                self.frames.claim(freed)
            }
        };

        self.entries[vpn as usize] = PageTableEntry {
            frame,
            valid: true,
            dirty: false,
        };
        system.dram_access(self.table_addr(), AccessType::Write);

        if let Some(disk_page) = self.swap.swap_in(vpn) {
            debug!(vpn, disk_page, "page is swapped, loading from disk");
            self.counters.swap_ins += 1;
            system.disk_access(self.layout.compose(disk_page, 0), AccessType::Read);
            system.dram_access(self.layout.compose(frame, 0), AccessType::Write);
        }
    }

    /// Evicts the lowest-numbered resident page and frees its frame.
    ///
    /// # Returns
    ///
    /// The freed frame.
    ///
    /// # Panics
    ///
    /// Panics if no page is resident, which cannot happen while DRAM is full.
    fn evict<S>(&mut self, system: &mut System, tlbs: &mut S) -> u64
    where
        S: TlbShootdown + ?Sized,
    {
        self.counters.evictions += 1;

        let Some(victim) = self.entries.iter().position(|e| e.valid) else {
            panic!("DRAM is full but no page is resident");
        };
        let vpn = victim as u64;
        let entry = self.entries[victim];

        if entry.dirty {
            let disk_page = self.swap.allocate_page();
            debug!(vpn, frame = entry.frame, disk_page, "evicting dirty page to disk");
            self.swap.swap_out(vpn, disk_page);
            self.counters.swap_outs += 1;
            system.disk_access(self.layout.compose(disk_page, 0), AccessType::Write);
        } else {
            debug!(vpn, frame = entry.frame, "evicting clean page");
        }

        self.entries[victim] = PageTableEntry::default();
        self.frames.release(entry.frame);

        tlbs.shootdown(vpn, system);
        system.dram_access(self.table_addr(), AccessType::Read);

        entry.frame
    }

    /// Marks a resident page dirty without any memory traffic.
    ///
    /// Called when a write hits in the TLB, so the table learns about the
    /// modification before the page can be chosen for eviction.
    ///
    /// # Panics
    ///
    /// Panics if `vpn` is out of range. A non-resident `vpn` would mean a TLB
    /// entry outlived its mapping and is caught by a debug assertion.
    pub fn mark_dirty(&mut self, vpn: u64) {
        let entry = &mut self.entries[vpn as usize];
        debug_assert!(entry.valid, "TLB hit for non-resident page {vpn:#x}");
        entry.dirty = true;
    }

    /// Entry of `vpn`.
    ///
    /// # Panics
    ///
    /// Panics if `vpn` is outside the virtual page range.
    pub fn entry(&self, vpn: u64) -> &PageTableEntry {
        &self.entries[vpn as usize]
    }

    /// Swap metadata of `vpn`.
    ///
    /// # Panics
    ///
    /// Panics if `vpn` is outside the virtual page range.
    pub fn swap_slot(&self, vpn: u64) -> &SwapSlot {
        self.swap.slot(vpn)
    }

    /// DRAM frame occupancy.
    pub const fn frames(&self) -> &FrameTable {
        &self.frames
    }

    /// Total page faults handled.
    pub const fn page_faults(&self) -> u64 {
        self.counters.faults
    }

    /// Total pages evicted.
    pub const fn page_evictions(&self) -> u64 {
        self.counters.evictions
    }

    /// All paging counters.
    pub const fn counters(&self) -> PagingCounters {
        self.counters
    }

    /// Address layout the table was built for.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }
}
