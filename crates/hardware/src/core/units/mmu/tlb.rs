//! Translation Lookaside Buffer (TLB) level.
//!
//! A fully associative cache of recent translations. It stores the mapping
//! between Virtual Page Numbers (VPN) and DRAM frame numbers, along with a
//! dirty bit and the logical time of the last access for true LRU
//! replacement.
//!
//! A level only manages its own slots and counters. Charging lookup latency
//! and moving dirty victims to the next tier is the job of the
//! `TlbHierarchy` that owns both levels.

use crate::common::AccessType;
use crate::core::clock::Nanos;

/// A single entry in a TLB level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TlbEntry {
    /// Entry validity flag.
    pub valid: bool,
    /// Set by writes; must reach the next tier before the slot is reused.
    pub dirty: bool,
    /// Logical time of the last hit or refill.
    pub last_access: Nanos,
    /// Virtual Page Number (Tag).
    pub vpn: u64,
    /// DRAM frame number (Data).
    pub frame: u64,
}

impl TlbEntry {
    /// A valid entry created by a refill.
    pub const fn filled(vpn: u64, frame: u64, dirty: bool, now: Nanos) -> Self {
        Self {
            valid: true,
            dirty,
            last_access: now,
            vpn,
            frame,
        }
    }

    /// Returns `true` if replacing this entry requires a write-back.
    #[inline(always)]
    pub const fn needs_write_back(&self) -> bool {
        self.valid && self.dirty
    }
}

/// Hit, miss, and invalidation counts of one level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TlbCounters {
    /// Lookups that found a valid matching entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Valid entries purged by page-table evictions.
    pub invalidations: u64,
}

impl TlbCounters {
    /// Hit rate in percent, `0.0` before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            100.0 * self.hits as f64 / total as f64
        }
    }
}

/// One fully associative TLB level.
#[derive(Debug, Clone)]
pub struct Tlb {
    /// Level name used in logs (`L1`, `L2`).
    name: &'static str,
    /// Slot arena; its length is the fixed capacity.
    entries: Vec<TlbEntry>,
    /// Latency charged per lookup or invalidation.
    latency: Nanos,
    counters: TlbCounters,
}

impl Tlb {
    /// Creates an empty TLB level.
    ///
    /// # Arguments
    ///
    /// * `name` - Level name for logging.
    /// * `capacity` - Number of entries; validated non-zero by configuration.
    /// * `latency` - Fixed cost of one lookup.
    pub fn new(name: &'static str, capacity: usize, latency: Nanos) -> Self {
        Self {
            name,
            entries: vec![TlbEntry::default(); capacity],
            latency,
            counters: TlbCounters::default(),
        }
    }

    /// Level name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Fixed cost of one lookup or invalidation.
    pub const fn latency(&self) -> Nanos {
        self.latency
    }

    /// Hit, miss, and invalidation counts.
    pub const fn counters(&self) -> TlbCounters {
        self.counters
    }

    /// All slots, valid or not.
    pub fn entries(&self) -> &[TlbEntry] {
        &self.entries
    }

    /// Index of the valid entry for `vpn`, if any.
    pub fn find(&self, vpn: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.valid && e.vpn == vpn)
    }

    /// Valid entry for `vpn`, without touching counters or timestamps.
    pub fn probe(&self, vpn: u64) -> Option<&TlbEntry> {
        self.find(vpn).map(|i| &self.entries[i])
    }

    /// Looks up a VPN and counts the outcome.
    ///
    /// On a hit the entry's `last_access` becomes `now` and a write marks it
    /// dirty. Latency is not charged here.
    ///
    /// # Returns
    ///
    /// A copy of the updated entry on a hit, otherwise `None`.
    pub fn lookup(&mut self, vpn: u64, op: AccessType, now: Nanos) -> Option<TlbEntry> {
        let Some(idx) = self.find(vpn) else {
            self.counters.misses += 1;
            return None;
        };
        self.counters.hits += 1;
        let entry = &mut self.entries[idx];
        entry.last_access = now;
        if op.is_write() {
            entry.dirty = true;
        }
        Some(*entry)
    }

    /// Chooses the slot a refill should use.
    ///
    /// The first invalid slot wins. With every slot valid, the entry with the
    /// smallest `last_access` is chosen, ties going to the lowest index.
    pub fn victim(&self) -> usize {
        let mut lru = 0;
        for (i, entry) in self.entries.iter().enumerate() {
            if !entry.valid {
                return i;
            }
            if entry.last_access < self.entries[lru].last_access {
                lru = i;
            }
        }
        lru
    }

    /// Entry in slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not below the capacity.
    pub fn slot(&self, idx: usize) -> &TlbEntry {
        &self.entries[idx]
    }

    /// Mutable entry in slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not below the capacity.
    pub fn slot_mut(&mut self, idx: usize) -> &mut TlbEntry {
        &mut self.entries[idx]
    }

    /// Overwrites slot `idx` and returns its previous occupant.
    ///
    /// The caller must have written back a dirty occupant already.
    pub fn install(&mut self, idx: usize, entry: TlbEntry) -> TlbEntry {
        std::mem::replace(&mut self.entries[idx], entry)
    }

    /// Purges every valid entry for `vpn`.
    ///
    /// Dirty state of purged entries is dropped: the page table has already
    /// accounted for it when it chose to evict the page.
    ///
    /// # Returns
    ///
    /// `true` if an entry was purged.
    pub fn invalidate(&mut self, vpn: u64) -> bool {
        let mut purged = false;
        for entry in self.entries.iter_mut().filter(|e| e.valid && e.vpn == vpn) {
            entry.valid = false;
            entry.dirty = false;
            self.counters.invalidations += 1;
            purged = true;
        }
        purged
    }

    /// Number of valid entries.
    pub fn occupancy(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }
}
