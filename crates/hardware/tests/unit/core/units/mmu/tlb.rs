//! TLB Level Unit Tests.
//!
//! Verifies a single fully associative level:
//! - Lookup hit/miss accounting and the updates a hit performs
//! - LRU victim selection, including tie-breaking
//! - Invalidation and its counters

use vmsim_core::common::AccessType;
use vmsim_core::core::units::mmu::tlb::{Tlb, TlbCounters, TlbEntry};

// ══════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════

/// A level whose slots hold `vpns` in order, refilled at times 10, 20, 30...
fn filled(vpns: &[u64]) -> Tlb {
    let mut tlb = Tlb::new("L1", vpns.len(), 1);
    for (i, &vpn) in vpns.iter().enumerate() {
        let _ = tlb.install(i, TlbEntry::filled(vpn, vpn + 100, false, 10 * (i as u64 + 1)));
    }
    tlb
}

// ══════════════════════════════════════════════════════════
// 1. Lookup
// ══════════════════════════════════════════════════════════

#[test]
fn lookup_miss_on_empty() {
    let mut tlb = Tlb::new("L1", 4, 1);
    assert_eq!(tlb.lookup(7, AccessType::Read, 0), None);
    assert_eq!(tlb.counters().misses, 1);
    assert_eq!(tlb.counters().hits, 0);
    assert_eq!(tlb.occupancy(), 0);
}

#[test]
fn lookup_hit_refreshes_timestamp() {
    let mut tlb = filled(&[1, 2]);
    let hit = tlb.lookup(1, AccessType::Read, 99).unwrap();
    assert_eq!(hit.frame, 101);
    assert_eq!(hit.last_access, 99);
    assert!(!hit.dirty);
    assert_eq!(tlb.probe(1).unwrap().last_access, 99);
    assert_eq!(tlb.counters().hits, 1);
}

#[test]
fn write_hit_sets_dirty() {
    let mut tlb = filled(&[1]);
    let hit = tlb.lookup(1, AccessType::Write, 50).unwrap();
    assert!(hit.dirty);
    assert!(tlb.slot(0).needs_write_back());
}

#[test]
fn read_hit_keeps_dirty() {
    let mut tlb = Tlb::new("L2", 1, 2);
    let _ = tlb.install(0, TlbEntry::filled(3, 4, true, 0));
    let hit = tlb.lookup(3, AccessType::Read, 1).unwrap();
    assert!(hit.dirty);
}

#[test]
fn invalid_slot_never_matches() {
    let mut tlb = Tlb::new("L1", 2, 1);
    // Default slots carry vpn 0 but are invalid.
    assert_eq!(tlb.find(0), None);
    assert_eq!(tlb.lookup(0, AccessType::Read, 0), None);
}

// ══════════════════════════════════════════════════════════
// 2. Victim Selection
// ══════════════════════════════════════════════════════════

#[test]
fn victim_is_first_invalid_slot() {
    let mut tlb = Tlb::new("L1", 3, 1);
    assert_eq!(tlb.victim(), 0);
    let _ = tlb.install(0, TlbEntry::filled(9, 1, false, 0));
    assert_eq!(tlb.victim(), 1);
}

#[test]
fn victim_is_least_recently_used_when_full() {
    let mut tlb = filled(&[1, 2, 3]);
    assert_eq!(tlb.victim(), 0);
    let _ = tlb.lookup(1, AccessType::Read, 40);
    assert_eq!(tlb.victim(), 1);
    let _ = tlb.lookup(2, AccessType::Read, 41);
    assert_eq!(tlb.victim(), 2);
}

#[test]
fn install_returns_previous_occupant() {
    let mut tlb = filled(&[1]);
    let old = tlb.install(0, TlbEntry::filled(2, 5, true, 70));
    assert_eq!(old.vpn, 1);
    assert_eq!(tlb.slot(0).vpn, 2);
    assert!(tlb.slot(0).dirty);
}

// ══════════════════════════════════════════════════════════
// 3. Invalidation
// ══════════════════════════════════════════════════════════

#[test]
fn invalidate_purges_and_counts() {
    let mut tlb = filled(&[1, 2]);
    tlb.slot_mut(1).dirty = true;
    assert!(tlb.invalidate(2));
    assert_eq!(tlb.probe(2), None);
    assert!(!tlb.slot(1).valid);
    assert!(!tlb.slot(1).dirty);
    assert_eq!(tlb.counters().invalidations, 1);
    assert_eq!(tlb.occupancy(), 1);
}

#[test]
fn invalidate_absent_vpn_counts_nothing() {
    let mut tlb = filled(&[1, 2]);
    assert!(!tlb.invalidate(3));
    assert_eq!(tlb.counters().invalidations, 0);
    assert_eq!(tlb.occupancy(), 2);
}

#[test]
fn invalidated_slot_is_reused_first() {
    let mut tlb = filled(&[1, 2, 3]);
    let _ = tlb.invalidate(3);
    assert_eq!(tlb.victim(), 2);
}

// ══════════════════════════════════════════════════════════
// 4. Counters
// ══════════════════════════════════════════════════════════

#[test]
fn hit_rate_guards_zero_lookups() {
    assert!(TlbCounters::default().hit_rate().abs() < f64::EPSILON);
}

#[test]
fn hit_rate_is_a_percentage() {
    let counters = TlbCounters {
        hits: 3,
        misses: 1,
        invalidations: 0,
    };
    assert!((counters.hit_rate() - 75.0).abs() < 1e-9);
}

#[test]
fn accessors_reflect_construction() {
    let tlb = Tlb::new("L2", 512, 2);
    assert_eq!(tlb.name(), "L2");
    assert_eq!(tlb.capacity(), 512);
    assert_eq!(tlb.latency(), 2);
    assert_eq!(tlb.entries().len(), 512);
}
