//! TLB Hierarchy Tests.
//!
//! Refills, the L1 → L2 → DRAM write-back chain, and shootdown latency.

use pretty_assertions::assert_eq;
use vmsim_core::common::AccessType;
use vmsim_core::config::Config;
use vmsim_core::core::units::mmu::TlbHierarchy;
use vmsim_core::core::units::mmu::page_table::TlbShootdown;
use vmsim_core::soc::System;
use vmsim_core::soc::memory::log::{AccessRecorder, Store};

use crate::common::harness::{single_entry_tlbs, small_config};

fn setup(config: &Config) -> (TlbHierarchy, System, AccessRecorder) {
    let layout = config.validate().unwrap();
    let log = AccessRecorder::new();
    let mut system = System::new(config, &layout);
    system.set_sink(Box::new(log.clone()));
    (TlbHierarchy::new(config, &layout), system, log)
}

// ══════════════════════════════════════════════════════════
// 1. Refills
// ══════════════════════════════════════════════════════════

#[test]
fn refill_l1_stamps_now_and_direction() {
    let (mut tlbs, mut system, log) = setup(&small_config());
    system.advance(42);
    tlbs.refill_l1(3, 1, AccessType::Write, &mut system);
    let entry = tlbs.l1.probe(3).unwrap();
    assert_eq!(entry.frame, 1);
    assert_eq!(entry.last_access, 42);
    assert!(entry.dirty);
    assert!(log.is_empty());
    assert_eq!(system.now(), 42);
}

#[test]
fn refills_do_not_touch_counters() {
    let (mut tlbs, mut system, _log) = setup(&small_config());
    tlbs.refill_l2(1, 1, AccessType::Read, &mut system);
    tlbs.refill_l1(1, 1, AccessType::Read, &mut system);
    assert_eq!(tlbs.l1.counters().hits + tlbs.l1.counters().misses, 0);
    assert_eq!(tlbs.l2.counters().hits + tlbs.l2.counters().misses, 0);
    assert!(tlbs.contains(1));
}

// ══════════════════════════════════════════════════════════
// 2. Write-back Chain
// ══════════════════════════════════════════════════════════

#[test]
fn dirty_l1_victim_moves_to_l2() {
    let (mut tlbs, mut system, log) = setup(&single_entry_tlbs());
    tlbs.refill_l1(0, 1, AccessType::Write, &mut system);
    tlbs.refill_l1(1, 2, AccessType::Read, &mut system);

    assert_eq!(tlbs.l1.slot(0).vpn, 1);
    let pushed = tlbs.l2.probe(0).unwrap();
    assert!(pushed.dirty);
    assert_eq!(pushed.frame, 1);
    // Moving between levels costs nothing and reaches no store.
    assert!(log.is_empty());
    assert_eq!(system.now(), 0);
}

#[test]
fn dirty_l1_victim_updates_existing_l2_entry() {
    let (mut tlbs, mut system, _log) = setup(&small_config());
    tlbs.refill_l2(0, 1, AccessType::Read, &mut system);
    tlbs.refill_l1(0, 1, AccessType::Write, &mut system);
    system.advance(5);
    tlbs.refill_l1(1, 2, AccessType::Read, &mut system);
    system.advance(5);
    // L1 is full; vpn 0 is its LRU entry.
    tlbs.refill_l1(2, 3, AccessType::Read, &mut system);

    assert_eq!(tlbs.l2.occupancy(), 1);
    let merged = tlbs.l2.probe(0).unwrap();
    assert!(merged.dirty);
    assert_eq!(merged.last_access, 10);
}

#[test]
fn clean_l1_victim_is_dropped() {
    let (mut tlbs, mut system, _log) = setup(&single_entry_tlbs());
    tlbs.refill_l1(0, 1, AccessType::Read, &mut system);
    tlbs.refill_l1(1, 2, AccessType::Read, &mut system);
    assert_eq!(tlbs.l2.occupancy(), 0);
}

#[test]
fn dirty_l2_victim_is_written_to_its_frame() {
    let (mut tlbs, mut system, log) = setup(&single_entry_tlbs());
    tlbs.refill_l2(0, 3, AccessType::Write, &mut system);
    tlbs.refill_l2(1, 2, AccessType::Read, &mut system);

    let events = log.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].store, Store::Dram);
    assert_eq!(events[0].op, AccessType::Write);
    assert_eq!(events[0].addr.val(), 0x3000);
    assert_eq!(system.now(), 100);
    assert_eq!(system.dram_counters().writes, 1);
    assert!(!tlbs.l2.probe(1).unwrap().dirty);
}

#[test]
fn chained_write_back_reaches_dram() {
    let (mut tlbs, mut system, log) = setup(&single_entry_tlbs());
    // L2 holds a dirty vpn 5; L1 holds a dirty vpn 6.
    tlbs.refill_l2(5, 1, AccessType::Write, &mut system);
    tlbs.refill_l1(6, 2, AccessType::Write, &mut system);
    // Evicting vpn 6 from L1 displaces vpn 5 from L2.
    tlbs.refill_l1(7, 3, AccessType::Read, &mut system);

    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].addr.val(), 0x1000);
    assert!(tlbs.l2.probe(6).unwrap().dirty);
    assert_eq!(tlbs.l1.slot(0).vpn, 7);
}

// ══════════════════════════════════════════════════════════
// 3. Shootdown
// ══════════════════════════════════════════════════════════

#[test]
fn invalidate_purges_both_levels() {
    let (mut tlbs, mut system, _log) = setup(&small_config());
    tlbs.refill_l2(4, 1, AccessType::Write, &mut system);
    tlbs.refill_l1(4, 1, AccessType::Write, &mut system);
    tlbs.invalidate(4, &mut system);
    assert!(!tlbs.contains(4));
    assert_eq!(tlbs.l1.counters().invalidations, 1);
    assert_eq!(tlbs.l2.counters().invalidations, 1);
}

#[test]
fn shootdown_charges_both_latencies_even_when_absent() {
    let (mut tlbs, mut system, log) = setup(&small_config());
    tlbs.shootdown(9, &mut system);
    assert_eq!(system.now(), 1 + 2);
    assert_eq!(tlbs.l1.counters().invalidations, 0);
    assert_eq!(tlbs.l2.counters().invalidations, 0);
    // Purged dirty state never reaches DRAM.
    assert!(log.is_empty());
}
