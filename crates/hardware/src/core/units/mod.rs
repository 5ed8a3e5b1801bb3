//! Functional units.
//!
//! This module contains the memory management unit: the two TLB levels, the
//! page table, frame allocation, and swap bookkeeping.

/// Memory Management Unit with TLB hierarchy and page table.
pub mod mmu;
