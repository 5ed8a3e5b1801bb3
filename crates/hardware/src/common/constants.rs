//! Global System Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Reserved Storage:** The DRAM frame holding the page table itself.
//! 2. **Swap Constants:** Seed of the deterministic disk page generator.
//! 3. **Geometry Limits:** Upper bounds accepted by configuration validation.

/// DRAM frame reserved for the page table's own simulated storage.
///
/// Never handed out to a user page. Every page-table read or write is charged
/// as a direct, uncached DRAM access at this frame's base address.
pub const PAGE_TABLE_FRAME: u64 = 0;

/// High 32 bits of every generated disk page address.
pub const DISK_PAGE_BASE: u64 = 0xCAFE_BABE;

/// Widest address space the simulator models.
pub const MAX_ADDRESS_BITS: u32 = u64::BITS;

/// Largest page-count exponent for which an arena (page table, frame table) is allocated.
///
/// The page table keeps a 16-byte entry and a 16-byte swap slot per page, so
/// 2^24 pages already take 512 MiB of host memory.
pub const MAX_ARENA_BITS: u32 = 24;
