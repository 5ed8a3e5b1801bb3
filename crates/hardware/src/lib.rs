//! Virtual memory hierarchy simulator library.
//!
//! This crate models the address-translation path of a virtual-memory machine with the following:
//! 1. **Clock:** A logical nanosecond counter advanced by fixed per-operation latencies.
//! 2. **TLB:** Two fully associative LRU levels with an L1 → L2 → DRAM write-back chain.
//! 3. **Page Table:** Single-level table with fault handling, eviction, and swap to disk.
//! 4. **Backing Stores:** DRAM and disk accessors that charge latency and log each access.
//! 5. **Simulation:** Configuration, trace replay, and statistics collection.

/// Common types and constants (addresses, access types, errors).
pub mod common;
/// Simulator configuration (defaults, hierarchical config structures, validation).
pub mod config;
/// Translation core (clock, MMU, TLBs, page table).
pub mod core;
/// Simulation context and trace replay.
pub mod sim;
/// Backing stores (DRAM, disk, access log).
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Simulation context; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Counter snapshot returned by `Simulator::stats`.
pub use crate::stats::SimStats;
