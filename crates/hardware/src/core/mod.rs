//! Translation core.
//!
//! This module contains the logical clock and the functional units of the
//! translation path.

/// Monotonic logical clock.
pub mod clock;

/// Functional units (MMU with TLBs and page table).
pub mod units;

pub use self::clock::Clock;
