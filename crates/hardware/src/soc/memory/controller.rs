//! Memory controller implementations for latency modeling.
//!
//! This module provides:
//! 1. **MemoryController:** The latency seam each backing store charges through.
//! 2. **SimpleController:** Fixed latency per access, used for both DRAM and disk.
//!
//! DRAM and disk differ only in the latency their controller reports; the
//! disk latency is several orders of magnitude above DRAM by default.

use crate::core::clock::Nanos;

/// Trait for memory controller implementations that report access latency.
pub trait MemoryController: Send + Sync {
    /// Returns the logical time an access to `addr` takes.
    ///
    /// # Arguments
    ///
    /// * `addr` - Store address being accessed, already masked to the store width.
    fn access_latency(&mut self, addr: u64) -> Nanos;
}

/// Fixed-latency memory controller; every access takes the same time.
#[derive(Debug, Clone, Copy)]
pub struct SimpleController {
    latency: Nanos,
}

impl SimpleController {
    /// Creates a simple controller with the given fixed latency.
    ///
    /// # Arguments
    ///
    /// * `latency` - Nanoseconds per access.
    pub const fn new(latency: Nanos) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u64) -> Nanos {
        self.latency
    }
}
