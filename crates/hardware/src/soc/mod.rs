//! Backing-store side of the simulated machine.
//!
//! This module organizes the components below the translation path: the
//! DRAM and disk stores, their latency models, the access log, and the
//! `System` that ties them to the logical clock.

/// System construction and the `System` type.
pub mod builder;

/// DRAM and disk stores, latency controllers, and the access log.
pub mod memory;

pub use builder::System;
