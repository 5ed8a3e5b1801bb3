//! Common utilities and types used throughout the memory hierarchy simulator.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the simulator. It includes:
//! 1. **Address Types:** Strong types for virtual, DRAM and disk addresses.
//! 2. **Constants:** Reserved frames, generator seeds, and geometry limits.
//! 3. **Memory Access:** Definitions for categorizing memory operations (Read/Write).
//! 4. **Error Handling:** Configuration and trace error types.

/// Address type definitions (virtual and physical addresses).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types for configuration and trace loading.
pub mod error;

pub use addr::{PhysAddr, VirtAddr};
pub use constants::PAGE_TABLE_FRAME;
pub use data::AccessType;
pub use error::{ConfigError, TraceError};
