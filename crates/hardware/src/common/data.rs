//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the simulator.
//! These types are used for the following:
//! 1. **Dirty Tracking:** Writes set dirty bits in the TLB levels and the page table.
//! 2. **Access Logging:** Every backing-store access event carries its direction.
//! 3. **Trace Replay:** Instruction files name each operation as `R` or `W`.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AccessType {
    /// Data read access.
    Read,

    /// Data write access.
    ///
    /// Marks the touched translation dirty at every level it passes through.
    Write,
}

impl AccessType {
    /// Returns `true` for [`AccessType::Write`].
    #[inline(always)]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Single-letter mnemonic used by trace files and the access log.
    pub const fn mnemonic(self) -> char {
        match self {
            Self::Read => 'R',
            Self::Write => 'W',
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
