//! Error definitions.
//!
//! This module defines the recoverable errors of the simulator. It provides:
//! 1. **Configuration Errors:** Rejected address geometries and TLB capacities.
//! 2. **Trace Errors:** Malformed or unreadable instruction files.
//!
//! Contract violations inside the translation path (an address that does not
//! decompose within the configured bounds) are not represented here: they
//! indicate a defect and abort the run through a panic.

use thiserror::Error;

/// Configuration rejected by `Config::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An address width is zero or wider than the simulator models.
    #[error("{space} address width must be between 1 and {max} bits, got {bits}")]
    WidthOutOfRange {
        /// Address space name (`virtual`, `DRAM`, `disk`).
        space: &'static str,
        /// Configured width.
        bits: u32,
        /// Largest accepted width.
        max: u32,
    },

    /// The page size is not strictly smaller than an address space.
    #[error("page size exponent {page_bits} must be smaller than the {space} address width ({bits})")]
    PageTooLarge {
        /// Configured page-size exponent.
        page_bits: u32,
        /// Address space name.
        space: &'static str,
        /// Width of that address space.
        bits: u32,
    },

    /// The page table or frame table would exceed the allocatable arena size.
    #[error("{arena} would hold 2^{bits} entries, the limit is 2^{max}")]
    ArenaTooLarge {
        /// Arena name.
        arena: &'static str,
        /// Entry-count exponent.
        bits: u32,
        /// Largest accepted exponent.
        max: u32,
    },

    /// A TLB level was configured with no entries.
    #[error("TLB {level} must hold at least one entry")]
    EmptyTlb {
        /// Level name (`L1`, `L2`).
        level: &'static str,
    },

    /// A configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Failure while reading an instruction trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line did not have the `<op> <hex address>` shape.
    #[error("line {line}: invalid instruction format: {text:?}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Offending line, trimmed.
        text: String,
    },

    /// The operation letter is neither `R` nor `W`.
    #[error("line {line}: unknown instruction: {op}")]
    UnknownOperation {
        /// 1-based line number.
        line: usize,
        /// Offending operation token.
        op: String,
    },

    /// The address field is not a hexadecimal number that fits in 64 bits.
    #[error("line {line}: invalid address {text:?}")]
    BadAddress {
        /// 1-based line number.
        line: usize,
        /// Offending address token.
        text: String,
    },

    /// The underlying reader failed.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}
