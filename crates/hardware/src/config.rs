//! Configuration system for the memory hierarchy simulator.
//!
//! This module defines all configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline address widths, TLB capacities, and latencies.
//! 2. **Structures:** Hierarchical config for general, address, TLB, and latency settings.
//! 3. **Validation:** `Config::validate` turns a raw config into an `AddressLayout`
//!    of derived masks and capacities, rejecting impossible geometries.
//!
//! Configuration is supplied as JSON (`Config::from_json_str`) or use `Config::default()`.
//! It is fixed for the whole run.

use serde::{Deserialize, Serialize};

use crate::common::addr::low_mask;
use crate::common::constants::{MAX_ADDRESS_BITS, MAX_ARENA_BITS};
use crate::common::{ConfigError, PhysAddr, VirtAddr};

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden
/// in a JSON configuration document.
mod defaults {
    /// Virtual address width (4 GiB address space).
    pub const VIRTUAL_ADDRESS_BITS: u32 = 32;

    /// Page-size exponent (4 KiB pages).
    ///
    /// Must stay below every address width.
    pub const PAGE_SIZE_BITS: u32 = 12;

    /// DRAM address width (256 MiB, 65 536 frames).
    pub const DRAM_ADDRESS_BITS: u32 = 28;

    /// Disk address width (256 TiB).
    pub const DISK_ADDRESS_BITS: u32 = 48;

    /// First-level TLB entry count.
    pub const TLB_L1_ENTRIES: usize = 32;

    /// Second-level TLB entry count.
    pub const TLB_L2_ENTRIES: usize = 512;

    /// L1 TLB lookup latency in nanoseconds, charged on hit and miss alike.
    pub const TLB_L1_LATENCY: u64 = 1;

    /// L2 TLB lookup latency in nanoseconds, charged on hit and miss alike.
    pub const TLB_L2_LATENCY: u64 = 2;

    /// DRAM access latency in nanoseconds.
    pub const DRAM_LATENCY: u64 = 100;

    /// Disk access latency in nanoseconds.
    pub const DISK_LATENCY: u64 = 1_000_000;
}

/// Root configuration structure containing all simulator settings.
///
/// Every section and field is optional in JSON; missing values fall back to
/// the defaults.
///
/// # Examples
///
/// ```
/// use vmsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.address.page_size_bits, 12);
/// assert_eq!(config.tlb.l1_entries, 32);
///
/// let config = Config::from_json_str(r#"{ "tlb": { "l1_entries": 4 } }"#).unwrap();
/// assert_eq!(config.tlb.l1_entries, 4);
/// assert_eq!(config.tlb.l2_entries, 512);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General simulation settings.
    pub general: GeneralConfig,
    /// Address space geometry.
    pub address: AddressConfig,
    /// TLB capacities.
    pub tlb: TlbConfig,
    /// Fixed per-operation latencies.
    pub latency: LatencyConfig,
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not valid JSON or
    /// a field has the wrong type. Geometry is not checked here; call
    /// [`Config::validate`] for that.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the configuration and derives the address layout.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::WidthOutOfRange`] - an address width is 0 or above 64.
    /// * [`ConfigError::PageTooLarge`] - the page exponent is not strictly below a width.
    /// * [`ConfigError::ArenaTooLarge`] - the page table or frame table would exceed 2^24 entries.
    /// * [`ConfigError::EmptyTlb`] - a TLB level has no entries.
    pub fn validate(&self) -> Result<AddressLayout, ConfigError> {
        let a = &self.address;
        let spaces = [
            ("virtual", a.virtual_address_bits),
            ("DRAM", a.dram_address_bits),
            ("disk", a.disk_address_bits),
        ];
        for (space, bits) in spaces {
            if bits == 0 || bits > MAX_ADDRESS_BITS {
                return Err(ConfigError::WidthOutOfRange {
                    space,
                    bits,
                    max: MAX_ADDRESS_BITS,
                });
            }
            if a.page_size_bits >= bits {
                return Err(ConfigError::PageTooLarge {
                    page_bits: a.page_size_bits,
                    space,
                    bits,
                });
            }
        }

        let arenas = [
            ("page table", a.virtual_address_bits - a.page_size_bits),
            ("DRAM frame table", a.dram_address_bits - a.page_size_bits),
        ];
        for (arena, bits) in arenas {
            if bits > MAX_ARENA_BITS {
                return Err(ConfigError::ArenaTooLarge {
                    arena,
                    bits,
                    max: MAX_ARENA_BITS,
                });
            }
        }

        if self.tlb.l1_entries == 0 {
            return Err(ConfigError::EmptyTlb { level: "L1" });
        }
        if self.tlb.l2_entries == 0 {
            return Err(ConfigError::EmptyTlb { level: "L2" });
        }

        Ok(AddressLayout {
            virtual_bits: a.virtual_address_bits,
            page_bits: a.page_size_bits,
            dram_bits: a.dram_address_bits,
            disk_bits: a.disk_address_bits,
        })
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Emit one access-log line per backing-store access.
    #[serde(default = "GeneralConfig::default_log_accesses")]
    pub log_accesses: bool,
}

impl GeneralConfig {
    /// The access log is on unless explicitly disabled.
    fn default_log_accesses() -> bool {
        true
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_accesses: Self::default_log_accesses(),
        }
    }
}

/// Address space geometry, all widths in bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressConfig {
    /// Virtual address width.
    #[serde(default = "AddressConfig::default_virtual_bits")]
    pub virtual_address_bits: u32,

    /// Page-size exponent: pages are `1 << page_size_bits` bytes.
    #[serde(default = "AddressConfig::default_page_bits")]
    pub page_size_bits: u32,

    /// DRAM address width.
    #[serde(default = "AddressConfig::default_dram_bits")]
    pub dram_address_bits: u32,

    /// Disk address width.
    #[serde(default = "AddressConfig::default_disk_bits")]
    pub disk_address_bits: u32,
}

impl AddressConfig {
    fn default_virtual_bits() -> u32 {
        defaults::VIRTUAL_ADDRESS_BITS
    }

    fn default_page_bits() -> u32 {
        defaults::PAGE_SIZE_BITS
    }

    fn default_dram_bits() -> u32 {
        defaults::DRAM_ADDRESS_BITS
    }

    fn default_disk_bits() -> u32 {
        defaults::DISK_ADDRESS_BITS
    }
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            virtual_address_bits: defaults::VIRTUAL_ADDRESS_BITS,
            page_size_bits: defaults::PAGE_SIZE_BITS,
            dram_address_bits: defaults::DRAM_ADDRESS_BITS,
            disk_address_bits: defaults::DISK_ADDRESS_BITS,
        }
    }
}

/// Capacities of the two TLB levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlbConfig {
    /// L1 entry count.
    #[serde(default = "TlbConfig::default_l1")]
    pub l1_entries: usize,

    /// L2 entry count; L2 acts as the victim cache for L1.
    #[serde(default = "TlbConfig::default_l2")]
    pub l2_entries: usize,
}

impl TlbConfig {
    fn default_l1() -> usize {
        defaults::TLB_L1_ENTRIES
    }

    fn default_l2() -> usize {
        defaults::TLB_L2_ENTRIES
    }
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            l1_entries: defaults::TLB_L1_ENTRIES,
            l2_entries: defaults::TLB_L2_ENTRIES,
        }
    }
}

/// Fixed per-operation latencies in nanoseconds of logical time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// Charged by every L1 TLB lookup and invalidation.
    #[serde(default = "LatencyConfig::default_tlb_l1")]
    pub tlb_l1: u64,

    /// Charged by every L2 TLB lookup and invalidation.
    #[serde(default = "LatencyConfig::default_tlb_l2")]
    pub tlb_l2: u64,

    /// Charged by every DRAM access.
    #[serde(default = "LatencyConfig::default_dram")]
    pub dram: u64,

    /// Charged by every disk access.
    #[serde(default = "LatencyConfig::default_disk")]
    pub disk: u64,
}

impl LatencyConfig {
    fn default_tlb_l1() -> u64 {
        defaults::TLB_L1_LATENCY
    }

    fn default_tlb_l2() -> u64 {
        defaults::TLB_L2_LATENCY
    }

    fn default_dram() -> u64 {
        defaults::DRAM_LATENCY
    }

    fn default_disk() -> u64 {
        defaults::DISK_LATENCY
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            tlb_l1: defaults::TLB_L1_LATENCY,
            tlb_l2: defaults::TLB_L2_LATENCY,
            dram: defaults::DRAM_LATENCY,
            disk: defaults::DISK_LATENCY,
        }
    }
}

/// Validated address geometry with every derived mask and capacity.
///
/// Only [`Config::validate`] constructs one, so holders may assume the page
/// exponent is strictly below every width and both arenas fit in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressLayout {
    virtual_bits: u32,
    page_bits: u32,
    dram_bits: u32,
    disk_bits: u32,
}

impl AddressLayout {
    /// Page-size exponent.
    #[inline(always)]
    pub const fn page_bits(&self) -> u32 {
        self.page_bits
    }

    /// Page size in bytes.
    pub const fn page_size(&self) -> u64 {
        1 << self.page_bits
    }

    /// Virtual address width in bits.
    pub const fn virtual_bits(&self) -> u32 {
        self.virtual_bits
    }

    /// DRAM address width in bits.
    pub const fn dram_bits(&self) -> u32 {
        self.dram_bits
    }

    /// Disk address width in bits.
    pub const fn disk_bits(&self) -> u32 {
        self.disk_bits
    }

    /// Mask applied to every incoming virtual address.
    pub const fn virtual_mask(&self) -> u64 {
        low_mask(self.virtual_bits)
    }

    /// Mask applied to every DRAM address in the access log.
    pub const fn dram_mask(&self) -> u64 {
        low_mask(self.dram_bits)
    }

    /// Mask applied to every disk address in the access log.
    pub const fn disk_mask(&self) -> u64 {
        low_mask(self.disk_bits)
    }

    /// Mask selecting the byte offset within a page.
    pub const fn page_offset_mask(&self) -> u64 {
        low_mask(self.page_bits)
    }

    /// Mask selecting a virtual page number after the page shift.
    pub const fn page_index_mask(&self) -> u64 {
        low_mask(self.virtual_bits - self.page_bits)
    }

    /// Number of virtual pages, i.e. page table entries.
    pub const fn total_pages(&self) -> u64 {
        1 << (self.virtual_bits - self.page_bits)
    }

    /// Number of DRAM frames, including the reserved page-table frame.
    pub const fn dram_frames(&self) -> u64 {
        1 << (self.dram_bits - self.page_bits)
    }

    /// Splits a virtual address into `(vpn, offset)` after masking it to the
    /// virtual width.
    #[inline(always)]
    pub const fn split(&self, va: VirtAddr) -> (u64, u64) {
        let va = VirtAddr::new(va.val() & self.virtual_mask());
        (
            va.vpn(self.page_bits) & self.page_index_mask(),
            va.page_offset(self.page_bits),
        )
    }

    /// Builds the DRAM address of byte `offset` inside `frame`.
    #[inline(always)]
    pub const fn compose(&self, frame: u64, offset: u64) -> PhysAddr {
        PhysAddr::from_parts(frame, offset, self.page_bits)
    }
}
