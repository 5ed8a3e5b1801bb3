//! Physical and Virtual Address types.
//!
//! This module defines strong types for virtual and physical addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes between virtual and physical address spaces at compile time.
//! 2. **Address Manipulation:** Helpers to split addresses into page numbers and offsets.
//! 3. **MMU Integration:** Acts as the primary interface for translation operations.
//!
//! Page geometry is not fixed here; every split takes the page-size exponent
//! from the validated `AddressLayout`.

use std::fmt;

/// A virtual address issued by the replayed program.
///
/// Virtual addresses must be translated to DRAM addresses through the
/// two-level TLB and the page table before the data access is performed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct VirtAddr(pub u64);

/// A physical address in either the DRAM or the disk address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct PhysAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Virtual page number for a page of `1 << page_bits` bytes.
    #[inline(always)]
    pub const fn vpn(&self, page_bits: u32) -> u64 {
        shr(self.0, page_bits)
    }

    /// Byte offset within a page of `1 << page_bits` bytes.
    #[inline(always)]
    pub const fn page_offset(&self, page_bits: u32) -> u64 {
        self.0 & low_mask(page_bits)
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Builds the address of byte `offset` inside `frame`.
    ///
    /// # Arguments
    ///
    /// * `frame` - Page-granular frame (or disk page) number.
    /// * `offset` - Byte offset within the page; must be below the page size.
    /// * `page_bits` - Page-size exponent.
    #[inline(always)]
    pub const fn from_parts(frame: u64, offset: u64, page_bits: u32) -> Self {
        Self(shl(frame, page_bits) | offset)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Frame (or disk page) number containing this address.
    #[inline(always)]
    pub const fn frame(&self, page_bits: u32) -> u64 {
        shr(self.0, page_bits)
    }

    /// Byte offset within the containing frame.
    #[inline(always)]
    pub const fn page_offset(&self, page_bits: u32) -> u64 {
        self.0 & low_mask(page_bits)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Mask selecting the low `bits` bits of a 64-bit value.
///
/// `bits >= 64` yields an all-ones mask instead of overflowing the shift.
#[inline(always)]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[inline(always)]
const fn shr(value: u64, bits: u32) -> u64 {
    if bits >= u64::BITS { 0 } else { value >> bits }
}

#[inline(always)]
const fn shl(value: u64, bits: u32) -> u64 {
    if bits >= u64::BITS { 0 } else { value << bits }
}
