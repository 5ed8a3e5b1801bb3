//! Swap bookkeeping.
//!
//! Tracks, per virtual page, whether its last dirty image lives on disk and
//! where. Disk space is modeled as unbounded: pages come from a monotonic
//! address generator rather than a free list, so allocation never fails and
//! the sequence of disk addresses is fully deterministic.

use crate::common::constants::DISK_PAGE_BASE;

/// Swap metadata of one virtual page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapSlot {
    /// The page's last dirty image is on disk and the page is not resident.
    pub is_swapped: bool,
    /// Disk page holding that image; meaningful only while `is_swapped`.
    pub disk_page: u64,
}

/// Per-VPN swap metadata plus the disk page generator.
#[derive(Debug, Clone)]
pub struct SwapSpace {
    slots: Vec<SwapSlot>,
    cursor: u64,
    page_bits: u32,
    disk_mask: u64,
}

impl SwapSpace {
    /// Creates swap metadata for `pages` virtual pages.
    ///
    /// # Arguments
    ///
    /// * `pages` - Number of virtual pages.
    /// * `page_bits` - Page-size exponent.
    /// * `disk_mask` - Mask of the disk address width.
    pub fn new(pages: usize, page_bits: u32, disk_mask: u64) -> Self {
        Self {
            slots: vec![SwapSlot::default(); pages],
            cursor: 0,
            page_bits,
            disk_mask,
        }
    }

    /// Hands out the next disk page number.
    ///
    /// Addresses are `DISK_PAGE_BASE << 32 | cursor`, masked to the disk
    /// width; the cursor advances by one page per call.
    pub const fn allocate_page(&mut self) -> u64 {
        let addr = ((DISK_PAGE_BASE << 32) | self.cursor) & self.disk_mask;
        self.cursor = self.cursor.wrapping_add(1 << self.page_bits);
        addr >> self.page_bits
    }

    /// Swap metadata of `vpn`.
    ///
    /// # Panics
    ///
    /// Panics if `vpn` is outside the virtual page range.
    pub fn slot(&self, vpn: u64) -> &SwapSlot {
        &self.slots[vpn as usize]
    }

    /// Records that `vpn`'s image was written to `disk_page`.
    pub fn swap_out(&mut self, vpn: u64, disk_page: u64) {
        self.slots[vpn as usize] = SwapSlot {
            is_swapped: true,
            disk_page,
        };
    }

    /// Clears the swapped flag of `vpn`.
    ///
    /// # Returns
    ///
    /// The disk page the image was read from, or `None` if `vpn` was not swapped.
    pub fn swap_in(&mut self, vpn: u64) -> Option<u64> {
        let slot = &mut self.slots[vpn as usize];
        if slot.is_swapped {
            slot.is_swapped = false;
            Some(slot.disk_page)
        } else {
            None
        }
    }
}
