//! DRAM frame allocation table.
//!
//! An occupancy bitmap over every DRAM frame. Frame 0 holds the page table
//! itself and is marked occupied for the whole run, so user pages are only
//! ever placed in frames `1..dram_frames`.

use crate::common::PAGE_TABLE_FRAME;

/// Occupancy bitmap over the DRAM frames.
#[derive(Debug, Clone)]
pub struct FrameTable {
    occupied: Vec<bool>,
    free: usize,
}

impl FrameTable {
    /// Creates a table over `frames` frames with only the page-table frame in use.
    ///
    /// # Panics
    ///
    /// Panics if `frames` is zero; configuration validation guarantees at least two.
    pub fn new(frames: usize) -> Self {
        assert!(frames > 0, "DRAM must hold the page-table frame");
        let mut occupied = vec![false; frames];
        occupied[PAGE_TABLE_FRAME as usize] = true;
        Self {
            occupied,
            free: frames - 1,
        }
    }

    /// Claims the lowest free frame.
    ///
    /// # Returns
    ///
    /// The frame number, or `None` when DRAM is full and a page must be evicted.
    pub fn allocate(&mut self) -> Option<u64> {
        if self.free == 0 {
            return None;
        }
        let frame = self.occupied.iter().position(|used| !used)?;
        self.occupied[frame] = true;
        self.free -= 1;
        Some(frame as u64)
    }

    /// Claims a specific frame that is known to be free.
    ///
    /// # Panics
    ///
    /// Panics if the frame is the page-table frame, out of range, or already in use.
    pub fn claim(&mut self, frame: u64) -> u64 {
        assert_ne!(frame, PAGE_TABLE_FRAME, "frame 0 is reserved for the page table");
        let slot = &mut self.occupied[frame as usize];
        assert!(!*slot, "frame {frame:#x} is already allocated");
        *slot = true;
        self.free -= 1;
        frame
    }

    /// Returns a frame to the free pool.
    ///
    /// # Panics
    ///
    /// Panics if the frame is the page-table frame, out of range, or not in use.
    pub fn release(&mut self, frame: u64) {
        assert_ne!(frame, PAGE_TABLE_FRAME, "frame 0 is reserved for the page table");
        let slot = &mut self.occupied[frame as usize];
        assert!(*slot, "frame {frame:#x} is not allocated");
        *slot = false;
        self.free += 1;
    }

    /// Returns `true` if `frame` is in use (the page-table frame always is).
    pub fn is_allocated(&self, frame: u64) -> bool {
        self.occupied.get(frame as usize).copied().unwrap_or(false)
    }

    /// Frames available to user pages, i.e. every frame except the page-table frame.
    pub fn user_capacity(&self) -> usize {
        self.occupied.len() - 1
    }

    /// Frames currently free.
    pub const fn free_frames(&self) -> usize {
        self.free
    }

    /// User frames currently holding a page.
    pub fn resident_pages(&self) -> usize {
        self.user_capacity() - self.free
    }
}
