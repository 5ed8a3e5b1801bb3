use vmsim_core::core::units::mmu::page_table::TlbShootdown;
use vmsim_core::soc::System;

/// Records every shootdown the page table issues, charging nothing.
#[derive(Debug, Default)]
pub struct RecordingShootdown {
    /// Shot-down VPNs in issue order.
    pub vpns: Vec<u64>,
}

impl TlbShootdown for RecordingShootdown {
    fn shootdown(&mut self, vpn: u64, _system: &mut System) {
        self.vpns.push(vpn);
    }
}
