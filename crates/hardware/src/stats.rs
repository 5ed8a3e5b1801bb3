//! Simulation statistics collection and reporting.
//!
//! This module reports the counters of a run. It provides:
//! 1. **Summary:** Elapsed logical time and instructions executed.
//! 2. **Paging:** Page faults, evictions, and swap traffic.
//! 3. **TLB:** Hits, misses, invalidations, and hit rate per level.
//! 4. **Memory:** DRAM and disk reads and writes charged by the translation path.

use std::fmt::Write as _;

use serde::Serialize;

use crate::core::clock::Nanos;
use crate::core::units::mmu::page_table::PagingCounters;
use crate::core::units::mmu::tlb::TlbCounters;
use crate::soc::memory::StoreCounters;

/// Snapshot of every counter, taken by `Simulator::stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SimStats {
    /// Logical time elapsed, in nanoseconds.
    pub elapsed_ns: Nanos,
    /// Read and write instructions executed.
    pub instructions: u64,
    /// Page table counters.
    pub paging: PagingCounters,
    /// L1 TLB counters.
    pub tlb_l1: TlbCounters,
    /// L2 TLB counters.
    pub tlb_l2: TlbCounters,
    /// DRAM accesses charged (data accesses are logged, not counted).
    pub dram: StoreCounters,
    /// Disk accesses charged.
    pub disk: StoreCounters,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"paging"`, `"tlb"`, `"memory"`.
/// Pass an empty slice to `render_sections` to render all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "paging", "tlb", "memory"];

const RULE: &str = "----------------------------------------------------------";
const BANNER: &str = "==========================================================";

impl SimStats {
    /// Renders the requested sections as text.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; unknown
    /// names are ignored. Pass an empty slice to render every section.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{BANNER}");
        let _ = writeln!(out, "MEMORY HIERARCHY SIMULATION STATISTICS");
        let _ = writeln!(out, "{BANNER}");

        if want("summary") {
            let per_inst = if self.instructions == 0 {
                0.0
            } else {
                self.elapsed_ns as f64 / self.instructions as f64
            };
            let _ = writeln!(out, "elapsed                  {} ns", self.elapsed_ns);
            let _ = writeln!(out, "instructions             {}", self.instructions);
            let _ = writeln!(out, "ns_per_instruction       {per_inst:.2}");
            let _ = writeln!(out, "{RULE}");
        }
        if want("paging") {
            let _ = writeln!(out, "PAGING");
            let _ = writeln!(out, "  page.faults            {}", self.paging.faults);
            let _ = writeln!(out, "  page.evictions         {}", self.paging.evictions);
            let _ = writeln!(out, "  swap.outs              {}", self.paging.swap_outs);
            let _ = writeln!(out, "  swap.ins               {}", self.paging.swap_ins);
            let _ = writeln!(out, "{RULE}");
        }
        if want("tlb") {
            let _ = writeln!(out, "TLB");
            for (name, c) in [("L1", &self.tlb_l1), ("L2", &self.tlb_l2)] {
                let _ = writeln!(
                    out,
                    "  {:<6} hits: {:<10} | misses: {:<10} | invalidations: {:<8} | hit_rate: {:.2}%",
                    name,
                    c.hits,
                    c.misses,
                    c.invalidations,
                    c.hit_rate()
                );
            }
            let _ = writeln!(out, "{RULE}");
        }
        if want("memory") {
            let _ = writeln!(out, "BACKING STORES");
            for (name, c) in [("DRAM", &self.dram), ("Disk", &self.disk)] {
                let _ = writeln!(
                    out,
                    "  {:<6} accesses: {:<10} | reads: {:<10} | writes: {}",
                    name,
                    c.total(),
                    c.reads,
                    c.writes
                );
            }
        }
        let _ = writeln!(out, "{BANNER}");
        out
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
