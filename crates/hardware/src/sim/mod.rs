//! Simulation context and trace replay.
//!
//! Provides the `Simulator` that owns the whole machine and the reader for
//! the instruction files it replays.

/// The simulation context and its public read/write surface.
pub mod simulator;

/// Instruction trace parsing and streaming.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{TraceOp, TraceReader};
