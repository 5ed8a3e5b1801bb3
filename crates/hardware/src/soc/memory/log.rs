//! Backing-store access log.
//!
//! Every DRAM or disk access produces one [`AccessEvent`], stamped with the
//! logical time at which it was issued. Events are handed to an
//! [`AccessSink`]; the simulator does not buffer them itself, so long traces
//! can stream the log without holding it in memory.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::common::{AccessType, PhysAddr};
use crate::core::clock::Nanos;

/// Backing store an access went to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Store {
    /// Main memory.
    Dram,
    /// Swap device.
    Disk,
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dram => f.write_str("DRAM"),
            Self::Disk => f.write_str("Disk"),
        }
    }
}

/// One logged backing-store access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AccessEvent {
    /// Logical time the access was issued, before its latency is charged.
    pub time: Nanos,
    /// Store accessed.
    pub store: Store,
    /// Access direction.
    pub op: AccessType,
    /// Store address, masked to the store width.
    pub addr: PhysAddr,
}

impl fmt::Display for AccessEvent {
    /// Formats the event as `[time] R DRAM[addr]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}[{}]", self.time, self.op, self.store, self.addr)
    }
}

/// Destination for access events.
pub trait AccessSink {
    /// Consumes one event.
    fn record(&mut self, event: &AccessEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl AccessSink for Discard {
    fn record(&mut self, _event: &AccessEvent) {}
}

/// Sink that keeps every event in a shared buffer.
///
/// Clones share the buffer: hand one clone to the simulator and read the
/// log back through another.
#[derive(Debug, Clone, Default)]
pub struct AccessRecorder {
    events: Rc<RefCell<Vec<AccessEvent>>>,
}

impl AccessRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out every event recorded so far.
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.borrow().clone()
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Drops every recorded event.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl AccessSink for AccessRecorder {
    fn record(&mut self, event: &AccessEvent) {
        self.events.borrow_mut().push(*event);
    }
}
