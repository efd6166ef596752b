//! # Recording Bus

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard,
};
use serde_json::Value;

use super::{Bus, BusError, Op};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A bus which keeps every operation in memory instead of sending it anywhere.
///
/// Operations are recorded in the order they were made across all threads.
#[derive(Default)]
pub struct RecordingBus {
    ops: Mutex<Vec<Op>>,

    failing: AtomicBool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set every publish is rejected with [`BusError::Rejected`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// A copy of every operation recorded so far.
    pub fn ops(&self) -> Vec<Op> {
        self.lock().clone()
    }

    /// The messages published on `topic`, oldest first.
    pub fn published(&self, topic: &str) -> Vec<Value> {
        self.lock()
            .iter()
            .filter_map(|op| match op {
                Op::Publish { topic: t, msg } if t == topic => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Op>> {
        self.ops.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: Op) {
        self.lock().push(op);
    }
}

impl Bus for RecordingBus {
    fn advertise(&self, topic: &str, msg_type: &str) -> Result<(), BusError> {
        self.record(Op::Advertise {
            topic: topic.into(),
            msg_type: msg_type.into(),
        });
        Ok(())
    }

    fn publish(&self, topic: &str, msg: Value) -> Result<(), BusError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(BusError::Rejected(topic.into()));
        }

        self.record(Op::Publish {
            topic: topic.into(),
            msg,
        });
        Ok(())
    }

    fn unadvertise(&self, topic: &str) -> Result<(), BusError> {
        self.record(Op::Unadvertise {
            topic: topic.into(),
        });
        Ok(())
    }
}
