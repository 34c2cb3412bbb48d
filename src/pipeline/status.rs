use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Which controls are live. States are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UiStatus {
    Idle,
    Recording,
    Uploading,
    Error(String),
}

struct StatusSlot {
    status: UiStatus,
    epoch: u64,
}

/// Shared status cell. Every transition bumps an epoch, so a delayed
/// auto-clear only fires if nothing newer replaced the state it targeted.
#[derive(Clone)]
pub struct StatusCell {
    inner: Arc<Mutex<StatusSlot>>,
}

impl StatusCell {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatusSlot {
                status: UiStatus::Idle,
                epoch: 0,
            })),
        }
    }

    pub fn get(&self) -> UiStatus {
        self.lock().status.clone()
    }

    /// Transition to a new status; returns the epoch of this transition.
    pub fn set(&self, status: UiStatus) -> u64 {
        let mut slot = self.lock();
        slot.status = status;
        slot.epoch += 1;
        slot.epoch
    }

    /// Return to `Idle` only if the given transition is still the latest.
    pub fn clear_if_current(&self, epoch: u64) -> bool {
        let mut slot = self.lock();
        if slot.epoch != epoch {
            return false;
        }
        slot.status = UiStatus::Idle;
        slot.epoch += 1;
        true
    }

    fn lock(&self) -> MutexGuard<'_, StatusSlot> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}
