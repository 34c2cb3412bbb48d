use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Synthetic upload progress. While active, a spawned task advances the
/// value by a fixed step per tick up to a cap below 100; only the response
/// handler may pin 100. The value never decreases while a transfer is in
/// flight and returns to 0 only through `reset`.
pub struct ProgressTicker {
    value: Arc<AtomicU8>,
    task: Option<JoinHandle<()>>,
}

impl ProgressTicker {
    pub fn new() -> Self {
        Self {
            value: Arc::new(AtomicU8::new(0)),
            task: None,
        }
    }

    /// Shared handle for observers (UI polling, tests).
    pub fn handle(&self) -> Arc<AtomicU8> {
        self.value.clone()
    }

    pub fn percent(&self) -> u8 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn start(&mut self, tick: Duration, step: u8, cap: u8) {
        self.stop_task();
        self.value.store(0, Ordering::Relaxed);

        let value = self.value.clone();
        let task = tokio::spawn(async move {
            loop {
                sleep(tick).await;
                let _ = value.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                    let next = current.saturating_add(step);
                    if next <= cap {
                        Some(next)
                    } else {
                        None
                    }
                });
            }
        });

        self.task = Some(task);
    }

    /// Pin the value at 100. Called strictly after the network response has
    /// resolved, never by the ticker itself.
    pub fn finish(&mut self) {
        self.stop_task();
        self.value.store(100, Ordering::Relaxed);
    }

    pub fn reset(&mut self) {
        self.stop_task();
        self.value.store(0, Ordering::Relaxed);
    }

    fn stop_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for ProgressTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.stop_task();
    }
}
