use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Elapsed-time counter for an active recording. A spawned task bumps the
/// counter once per tick until cancelled; cancellation is immediate.
pub struct RecordingClock {
    elapsed: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl RecordingClock {
    pub fn start(tick: Duration) -> Self {
        let elapsed = Arc::new(AtomicU64::new(0));
        let counter = elapsed.clone();

        let task = tokio::spawn(async move {
            loop {
                sleep(tick).await;
                counter.fetch_add(1, Ordering::Relaxed);
            }
        });

        Self {
            elapsed,
            task: Some(task),
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RecordingClock {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// mm:ss display form of an elapsed-seconds counter.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(9), "00:09");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(3600), "60:00");
    }

    #[tokio::test]
    async fn test_clock_ticks_and_stops() {
        let mut clock = RecordingClock::start(Duration::from_millis(10));
        sleep(Duration::from_millis(65)).await;
        let ticked = clock.elapsed_secs();
        assert!(ticked >= 3, "expected at least 3 ticks, got {}", ticked);

        clock.cancel();
        let frozen = clock.elapsed_secs();
        sleep(Duration::from_millis(40)).await;
        assert_eq!(clock.elapsed_secs(), frozen);
    }
}
