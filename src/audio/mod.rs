pub mod buffer;
pub mod capture;

pub use buffer::AudioBuffer;
pub use capture::{CaptureBackend, CaptureStream, MicBackend, OpenCapture};

use crate::pipeline::clock::RecordingClock;
use crate::transcribe::PipelineError;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// One live recording. Owns the device stream exclusively together with the
/// accumulated chunks and the elapsed-time clock; created on record start,
/// destroyed on stop or error. The stream is released exactly once, by
/// `finish` or on drop, whichever comes first.
pub struct CaptureSession {
    stream: Option<Box<dyn CaptureStream>>,
    buffer: Arc<Mutex<AudioBuffer>>,
    clock: RecordingClock,
}

impl CaptureSession {
    /// Acquire the capture device and start the recording clock.
    pub fn start(backend: &dyn CaptureBackend, tick: Duration) -> Result<Self, PipelineError> {
        let open = backend.open()?;
        let clock = RecordingClock::start(tick);

        Ok(Self {
            stream: Some(open.stream),
            buffer: open.buffer,
            clock,
        })
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed_secs()
    }

    /// Stop the clock, release the device stream, and hand back the
    /// buffered audio.
    pub fn finish(mut self) -> AudioBuffer {
        self.clock.cancel();
        self.stream.take();

        let mut guard = lock_unpoisoned(&self.buffer);
        let out = guard.clone();
        guard.clear();
        out
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.clock.cancel();
        self.stream.take();
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
