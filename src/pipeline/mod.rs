pub mod clock;
pub mod progress;
pub mod status;

pub use clock::format_elapsed;
pub use progress::ProgressTicker;
pub use status::{StatusCell, UiStatus};

use crate::audio::{CaptureBackend, CaptureSession};
use crate::config::PipelineConfig;
use crate::transcribe::{AudioPayload, PipelineError, TranscribeService};
use async_trait::async_trait;
use std::sync::atomic::AtomicU8;
use std::sync::Arc;
use tokio::time::sleep;
use uuid::Uuid;

/// Collaborator that receives each successful transcription exactly once.
#[async_trait]
pub trait TranscriptionSink: Send + Sync {
    async fn on_transcription(&self, text: &str);
}

/// Recorder/uploader state machine.
///
/// `Idle → Recording → Uploading → Idle`, plus `Idle → Uploading → Idle` for
/// direct file upload, with an `Error` excursion from any active state back
/// to `Idle`. At most one capture session and one upload exist at a time;
/// a second start while one is active is rejected with `Busy`.
pub struct VoicePipeline {
    config: PipelineConfig,
    backend: Box<dyn CaptureBackend>,
    service: Arc<dyn TranscribeService>,
    sink: Arc<dyn TranscriptionSink>,
    status: StatusCell,
    progress: ProgressTicker,
    session: Option<CaptureSession>,
}

impl VoicePipeline {
    pub fn new(
        config: PipelineConfig,
        backend: Box<dyn CaptureBackend>,
        service: Arc<dyn TranscribeService>,
        sink: Arc<dyn TranscriptionSink>,
    ) -> Self {
        Self {
            config,
            backend,
            service,
            sink,
            status: StatusCell::new(),
            progress: ProgressTicker::new(),
            session: None,
        }
    }

    pub fn status(&self) -> UiStatus {
        self.status.get()
    }

    /// Shared status cell for observers.
    pub fn status_cell(&self) -> StatusCell {
        self.status.clone()
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress.percent()
    }

    /// Shared progress value for observers.
    pub fn progress_handle(&self) -> Arc<AtomicU8> {
        self.progress.handle()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Elapsed seconds of the active recording, 0 when idle.
    pub fn elapsed_secs(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.elapsed_secs())
    }

    /// Upload a user-chosen file. The declared kind must indicate audio;
    /// anything else is rejected before any network activity.
    pub async fn select_file(&mut self, payload: AudioPayload) -> Result<(), PipelineError> {
        self.ensure_available()?;

        if !payload.is_audio_kind() {
            tracing::warn!("Rejected non-audio upload: {}", payload.kind);
            let err = PipelineError::InvalidFileKind(payload.kind);
            self.flag_error(&err);
            return Err(err);
        }

        tracing::info!(
            "File selected: {} ({}, {} bytes)",
            payload.file_name,
            payload.kind,
            payload.bytes.len()
        );
        self.run_upload(payload).await
    }

    /// Request capture-device access and begin recording.
    pub async fn start_recording(&mut self) -> Result<(), PipelineError> {
        self.ensure_available()?;

        let session = match CaptureSession::start(
            self.backend.as_ref(),
            self.config.recording_tick(),
        ) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("Capture device unavailable: {}", e);
                self.flag_error(&e);
                return Err(e);
            }
        };

        self.session = Some(session);
        self.status.set(UiStatus::Recording);
        tracing::info!("Recording started");
        Ok(())
    }

    /// Stop the active recording, release the device, and upload the
    /// captured audio. The device is released even if the upload fails.
    pub async fn stop_recording(&mut self) -> Result<(), PipelineError> {
        let session = self.session.take().ok_or(PipelineError::NotRecording)?;

        let elapsed = session.elapsed_secs();
        let buffer = session.finish();
        tracing::info!(
            "Recording stopped: {} ({:.1}s of audio)",
            format_elapsed(elapsed),
            buffer.duration_secs
        );

        let wav_bytes = match buffer.to_wav_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Recording produced no usable audio");
                self.flag_error(&e);
                return Err(e);
            }
        };

        let payload = AudioPayload::new(wav_bytes, "audio/wav", "recording.wav");
        self.run_upload(payload).await
    }

    /// Single upload pathway for both entry points.
    async fn run_upload(&mut self, payload: AudioPayload) -> Result<(), PipelineError> {
        let upload_id = Uuid::new_v4();
        self.status.set(UiStatus::Uploading);
        self.progress.start(
            self.config.progress_tick(),
            self.config.progress_step,
            self.config.progress_cap,
        );
        tracing::info!(
            "Upload {} started: {} bytes ({})",
            upload_id,
            payload.bytes.len(),
            payload.kind
        );

        let result = self.service.transcribe(&payload).await;

        // Completion handling is sequenced strictly after the response
        // resolves, never by the ticker racing ahead.
        self.progress.finish();

        let result = match result {
            Ok(text) if text.trim().is_empty() => Err(PipelineError::EmptyTranscription),
            other => other,
        };

        let outcome = match result {
            Ok(text) => {
                tracing::info!("Upload {} transcribed: {} chars", upload_id, text.len());
                self.sink.on_transcription(&text).await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Upload {} failed: {}", upload_id, e);
                self.flag_error(&e);
                Err(e)
            }
        };

        sleep(self.config.settle()).await;
        self.progress.reset();
        if outcome.is_ok() {
            self.status.set(UiStatus::Idle);
        }
        outcome
    }

    fn ensure_available(&self) -> Result<(), PipelineError> {
        if self.session.is_some() {
            return Err(PipelineError::Busy);
        }
        match self.status.get() {
            UiStatus::Recording | UiStatus::Uploading => Err(PipelineError::Busy),
            _ => Ok(()),
        }
    }

    /// Surface a transient error: set the status and schedule an
    /// epoch-guarded auto-clear back to `Idle`.
    fn flag_error(&self, error: &PipelineError) {
        let epoch = self.status.set(UiStatus::Error(error.to_string()));
        let cell = self.status.clone();
        let delay = self.config.error_clear();
        tokio::spawn(async move {
            sleep(delay).await;
            cell.clear_if_current(epoch);
        });
    }
}
