// src/transcribe/mod.rs
// Transcription upload transport

mod http;
mod types;

pub use http::HttpTranscriber;
pub use types::{AudioPayload, PipelineError};

use async_trait::async_trait;

/// Remote transcription seam.
#[async_trait]
pub trait TranscribeService: Send + Sync {
    /// Upload one audio payload and return the transcription text.
    async fn transcribe(&self, payload: &AudioPayload) -> Result<String, PipelineError>;
}
