// src/transcribe/types.rs
// Payload and error definitions for the upload pipeline

use thiserror::Error;

/// One audio payload bound for the transcription endpoint, built from either
/// a user-chosen file or a finished recording.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    /// Declared media kind, MIME-style (e.g. "audio/wav").
    pub kind: String,
    pub file_name: String,
}

impl AudioPayload {
    pub fn new(bytes: Vec<u8>, kind: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            kind: kind.into(),
            file_name: file_name.into(),
        }
    }

    /// Whether the declared kind indicates audio content.
    pub fn is_audio_kind(&self) -> bool {
        self.kind.starts_with("audio/")
    }
}

/// Pipeline error types. All of these are recovered at the operation
/// boundary and surfaced as a transient, auto-clearing status message.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not access microphone. Please check permissions.")]
    PermissionDenied,

    #[error("Not an audio file: {0}")]
    InvalidFileKind(String),

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("No transcription received.")]
    EmptyTranscription,

    #[error("Invalid audio payload")]
    InvalidAudio,

    #[error("Another capture or upload is already active")]
    Busy,

    #[error("Not recording")]
    NotRecording,
}
