pub mod audio;
pub mod chat;
pub mod config;
pub mod pipeline;
pub mod transcribe;

pub use audio::{AudioBuffer, CaptureBackend, CaptureSession, CaptureStream, MicBackend, OpenCapture};
pub use chat::{ChatClient, ChatForwarder, Message, MessageLog, Role};
pub use config::PipelineConfig;
pub use pipeline::{format_elapsed, TranscriptionSink, UiStatus, VoicePipeline};
pub use transcribe::{AudioPayload, HttpTranscriber, PipelineError, TranscribeService};

use std::sync::Arc;

/// Wire a pipeline to the microphone, the HTTP transcription endpoint, and
/// the chat round trip described by the config.
pub fn build_default_pipeline(config: PipelineConfig, log: MessageLog) -> VoicePipeline {
    let transcriber = HttpTranscriber::new(config.endpoint.clone(), config.request_timeout());
    let chat_client = ChatClient::new(config.endpoint.clone(), config.request_timeout());
    let forwarder = ChatForwarder::new(chat_client, log);

    VoicePipeline::new(
        config,
        Box::new(MicBackend::new()),
        Arc::new(transcriber),
        Arc::new(forwarder),
    )
}
