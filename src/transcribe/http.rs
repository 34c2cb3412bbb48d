// src/transcribe/http.rs
// HTTP transcription client (multipart POST /talk)

use super::{AudioPayload, PipelineError, TranscribeService};
use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct TalkResponse {
    #[serde(default)]
    transcription: Option<String>,
}

pub struct HttpTranscriber {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTranscriber {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        tracing::info!("Transcription client initialized: {}", endpoint);

        Self { endpoint, client }
    }
}

#[async_trait]
impl TranscribeService for HttpTranscriber {
    async fn transcribe(&self, payload: &AudioPayload) -> Result<String, PipelineError> {
        tracing::info!(
            "Uploading {} bytes ({}) for transcription...",
            payload.bytes.len(),
            payload.kind
        );

        let file_part = multipart::Part::bytes(payload.bytes.clone())
            .file_name(payload.file_name.clone())
            .mime_str(&payload.kind)
            .map_err(|_| PipelineError::InvalidFileKind(payload.kind.clone()))?;

        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(format!("{}/talk", self.endpoint))
            .multipart(form)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    let talk: TalkResponse = resp
                        .json()
                        .await
                        .map_err(|e| PipelineError::NetworkFailure(e.to_string()))?;

                    match talk.transcription {
                        Some(text) if !text.trim().is_empty() => {
                            tracing::info!("Transcription received: {} chars", text.len());
                            Ok(text)
                        }
                        _ => Err(PipelineError::EmptyTranscription),
                    }
                } else {
                    let error_text = resp.text().await.unwrap_or_default();
                    Err(PipelineError::NetworkFailure(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )))
                }
            }
            Err(e) => Err(PipelineError::NetworkFailure(e.to_string())),
        }
    }
}
