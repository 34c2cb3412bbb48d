// src/chat.rs
// Chat round trip: forwards transcriptions into the conversation

use crate::pipeline::TranscriptionSink;
use crate::transcribe::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CHAT_ERROR_MESSAGE: &str = "Sorry, there was an error processing your audio.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

/// Explicit container for the conversation view, replacing ad hoc mutable
/// message state. Cloning shares the underlying log.
#[derive(Clone, Default)]
pub struct MessageLog {
    inner: Arc<Mutex<Vec<Message>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&self, text: impl Into<String>) {
        self.push(Role::User, text.into());
    }

    pub fn push_bot(&self, text: impl Into<String>) {
        self.push(Role::Bot, text.into());
    }

    pub fn clear(&self) {
        if let Ok(mut messages) = self.inner.lock() {
            messages.clear();
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|messages| messages.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, role: Role, text: String) {
        if let Ok(mut messages) = self.inner.lock() {
            messages.push(Message { role, text });
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    bot_response: String,
}

/// Client for the chat endpoint (`POST /chat` with `{text}`).
pub struct ChatClient {
    endpoint: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub async fn send(&self, text: &str) -> Result<String, PipelineError> {
        let response = self
            .client
            .post(format!("{}/chat", self.endpoint))
            .json(&ChatRequest { text })
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    let chat: ChatResponse = resp
                        .json()
                        .await
                        .map_err(|e| PipelineError::NetworkFailure(e.to_string()))?;
                    Ok(chat.bot_response)
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

/// Relays each transcription into the chat round trip: the text shows up as
/// a user message and the bot reply (or an error line) follows. Chat
/// failures never propagate back into the pipeline.
pub struct ChatForwarder {
    client: ChatClient,
    log: MessageLog,
}

impl ChatForwarder {
    pub fn new(client: ChatClient, log: MessageLog) -> Self {
        Self { client, log }
    }
}

#[async_trait]
impl TranscriptionSink for ChatForwarder {
    async fn on_transcription(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        self.log.push_user(text);

        match self.client.send(text).await {
            Ok(reply) => {
                tracing::info!("Chat reply received: {} chars", reply.len());
                self.log.push_bot(reply);
            }
            Err(e) => {
                tracing::error!("Chat round trip failed: {}", e);
                self.log.push_bot(CHAT_ERROR_MESSAGE);
            }
        }
    }
}
