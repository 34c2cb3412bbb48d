use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Tuning knobs for the pipeline. The defaults mirror the behavior of the
/// reference chat client: 10% progress steps every 300ms capped at 90,
/// a 1-second recording clock, 3-second transient errors, and a 500ms
/// settle delay before progress resets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub progress_tick_ms: u64,
    pub progress_step: u8,
    pub progress_cap: u8,
    pub recording_tick_ms: u64,
    pub error_clear_ms: u64,
    pub settle_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
            progress_tick_ms: 300,
            progress_step: 10,
            progress_cap: 90,
            recording_tick_ms: 1000,
            error_clear_ms: 3000,
            settle_ms: 500,
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by environment variables, with `.env` honored
    /// when present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("VOICEHUB_ENDPOINT") {
            let endpoint = endpoint.trim().trim_end_matches('/');
            if !endpoint.is_empty() {
                config.endpoint = endpoint.to_string();
            }
        }

        if let Ok(secs) = std::env::var("VOICEHUB_TIMEOUT_SECS") {
            if let Ok(value) = secs.trim().parse::<u64>() {
                config.request_timeout_secs = value;
            }
        }

        config
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    pub fn recording_tick(&self) -> Duration {
        Duration::from_millis(self.recording_tick_ms)
    }

    pub fn error_clear(&self) -> Duration {
        Duration::from_millis(self.error_clear_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}
