//! Speech synthesis client
//!
//! Thin wrapper over the hosted synthesis endpoint: text in, binary audio
//! out. Cancellation happens around the returned future, not inside it;
//! see `playback::SpeechSession`.

use crate::config::SpeechConfig;
use crate::{Result, WayfinderError};
use serde_json::json;
use tracing::debug;

/// HTTP client for the speech synthesis service.
#[derive(Clone)]
pub struct SpeechClient {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Synthesize one utterance, returning the raw audio body.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let body = json!({
            "model": self.config.model,
            "voice": self.config.voice,
            "input": text,
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| WayfinderError::SynthesisError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WayfinderError::SynthesisError(format!(
                "Synthesis API returned {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WayfinderError::SynthesisError(e.to_string()))?;

        debug!("synthesized {} bytes of audio", bytes.len());
        Ok(bytes.to_vec())
    }
}
