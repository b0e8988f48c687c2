//! Configuration for all components
//!
//! Provides centralized configuration in one place: service endpoints, the
//! campus to search within, the narration style and the runtime enable
//! flags for the optional side effects.

use crate::narrate::StyleLevel;
use serde::{Deserialize, Serialize};

/// Campus collection served by default.
pub const DEFAULT_CAMPUS_ID: u32 = 742;

/// Configuration for the location search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the search API
    pub base_url: String,

    /// Campus to search within
    pub campus_id: u32,

    /// Result page size
    pub rows: u32,

    /// Result language
    pub lang: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mazemap.com".to_string(),
            campus_id: DEFAULT_CAMPUS_ID,
            rows: 10,
            lang: "en".to_string(),
        }
    }
}

/// Configuration for the routing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL of the routing API
    pub base_url: String,

    /// Base URL of the embedded map viewer
    pub embed_base_url: String,

    /// Campus collection routed within
    pub campus_id: u32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://routing.mazemap.com".to_string(),
            embed_base_url: "https://use.mazemap.com".to_string(),
            campus_id: DEFAULT_CAMPUS_ID,
        }
    }
}

/// Configuration for the text transformation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrateConfig {
    /// Chat completions endpoint
    pub api_url: String,

    /// Bearer key; transformation is skipped when empty
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Response token cap
    pub max_tokens: u32,
}

impl Default for NarrateConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.8,
            max_tokens: 1024,
        }
    }
}

/// Configuration for the speech synthesis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Speech synthesis endpoint
    pub api_url: String,

    /// Bearer key; narration is skipped when empty
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Voice identifier
    pub voice: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/audio/speech".to_string(),
            api_key: String::new(),
            model: "tts-1".to_string(),
            voice: "onyx".to_string(),
        }
    }
}

/// Configuration for the complete application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Search configuration
    pub search: SearchConfig,

    /// Routing configuration
    pub routing: RoutingConfig,

    /// Text transformation configuration
    pub narrate: NarrateConfig,

    /// Speech synthesis configuration
    pub speech: SpeechConfig,

    /// Style intensity for transformed instructions
    pub style: StyleLevel,

    /// Whether step texts are rewritten before playback
    pub enable_transform: bool,

    /// Whether steps are narrated aloud
    pub enable_audio_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            routing: RoutingConfig::default(),
            narrate: NarrateConfig::default(),
            speech: SpeechConfig::default(),
            style: StyleLevel::Classic,
            enable_transform: true,
            enable_audio_output: true,
        }
    }
}

impl AppConfig {
    /// Set the bearer key used by both hosted text services.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.narrate.api_key = key.clone();
        self.speech.api_key = key;
        self
    }

    /// Set the campus for search and routing.
    pub fn with_campus(mut self, campus_id: u32) -> Self {
        self.search.campus_id = campus_id;
        self.routing.campus_id = campus_id;
        self
    }

    /// Set the style intensity.
    pub fn with_style(mut self, style: StyleLevel) -> Self {
        self.style = style;
        self
    }

    /// Disable text transformation (plain instructions only).
    pub fn without_transform(mut self) -> Self {
        self.enable_transform = false;
        self
    }

    /// Disable spoken narration (text-only mode).
    pub fn without_audio_output(mut self) -> Self {
        self.enable_audio_output = false;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.search.base_url.is_empty() || self.routing.base_url.is_empty() {
            return Err("Service base URLs are required".to_string());
        }

        if self.enable_transform && self.narrate.api_key.is_empty() {
            return Err("Transformation requires an API key".to_string());
        }

        if self.enable_audio_output && self.speech.api_key.is_empty() {
            return Err("Narration requires an API key".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.search.campus_id, DEFAULT_CAMPUS_ID);
        assert_eq!(config.search.rows, 10);
        assert!(config.enable_transform);
        assert!(config.enable_audio_output);
    }

    #[test]
    fn test_builder_flags() {
        let config = AppConfig::default()
            .without_transform()
            .without_audio_output()
            .with_campus(99);

        assert!(!config.enable_transform);
        assert!(!config.enable_audio_output);
        assert_eq!(config.routing.campus_id, 99);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_key_for_enabled_services() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());

        let config = AppConfig::default().with_api_key("sk-test");
        assert!(config.validate().is_ok());
    }
}
