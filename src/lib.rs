pub mod app;
pub mod config;
pub mod export;
pub mod geo;
pub mod narrate;
pub mod playback;
pub mod route;
pub mod search;
pub mod speech;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum WayfinderError {
    #[error("Search error: {0}")]
    SearchError(String),

    #[error("Routing error: {0}")]
    RoutingError(String),

    #[error("Transform error: {0}")]
    TransformError(String),

    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Selection error: {0}")]
    SelectionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for WayfinderError {
    fn from(e: std::io::Error) -> Self {
        WayfinderError::IOError(e.to_string())
    }
}

impl WayfinderError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Transient service failures; the user can simply retry
            WayfinderError::SearchError(_) => true,
            WayfinderError::RoutingError(_) => true,
            WayfinderError::TransformError(_) => true,
            WayfinderError::SynthesisError(_) => true,
            WayfinderError::PlaybackError(_) => true,
            // The user needs to pick both endpoints first
            WayfinderError::SelectionError(_) => true,
            WayfinderError::ConfigError(_) => false,
            WayfinderError::IOError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            WayfinderError::SearchError(_) => {
                "Location search failed. Please try again.".to_string()
            }
            WayfinderError::RoutingError(_) => {
                "Could not reach the routing service. Please try again.".to_string()
            }
            WayfinderError::TransformError(_) => {
                "Stylized clues unavailable. Showing plain instructions.".to_string()
            }
            WayfinderError::SynthesisError(_) => {
                "Narration failed. Instructions will be shown as text.".to_string()
            }
            WayfinderError::PlaybackError(_) => {
                "Audio playback failed. Instructions will be shown as text.".to_string()
            }
            WayfinderError::SelectionError(_) => {
                "Please select both a start and end location from the suggestions.".to_string()
            }
            WayfinderError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            WayfinderError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WayfinderError>;
