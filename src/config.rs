//! Client configuration

use crate::state_machine::DEFAULT_CONVERSATION_ID;
use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Configuration for the companion client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanionConfig {
    pub api_base_url: String,
    /// Conversation id used until the backend echoes another one
    pub conversation_id: String,
    /// Initial state of the reasoning toggle
    pub show_reasoning: bool,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            conversation_id: DEFAULT_CONVERSATION_ID.to_string(),
            show_reasoning: true,
        }
    }
}

impl CompanionConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: lookup("COMPANION_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            conversation_id: lookup("COMPANION_CONVERSATION_ID")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.conversation_id),
            show_reasoning: lookup("COMPANION_SHOW_REASONING")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.show_reasoning),
        }
    }

    /// # Errors
    ///
    /// Fails unless the configured URL is an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason,
        };
        let url = Url::parse(&self.api_base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        Ok(url)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
