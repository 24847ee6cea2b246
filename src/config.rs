use std::fmt;

use thiserror::Error;

/// Environment variable holding the chat service credential.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
/// Cap on the length of each assistant reply.
pub const DEFAULT_MAX_TOKENS: u32 = 400;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,
}

/// Settings for the chat assistant.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

// Keep the credential out of logs.
impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ChatConfig {
    /// Read the credential from the environment, after loading a `.env`
    /// file if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_key(std::env::var(API_KEY_VAR).ok())
    }

    /// Build a config from an optional key; blank keys count as missing.
    pub fn from_key(key: Option<String>) -> Result<Self, ConfigError> {
        let api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        Ok(Self {
            api_key,
            ..Self::default()
        })
    }
}
