//! Configuration types for the assistant.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Voice capture settings.
    pub capture: CaptureConfig,
    /// Speech emission settings.
    pub voice: VoiceConfig,
    /// Conversational fallback model settings.
    pub llm: LlmConfig,
    /// Web search settings.
    pub search: SearchConfig,
    /// Reminder scheduler settings.
    pub scheduler: SchedulerConfig,
    /// Notes viewer settings.
    pub notes: NotesConfig,
}

/// Voice capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Maximum seconds one listen attempt blocks before returning empty.
    pub listen_timeout_secs: u64,
    /// Ambient-noise calibration window before listening, in seconds.
    ///
    /// Only meaningful for microphone-backed capture engines; text
    /// injection skips it.
    pub calibration_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            listen_timeout_secs: 5,
            calibration_secs: 1,
        }
    }
}

/// Speech emission configuration.
///
/// Rates are words per minute. The default rate persists across utterances;
/// the other rates are one-utterance overrides used by specific responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Default speaking rate.
    pub rate: u32,
    /// Rate for interrupt confirmations.
    pub alert_rate: u32,
    /// Rate for search announcements.
    pub announce_rate: u32,
    /// Rate for the voice-compliment response.
    pub warm_rate: u32,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            rate: 150,
            alert_rate: 170,
            announce_rate: 165,
            warm_rate: 130,
        }
    }
}

/// Conversational fallback model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Full URL of the chat-completion endpoint.
    pub api_url: String,
    /// Model name to request from the API.
    pub api_model: String,
    /// API key for the remote provider. Empty disables the auth header.
    pub api_key: String,
    /// Environment variable consulted for the API key when `api_key` is
    /// empty at startup.
    pub api_key_env: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: usize,
    /// Sampling temperature.
    pub temperature: f64,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum non-system turns retained in the conversation history.
    pub max_history_turns: usize,
    /// System prompt seeding every conversation.
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://openrouter.ai/api/v1/chat/completions".to_owned(),
            api_model: "nvidia/nemotron-nano-12b-v2-vl:free".to_owned(),
            api_key: String::new(),
            api_key_env: "ARIA_API_KEY".to_owned(),
            max_tokens: 80,
            temperature: 0.5,
            request_timeout_secs: 20,
            max_history_turns: 10,
            system_prompt: "You are Aria, a helpful and slightly superior desktop assistant. \
                            Keep responses brief and relevant."
                .to_owned(),
        }
    }
}

/// Web search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// URL prefix the encoded query is appended to.
    pub query_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query_url: "https://www.google.com/search?q=".to_owned(),
        }
    }
}

/// Reminder scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Interval between due-reminder checks, in milliseconds.
    ///
    /// Must stay well under a minute so no fire minute is skipped.
    pub tick_interval_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

/// Notes viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Path of the plain-text notes file.
    pub path: PathBuf,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            path: default_root_dir().join("notes.txt"),
        }
    }
}

/// Returns the assistant's data directory: `~/.aria`.
#[must_use]
pub fn default_root_dir() -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        home.join(".aria")
    } else {
        PathBuf::from("/tmp").join(".aria")
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::AssistantError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::AssistantError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/aria/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("aria").join("config.toml")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".config").join("aria").join("config.toml")
        } else {
            PathBuf::from("/tmp/aria-config/config.toml")
        }
    }
}
