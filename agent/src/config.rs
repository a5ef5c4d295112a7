//! Configuration loading

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-project config file
pub const CONFIG_FILE: &str = ".content-agent.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/content-agent/
///
/// Returns the path if found, None otherwise.
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("content-agent").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================================
// Application Configuration (.content-agent.toml)
// ============================================================================

/// Top-level configuration
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub server: ServerSectionConfig,
}

/// LLM configuration section (any OpenAI-compatible chat completions API)
#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// Prompt template section
#[derive(Debug, Default, Deserialize)]
pub struct PromptsConfig {
    /// Directory with markdown templates overriding the built-in ones
    pub dir: Option<PathBuf>,
}

/// Which image generation backend to call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageProvider {
    #[default]
    Dalle3,
    Recraft,
}

/// How the image pipeline turns a query into images
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMode {
    /// A prompt-crafting agent writes the image prompts first
    #[default]
    TwoStage,
    /// The user query is used as the image prompt
    SingleStage,
}

/// Image generation section
#[derive(Debug, Deserialize)]
pub struct ImageConfig {
    #[serde(default)]
    pub provider: ImageProvider,
    #[serde(default)]
    pub mode: ImageMode,
    #[serde(default = "default_image_size")]
    pub size: String,
    #[serde(default = "default_image_quality")]
    pub quality: String,
    #[serde(default)]
    pub recraft: RecraftConfig,
}

/// Recraft (OpenAI-compatible images API) settings
#[derive(Debug, Deserialize)]
pub struct RecraftConfig {
    #[serde(default = "default_recraft_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_recraft_style")]
    pub style: String,
    #[serde(default = "default_number_of_images")]
    pub number_of_images: u32,
    #[serde(default = "default_image_size")]
    pub size: String,
    #[serde(default = "default_response_format")]
    pub response_format: String,
}

/// Twilio WhatsApp delivery section
#[derive(Debug, Deserialize)]
pub struct TwilioConfig {
    #[serde(default = "default_twilio_base_url")]
    pub base_url: String,
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    /// Sender number (`whatsapp:` prefix optional)
    pub whatsapp_number: Option<String>,
    /// Recipient number; delivery is skipped when unset
    pub whatsapp_to: Option<String>,
}

/// HTTP server section
#[derive(Debug, Deserialize)]
pub struct ServerSectionConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_image_quality() -> String {
    "standard".to_string()
}

fn default_recraft_base_url() -> String {
    "https://external.api.recraft.ai/v1".to_string()
}

fn default_recraft_style() -> String {
    "digital_illustration".to_string()
}

fn default_number_of_images() -> u32 {
    1
}

fn default_response_format() -> String {
    "url".to_string()
}

fn default_twilio_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_model(),
            api_key: None,
            temperature: default_temperature(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            provider: ImageProvider::default(),
            mode: ImageMode::default(),
            size: default_image_size(),
            quality: default_image_quality(),
            recraft: RecraftConfig::default(),
        }
    }
}

impl Default for RecraftConfig {
    fn default() -> Self {
        Self {
            base_url: default_recraft_base_url(),
            api_key: None,
            style: default_recraft_style(),
            number_of_images: default_number_of_images(),
            size: default_image_size(),
            response_format: default_response_format(),
        }
    }
}

impl Default for TwilioConfig {
    fn default() -> Self {
        Self {
            base_url: default_twilio_base_url(),
            account_sid: None,
            auth_token: None,
            whatsapp_number: None,
            whatsapp_to: None,
        }
    }
}

impl Default for ServerSectionConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Load config from .content-agent.toml, then apply environment overrides
    ///
    /// Search order:
    /// 1. Walk up directory tree from cwd looking for .content-agent.toml
    /// 2. Check ~/.config/content-agent/.content-agent.toml (global fallback)
    /// 3. Fall back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match find_config_file(CONFIG_FILE) {
            Some(config_path) => {
                tracing::debug!("Loading config from: {}", config_path.display());
                Self::load_from_path(&config_path)?
            }
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a specific path (no environment overrides)
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Overlay secrets and addresses from the environment.
    ///
    /// Non-empty variables win over file values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.llm.model = v;
        }
        if let Some(v) = get("RECRAFT_API_KEY") {
            self.image.recraft.api_key = Some(v);
        }
        if let Some(v) = get("TWILIO_ACCOUNT_SID") {
            self.twilio.account_sid = Some(v);
        }
        if let Some(v) = get("TWILIO_AUTH_TOKEN") {
            self.twilio.auth_token = Some(v);
        }
        if let Some(v) = get("TWILIO_WHATSAPP_NUMBER") {
            self.twilio.whatsapp_number = Some(v);
        }
        if let Some(v) = get("TWILIO_WHATSAPP_TO") {
            self.twilio.whatsapp_to = Some(v);
        }
    }
}
