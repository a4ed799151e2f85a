use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::fetcher::FetchConfig;
use crate::llm::GeminiConfig;
use crate::picker::PickerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Gemini model access. Without an API key the service runs in demo mode.
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub picker: PickerConfig,
}

impl Config {
    /// Returns true if no Gemini API key is configured.
    pub fn is_demo(&self) -> bool {
        self.gemini
            .as_ref()
            .and_then(|g| g.credential())
            .is_none()
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini: Option<SanitizedGeminiConfig>,
    pub fetch: FetchConfig,
    pub picker: PickerConfig,
    pub demo_mode: bool,
}

/// Sanitized Gemini config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGeminiConfig {
    pub model: String,
    pub api_base: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            gemini: config.gemini.as_ref().map(|g| SanitizedGeminiConfig {
                model: g.model.clone(),
                api_base: g.api_base.clone(),
                api_key_configured: g.credential().is_some(),
                timeout_secs: g.timeout_secs,
            }),
            fetch: config.fetch.clone(),
            picker: config.picker.clone(),
            demo_mode: config.is_demo(),
        }
    }
}
