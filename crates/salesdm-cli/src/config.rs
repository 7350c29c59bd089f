use anyhow::{Context, Result};
use salesdm_core::{AgentPersona, PersonaOverride};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesdmConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub persona: PersonaSection,
}

/// `[persona]` table. Keys are snake_case like the rest of the file;
/// the camelCase names used on the HTTP wire are accepted too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSection {
    #[serde(default, alias = "brandName", skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, alias = "brandVoice", skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
    #[serde(default, alias = "signatureOffer", skip_serializing_if = "Option::is_none")]
    pub signature_offer: Option<String>,
    #[serde(default, alias = "callToAction", skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guarantee: Option<String>,
    #[serde(default, alias = "followUpDelay", skip_serializing_if = "Option::is_none")]
    pub follow_up_delay: Option<String>,
}

impl From<&PersonaSection> for PersonaOverride {
    fn from(section: &PersonaSection) -> Self {
        Self {
            brand_name: section.brand_name.clone(),
            brand_voice: section.brand_voice.clone(),
            signature_offer: section.signature_offer.clone(),
            call_to_action: section.call_to_action.clone(),
            guarantee: section.guarantee.clone(),
            follow_up_delay: section.follow_up_delay.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".salesdm")
}

impl SalesdmConfig {
    /// Load from `custom_path`, or `~/.salesdm/config.toml`.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit path is an error.
    pub fn load(custom_path: &Option<PathBuf>) -> Result<Self> {
        let path = match custom_path {
            Some(path) => path.clone(),
            None => {
                let path = config_dir().join("config.toml");
                if !path.exists() {
                    debug!("No config at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    /// Built-in default persona with the `[persona]` section applied
    pub fn persona(&self) -> AgentPersona {
        AgentPersona::default().merged(&PersonaOverride::from(&self.persona))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.server.bind))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
