//! Gateway HTTP protocol: JSON bodies exchanged with the front-end

use salesdm_core::{ChannelId, PersonaOverride};
use serde::{Deserialize, Serialize};

/// Client → Gateway body for `POST /api/respond`.
///
/// Every field is optional on the wire so the handler can answer a
/// missing `message` or `platform` with its own 400 instead of a
/// deserializer rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub persona: Option<PersonaOverride>,
    #[serde(default)]
    pub customer_name: Option<String>,
}

/// Error body for every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Entry in `GET /api/channels`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub label: String,
    pub blurb: String,
}

impl From<ChannelId> for ChannelInfo {
    fn from(id: ChannelId) -> Self {
        Self {
            id,
            label: id.label().to_string(),
            blurb: id.blurb().to_string(),
        }
    }
}

// ── Routes ──

pub mod routes {
    pub const RESPOND: &str = "/api/respond";
    pub const STATUS: &str = "/api/status";
    pub const PRESETS: &str = "/api/presets";
    pub const CHANNELS: &str = "/api/channels";
}

// ── Error messages ──

pub const ERR_MISSING_FIELDS: &str = "Missing message or platform.";
/// Malformed JSON is answered as a client error (400) with this message,
/// not as the generic [`ERR_INTERNAL`] 500.
pub const ERR_INVALID_BODY: &str = "Invalid JSON body.";
pub const ERR_INTERNAL: &str = "Failed to craft response.";
