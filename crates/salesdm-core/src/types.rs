//! Shared types for salesdm-core

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Messaging surface a reply is written for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ChannelId {
    WhatsApp,
    Messenger,
    Instagram,
}

impl ChannelId {
    pub const ALL: [ChannelId; 3] = [Self::WhatsApp, Self::Messenger, Self::Instagram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WhatsApp => "whatsapp",
            Self::Messenger => "messenger",
            Self::Instagram => "instagram",
        }
    }

    /// Human-facing channel name
    pub fn label(&self) -> &'static str {
        match self {
            Self::WhatsApp => "WhatsApp",
            Self::Messenger => "Messenger",
            Self::Instagram => "Instagram DM",
        }
    }

    /// One-line pitch of what the agent does on this channel
    pub fn blurb(&self) -> &'static str {
        match self {
            Self::WhatsApp => "Lightning-fast responses with CTA buttons and catalog hand-offs.",
            Self::Messenger => "Smart scripts that sync with your Facebook page automations.",
            Self::Instagram => "Story-friendly replies tuned for creators and shoppers.",
        }
    }
}

impl FromStr for ChannelId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" => Ok(Self::WhatsApp),
            "messenger" => Ok(Self::Messenger),
            "instagram" => Ok(Self::Instagram),
            _ => Err(CoreError::UnsupportedChannel(s.to_string())),
        }
    }
}

impl TryFrom<String> for ChannelId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified purpose of a customer message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ReadyToBuy,
    PricingInquiry,
    ShippingInquiry,
    ProductInterest,
    Objection,
    Greeting,
    /// Fallback when no rule matched
    Unclassified,
}

impl Intent {
    /// Scored intents in tie-break order, highest priority first
    pub const PRIORITY: [Intent; 6] = [
        Self::ReadyToBuy,
        Self::PricingInquiry,
        Self::ShippingInquiry,
        Self::ProductInterest,
        Self::Objection,
        Self::Greeting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadyToBuy => "ready_to_buy",
            Self::PricingInquiry => "pricing_inquiry",
            Self::ShippingInquiry => "shipping_inquiry",
            Self::ProductInterest => "product_interest",
            Self::Objection => "objection",
            Self::Greeting => "greeting",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A brand's voice and offer profile. Passed in by the caller on every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPersona {
    pub brand_name: String,
    /// Free-text tone descriptor, e.g. "Playful, glam, hype-building"
    pub brand_voice: String,
    pub signature_offer: String,
    pub call_to_action: String,
    pub guarantee: String,
    /// Human-readable duration, e.g. "5 minutes"
    pub follow_up_delay: String,
}

impl Default for AgentPersona {
    fn default() -> Self {
        Self {
            brand_name: "Aurora Labs".to_string(),
            brand_voice: "Confident, friendly, consultative".to_string(),
            signature_offer: "starter growth package".to_string(),
            call_to_action: "Book your free strategy call".to_string(),
            guarantee: "We reply within minutes and tailor every plan to your goals.".to_string(),
            follow_up_delay: "10 minutes".to_string(),
        }
    }
}

impl AgentPersona {
    /// Apply every field present in `overrides` on top of this persona
    pub fn merged(&self, overrides: &PersonaOverride) -> Self {
        let pick = |over: &Option<String>, base: &String| over.clone().unwrap_or_else(|| base.clone());
        Self {
            brand_name: pick(&overrides.brand_name, &self.brand_name),
            brand_voice: pick(&overrides.brand_voice, &self.brand_voice),
            signature_offer: pick(&overrides.signature_offer, &self.signature_offer),
            call_to_action: pick(&overrides.call_to_action, &self.call_to_action),
            guarantee: pick(&overrides.guarantee, &self.guarantee),
            follow_up_delay: pick(&overrides.follow_up_delay, &self.follow_up_delay),
        }
    }
}

/// Partial persona supplied by a caller or a config file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonaOverride {
    #[serde(default, alias = "brand_name", skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default, alias = "brand_voice", skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
    #[serde(default, alias = "signature_offer", skip_serializing_if = "Option::is_none")]
    pub signature_offer: Option<String>,
    #[serde(default, alias = "call_to_action", skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guarantee: Option<String>,
    #[serde(default, alias = "follow_up_delay", skip_serializing_if = "Option::is_none")]
    pub follow_up_delay: Option<String>,
}

impl PersonaOverride {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Input to the reply engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub message: String,
    pub platform: ChannelId,
    pub persona: AgentPersona,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

impl AgentRequest {
    pub fn new(message: impl Into<String>, platform: ChannelId, persona: AgentPersona) -> Self {
        Self {
            message: message.into(),
            platform,
            persona,
            customer_name: None,
        }
    }

    pub fn with_customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }
}

/// Output of the reply engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub reply: String,
    pub intent: Intent,
    /// Always within [0, 1]
    pub confidence: f64,
    pub call_to_action: String,
    pub follow_up: String,
    /// Operator checklist, never empty
    pub suggested_next_steps: Vec<String>,
}
