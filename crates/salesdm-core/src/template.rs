//! Persona template engine
//!
//! Turns an intent into a channel-agnostic base reply written in the
//! brand's voice. Each line of a template is one segment; the channel
//! adapter decides how segments are laid out.

use tracing::debug;

use crate::types::{AgentPersona, Intent};

/// Substituted for a missing or blank customer name
pub const NEUTRAL_NAME: &str = "there";

const DEFAULT_BRAND: &str = "our team";
const DEFAULT_OFFER: &str = "signature offer";
const DEFAULT_GUARANTEE: &str = "We take care of every detail for you.";
pub(crate) const DEFAULT_CALL_TO_ACTION: &str = "Reply to get started";
pub(crate) const DEFAULT_DELAY: &str = "a few minutes";

/// Phrasing register picked from the persona's brand voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceRegister {
    Playful,
    Direct,
    Warm,
    Professional,
}

impl VoiceRegister {
    pub const ALL: [VoiceRegister; 4] = [Self::Playful, Self::Direct, Self::Warm, Self::Professional];

    /// Pick a register from a free-text voice descriptor. Keywords match
    /// whole words, either a hyphenated compound ("no-nonsense") or one of
    /// its parts ("data" in "data-backed"). First matching register wins;
    /// anything unrecognized reads as professional.
    pub fn from_voice(brand_voice: &str) -> Self {
        let lower = brand_voice.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|w| !w.is_empty())
            .collect();
        let has_any = |keywords: &[&str]| {
            words.iter().any(|word| {
                keywords
                    .iter()
                    .any(|k| word == k || word.split('-').any(|part| part == *k))
            })
        };

        if has_any(&["playful", "glam", "hype", "fun", "bubbly", "cheeky", "bold"]) {
            Self::Playful
        } else if has_any(&["direct", "motivational", "data", "no-nonsense", "energetic"]) {
            Self::Direct
        } else if has_any(&["cozy", "cosy", "reassuring", "warm", "caring", "gentle", "service"]) {
            Self::Warm
        } else {
            Self::Professional
        }
    }

    fn opener(&self, name: &str) -> String {
        match self {
            Self::Playful => format!("Hey {}!", name),
            Self::Direct => format!("Hi {}.", name),
            Self::Warm => format!("Hi {}, lovely to hear from you.", name),
            Self::Professional => format!("Hello {},", name),
        }
    }

    fn closer(&self) -> &'static str {
        match self {
            Self::Playful => "Let's make it happen!",
            Self::Direct => "Let's get you results.",
            Self::Warm => "We're here whenever you're ready.",
            Self::Professional => "Looking forward to helping you.",
        }
    }
}

/// One curated template per intent
fn template_for(intent: Intent) -> &'static str {
    match intent {
        Intent::ReadyToBuy => {
            "{opener} Amazing, let's get your {offer} locked in with {brand}.\n\
             {guarantee}\n\
             {closer}"
        }
        Intent::PricingInquiry => {
            "{opener} Thanks for asking about pricing at {brand}.\n\
             Our {offer} is built to give you real value from day one.\n\
             {guarantee}\n\
             Want me to send the current options so you can pick the best fit?"
        }
        Intent::ShippingInquiry => {
            "{opener} Great question about delivery.\n\
             {brand} ships the {offer} to you and confirms timing as soon as your order is in.\n\
             {guarantee}\n\
             {closer}"
        }
        Intent::ProductInterest => {
            "{opener} So glad the {offer} caught your eye.\n\
             It's one of the most-loved picks at {brand}.\n\
             {guarantee}\n\
             {closer}"
        }
        Intent::Objection => {
            "{opener} Totally fair to take a moment.\n\
             Plenty of {brand} customers felt the same before trying the {offer}.\n\
             {guarantee}\n\
             No rush, I'll check back in {delay} in case any questions come up."
        }
        Intent::Greeting => {
            "{opener} Welcome to {brand}!\n\
             We can help you with the {offer} or anything else you need.\n\
             What can I help you with today?"
        }
        Intent::Unclassified => {
            "{opener} Thanks for reaching out to {brand}.\n\
             Could you share a bit more about what you're looking for?\n\
             Our {offer} might be a great fit.\n\
             {guarantee}"
        }
    }
}

/// Compose the base reply for `intent`. Infallible: the template table is
/// total and every placeholder has a value or a default.
pub fn compose(intent: Intent, persona: &AgentPersona, customer_name: Option<&str>) -> String {
    let register = VoiceRegister::from_voice(&persona.brand_voice);
    let name = customer_name
        .map(single_line)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| NEUTRAL_NAME.to_string());

    let opener = register.opener(&name);
    let brand = field_or(&persona.brand_name, DEFAULT_BRAND);
    let offer = field_or(&persona.signature_offer, DEFAULT_OFFER);
    let guarantee = field_or(&persona.guarantee, DEFAULT_GUARANTEE);
    let call_to_action = field_or(&persona.call_to_action, DEFAULT_CALL_TO_ACTION);
    let delay = field_or(&persona.follow_up_delay, DEFAULT_DELAY);

    debug!("Composing {} reply in {:?} register", intent, register);

    render(template_for(intent), |key| match key {
        "opener" => Some(opener.as_str()),
        "brand" => Some(brand.as_str()),
        "offer" => Some(offer.as_str()),
        "guarantee" => Some(guarantee.as_str()),
        "cta" => Some(call_to_action.as_str()),
        "delay" => Some(delay.as_str()),
        "closer" => Some(register.closer()),
        _ => None,
    })
}

/// Persona value with line breaks folded, or `default` when blank
pub fn field_or(value: &str, default: &str) -> String {
    let value = single_line(value);
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Trim and fold line breaks to single spaces. Other text is kept as written.
fn single_line(value: &str) -> String {
    value
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Single-pass `{key}` substitution. Substituted values are copied as-is
/// and never re-scanned, so braces inside persona text stay literal.
/// Unknown keys are kept verbatim.
pub(crate) fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len() + 128);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholder keys the engine substitutes
pub const PLACEHOLDERS: [&str; 7] = ["opener", "brand", "offer", "guarantee", "cta", "delay", "closer"];

/// Whether `text` still holds a raw placeholder token such as `{brand}`
pub fn has_placeholder(text: &str) -> bool {
    PLACEHOLDERS
        .iter()
        .any(|key| text.contains(&format!("{{{}}}", key)))
}
