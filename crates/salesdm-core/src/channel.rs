//! Channel style adapter
//!
//! Lays out a base reply for a messaging surface and derives the
//! channel-specific call-to-action and follow-up text. Styling only
//! changes separators and emoji; the words written by the template
//! engine are never edited.

use crate::template::{self, DEFAULT_CALL_TO_ACTION, DEFAULT_DELAY};
use crate::types::{AgentPersona, ChannelId};

/// How densely emoji are sprinkled into a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiDensity {
    None,
    /// One emoji after the last segment
    Closing,
    /// One emoji after every segment, rotating through the set
    PerSegment,
}

/// Formatting rules for one channel
#[derive(Debug, Clone, Copy)]
pub struct ChannelStyle {
    pub channel: ChannelId,
    /// Joins the template's segments
    pub separator: &'static str,
    pub emoji_density: EmojiDensity,
    pub emoji: &'static [&'static str],
    /// Appended to the reply. Placeholders: `{cta}`
    pub cta_block: &'static str,
    /// Operator-facing CTA label. Placeholders: `{cta}`
    pub cta_label: &'static str,
    /// Placeholders: `{cta}`, `{delay}`
    pub follow_up: &'static str,
}

const WHATSAPP: ChannelStyle = ChannelStyle {
    channel: ChannelId::WhatsApp,
    separator: "\n\n",
    emoji_density: EmojiDensity::None,
    emoji: &[],
    cta_block: "\n\n*Reply with a number:*\n1. {cta}\n2. Talk to a specialist",
    cta_label: "Reply 1: {cta}",
    follow_up: "Send a WhatsApp reminder with the \"{cta}\" menu in {delay} if the customer hasn't replied.",
};

const MESSENGER: ChannelStyle = ChannelStyle {
    channel: ChannelId::Messenger,
    separator: " ",
    emoji_density: EmojiDensity::Closing,
    emoji: &["\u{1F642}"],
    cta_block: "\n\n\u{1F449} Tap \"{cta}\" below to get started.",
    cta_label: "Button: {cta}",
    follow_up: "Trigger a Messenger follow-up with a \"{cta}\" button in {delay} if there's no response.",
};

const INSTAGRAM: ChannelStyle = ChannelStyle {
    channel: ChannelId::Instagram,
    separator: "\n",
    emoji_density: EmojiDensity::PerSegment,
    emoji: &["\u{2728}", "\u{1F496}", "\u{1F64C}", "\u{1F4AB}"],
    cta_block: "\n\n{cta} \u{1F48C} Just reply \"YES\" and we'll handle the rest!",
    cta_label: "{cta} (reply \"YES\")",
    follow_up: "Drop a friendly Instagram DM nudge in {delay} if they leave you on read.",
};

/// Style table entry for `channel`
pub fn style_for(channel: ChannelId) -> &'static ChannelStyle {
    match channel {
        ChannelId::WhatsApp => &WHATSAPP,
        ChannelId::Messenger => &MESSENGER,
        ChannelId::Instagram => &INSTAGRAM,
    }
}

/// Lay out `base_reply` for `channel`. Each non-empty line of the base
/// reply is one segment.
pub fn adapt(base_reply: &str, channel: ChannelId) -> String {
    let style = style_for(channel);
    let segments: Vec<&str> = base_reply
        .lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let last = segments.len().saturating_sub(1);

    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| match style.emoji_density {
            EmojiDensity::PerSegment if !style.emoji.is_empty() => {
                format!("{} {}", segment, style.emoji[i % style.emoji.len()])
            }
            EmojiDensity::Closing if i == last && !style.emoji.is_empty() => {
                format!("{} {}", segment, style.emoji[0])
            }
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join(style.separator)
}

/// Append the channel's call-to-action block to a styled reply
pub fn attach_call_to_action(styled: &str, persona: &AgentPersona, channel: ChannelId) -> String {
    let block = fill(style_for(channel).cta_block, persona);
    format!("{}{}", styled, block)
}

/// Call-to-action phrased for `channel`; contains the persona CTA verbatim
pub fn derive_call_to_action(persona: &AgentPersona, channel: ChannelId) -> String {
    fill(style_for(channel).cta_label, persona)
}

/// Automated follow-up instruction for `channel`; contains the persona delay verbatim
pub fn derive_follow_up(persona: &AgentPersona, channel: ChannelId) -> String {
    fill(style_for(channel).follow_up, persona)
}

fn fill(format: &str, persona: &AgentPersona) -> String {
    let cta = template::field_or(&persona.call_to_action, DEFAULT_CALL_TO_ACTION);
    let delay = template::field_or(&persona.follow_up_delay, DEFAULT_DELAY);
    template::render(format, |key| match key {
        "cta" => Some(cta.as_str()),
        "delay" => Some(delay.as_str()),
        _ => None,
    })
}
