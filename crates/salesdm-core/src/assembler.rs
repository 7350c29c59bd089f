//! Response assembler: runs classifier, template engine and channel
//! adapter in sequence and checks the finished response

use tracing::debug;

use crate::channel;
use crate::error::{CoreError, Result};
use crate::intent::{self, Classification};
use crate::template;
use crate::types::{AgentPersona, AgentRequest, AgentResponse, ChannelId, Intent};

/// Build the full response for one request. Deterministic and stateless:
/// identical requests give identical responses.
pub fn generate_reply(request: &AgentRequest) -> Result<AgentResponse> {
    let classification = intent::classify(&request.message);
    let persona = &request.persona;
    let platform = request.platform;

    let base = template::compose(
        classification.intent,
        persona,
        request.customer_name.as_deref(),
    );
    let styled = channel::adapt(&base, platform);
    let reply = channel::attach_call_to_action(&styled, persona, platform);

    let response = AgentResponse {
        reply,
        intent: classification.intent,
        confidence: classification.confidence,
        call_to_action: channel::derive_call_to_action(persona, platform),
        follow_up: channel::derive_follow_up(persona, platform),
        suggested_next_steps: next_steps(&classification),
    };

    ensure_invariants(&response, request)?;
    debug!(
        "Generated {} reply for {} ({} chars, {} next steps)",
        response.intent,
        platform,
        response.reply.len(),
        response.suggested_next_steps.len()
    );
    Ok(response)
}

/// Same as [`generate_reply`] for callers holding an unparsed platform
/// string. Values outside the channel set fail with
/// [`CoreError::UnsupportedChannel`] and never fall back to a default style.
pub fn generate_reply_for(
    message: &str,
    platform: &str,
    persona: AgentPersona,
    customer_name: Option<String>,
) -> Result<AgentResponse> {
    let platform: ChannelId = platform.parse()?;
    let request = AgentRequest {
        message: message.to_string(),
        platform,
        persona,
        customer_name,
    };
    generate_reply(&request)
}

/// Operator checklist for each intent, most urgent first
fn checklist(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::ReadyToBuy => &[
            "Confirm payment method",
            "Send checkout link",
            "Log as hot lead",
        ],
        Intent::PricingInquiry => &[
            "Share the current price list",
            "Offer a bundle or time-limited incentive",
            "Tag as price-sensitive lead",
        ],
        Intent::ShippingInquiry => &[
            "Confirm delivery location and timeline",
            "Share delivery fees and courier options",
            "Tag as logistics question",
        ],
        Intent::ProductInterest => &[
            "Send product photos or the catalog",
            "Recommend the best-fit option",
            "Tag as warm lead",
        ],
        Intent::Objection => &[
            "Address the concern with social proof",
            "Restate the guarantee",
            "Schedule a gentle follow-up",
        ],
        Intent::Greeting => &[
            "Qualify what the customer needs",
            "Introduce the signature offer",
        ],
        Intent::Unclassified => &[
            "Ask a clarifying question",
            "Route to a human agent if still unclear",
        ],
    }
}

/// Primary intent's checklist, plus the runner-up's lead step when the
/// message touched a second topic
fn next_steps(classification: &Classification) -> Vec<String> {
    let mut steps: Vec<String> = checklist(classification.intent)
        .iter()
        .map(|s| s.to_string())
        .collect();

    if let Some(secondary) = classification.secondary {
        if let Some(lead) = checklist(secondary).first() {
            if !steps.iter().any(|s| s == lead) {
                steps.push(format!("Also: {}", lead));
            }
        }
    }
    steps
}

fn ensure_invariants(response: &AgentResponse, request: &AgentRequest) -> Result<()> {
    if !response.confidence.is_finite() || !(0.0..=1.0).contains(&response.confidence) {
        return Err(CoreError::InvariantViolation(format!(
            "confidence {} outside [0, 1]",
            response.confidence
        )));
    }
    if response.suggested_next_steps.is_empty() {
        return Err(CoreError::InvariantViolation(
            "no suggested next steps".to_string(),
        ));
    }
    if response.reply.trim().is_empty() {
        return Err(CoreError::InvariantViolation("empty reply".to_string()));
    }
    // Placeholder-looking text supplied by the caller is echoed verbatim
    if template::has_placeholder(&response.reply) && !inputs_hold_placeholder(request) {
        return Err(CoreError::InvariantViolation(
            "unresolved placeholder in reply".to_string(),
        ));
    }
    Ok(())
}

fn inputs_hold_placeholder(request: &AgentRequest) -> bool {
    let p = &request.persona;
    [
        p.brand_name.as_str(),
        p.signature_offer.as_str(),
        p.call_to_action.as_str(),
        p.guarantee.as_str(),
        p.follow_up_delay.as_str(),
        request.customer_name.as_deref().unwrap_or_default(),
    ]
    .iter()
    .any(|value| template::has_placeholder(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DHAKA: &str = "How much is your starter package and do you deliver outside Dhaka?";

    fn request(message: &str, platform: ChannelId) -> AgentRequest {
        AgentRequest::new(message, platform, AgentPersona::default())
    }

    #[test]
    fn test_dhaka_pricing_example() {
        let persona = AgentPersona::default();
        let response = generate_reply(&request(DHAKA, ChannelId::WhatsApp)).unwrap();

        assert_eq!(response.intent, Intent::PricingInquiry);
        assert!(response.confidence > 0.5);
        assert!(response.reply.contains(&persona.brand_name));
        assert!(response.reply.contains(&persona.signature_offer));
        assert!(response.call_to_action.contains(&persona.call_to_action));
        assert!(response.follow_up.contains(&persona.follow_up_delay));
        assert!(
            response
                .suggested_next_steps
                .contains(&"Also: Confirm delivery location and timeline".to_string())
        );
    }

    #[test]
    fn test_properties_hold_across_inputs() {
        let messages = [
            "hi",
            "I'll take it, how do I pay?",
            "Do you ship to Sylhet?",
            "Tell me more about the bundle",
            "Too expensive for me",
            "qwerty",
            "",
            "   ",
        ];
        for message in messages {
            for channel in ChannelId::ALL {
                let response = generate_reply(&request(message, channel)).unwrap();
                assert!((0.0..=1.0).contains(&response.confidence));
                assert!(!response.suggested_next_steps.is_empty());
                assert!(!template::has_placeholder(&response.reply));
                assert!(!response.reply.is_empty());
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let req = request(DHAKA, ChannelId::Instagram).with_customer_name("Rafi");
        let first = serde_json::to_string(&generate_reply(&req).unwrap()).unwrap();
        let second = serde_json::to_string(&generate_reply(&req).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fallback_safety() {
        for message in ["", "  \t\n"] {
            let response = generate_reply(&request(message, ChannelId::Messenger)).unwrap();
            assert_eq!(response.intent, Intent::Unclassified);
            assert!(response.confidence <= 0.3);
            assert_eq!(response.suggested_next_steps[0], "Ask a clarifying question");
        }
    }

    #[test]
    fn test_brand_name_echo() {
        let mut req = request("hello", ChannelId::WhatsApp);
        req.persona.brand_name = "Pulse Fitness Lab".to_string();
        let response = generate_reply(&req).unwrap();
        assert!(response.reply.contains("Pulse Fitness Lab"));
        assert!(!response.reply.contains("Aurora Labs"));
    }

    #[test]
    fn test_call_to_action_echo() {
        let mut req = request("hello", ChannelId::Messenger);
        let before = generate_reply(&req).unwrap().call_to_action;
        req.persona.call_to_action = "Start your tasting flight".to_string();
        let after = generate_reply(&req).unwrap().call_to_action;
        assert_ne!(before, after);
        assert!(after.contains("Start your tasting flight"));
    }

    #[test]
    fn test_channel_sensitivity() {
        let whatsapp = generate_reply(&request(DHAKA, ChannelId::WhatsApp)).unwrap();
        let instagram = generate_reply(&request(DHAKA, ChannelId::Instagram)).unwrap();
        assert_eq!(whatsapp.intent, instagram.intent);
        assert_ne!(whatsapp.reply, instagram.reply);
        assert_ne!(whatsapp.follow_up, instagram.follow_up);
    }

    #[test]
    fn test_ready_to_buy_checklist() {
        let response =
            generate_reply(&request("Sign me up, where do I pay?", ChannelId::WhatsApp)).unwrap();
        assert_eq!(response.intent, Intent::ReadyToBuy);
        assert_eq!(
            &response.suggested_next_steps[..3],
            ["Confirm payment method", "Send checkout link", "Log as hot lead"]
        );
    }

    #[test]
    fn test_unsupported_platform() {
        let err = generate_reply_for("hello", "telegram", AgentPersona::default(), None)
            .unwrap_err();
        assert_eq!(err, CoreError::UnsupportedChannel("telegram".to_string()));
    }

    #[test]
    fn test_generate_reply_for_valid_platform() {
        let response = generate_reply_for(
            "hello",
            "Instagram",
            AgentPersona::default(),
            Some("Mim".to_string()),
        )
        .unwrap();
        assert_eq!(response.intent, Intent::Greeting);
        assert!(response.reply.contains("Mim"));
    }

    #[test]
    fn test_placeholder_text_in_persona_is_echoed() {
        let mut req = request("hello", ChannelId::WhatsApp);
        req.persona.brand_name = "{brand} Studio".to_string();
        let response = generate_reply(&req).unwrap();
        assert!(response.reply.contains("{brand} Studio"));
    }

    #[test]
    fn test_every_intent_has_checklist() {
        for intent in Intent::PRIORITY.into_iter().chain([Intent::Unclassified]) {
            assert!(!checklist(intent).is_empty(), "{intent}");
        }
    }

    #[test]
    fn test_ensure_invariants_rejects_bad_confidence() {
        let req = request("hi", ChannelId::WhatsApp);
        let mut response = generate_reply(&req).unwrap();
        response.confidence = 1.5;
        assert!(matches!(
            ensure_invariants(&response, &req),
            Err(CoreError::InvariantViolation(_))
        ));
        response.confidence = f64::NAN;
        assert!(ensure_invariants(&response, &req).is_err());
    }

    #[test]
    fn test_ensure_invariants_rejects_unresolved_placeholder() {
        let req = request("hi", ChannelId::WhatsApp);
        let mut response = generate_reply(&req).unwrap();
        response.reply.push_str(" {offer}");
        assert!(ensure_invariants(&response, &req).is_err());
    }
}
