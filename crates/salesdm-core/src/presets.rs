//! Ready-made personas for quick persona swaps

use crate::types::AgentPersona;

/// A named persona preset
#[derive(Debug, Clone, Copy)]
pub struct PersonaPreset {
    pub brand_name: &'static str,
    pub brand_voice: &'static str,
    pub signature_offer: &'static str,
    pub call_to_action: &'static str,
    pub guarantee: &'static str,
    pub follow_up_delay: &'static str,
}

impl PersonaPreset {
    pub fn to_persona(&self) -> AgentPersona {
        AgentPersona {
            brand_name: self.brand_name.to_string(),
            brand_voice: self.brand_voice.to_string(),
            signature_offer: self.signature_offer.to_string(),
            call_to_action: self.call_to_action.to_string(),
            guarantee: self.guarantee.to_string(),
            follow_up_delay: self.follow_up_delay.to_string(),
        }
    }
}

pub const PRESETS: [PersonaPreset; 3] = [
    PersonaPreset {
        brand_name: "Glow Atelier",
        brand_voice: "Playful, glam, hype-building",
        signature_offer: "made-to-order glam bundles",
        call_to_action: "Claim your VIP styling consult",
        guarantee: "We save a slot for you and send curated looks in minutes.",
        follow_up_delay: "5 minutes",
    },
    PersonaPreset {
        brand_name: "Pulse Fitness Lab",
        brand_voice: "Direct, motivational, data-backed",
        signature_offer: "12-week performance jumpstart program",
        call_to_action: "Schedule your performance audit",
        guarantee: "We map a measurable win for your next 30 days.",
        follow_up_delay: "90 seconds",
    },
    PersonaPreset {
        brand_name: "Bloom & Bean",
        brand_voice: "Cozy, reassuring, service-first",
        signature_offer: "artisan coffee subscriptions",
        call_to_action: "Start your tasting flight",
        guarantee: "We roast after you order so every cup arrives fresh.",
        follow_up_delay: "4 minutes",
    },
];

/// All presets as owned personas
pub fn all() -> Vec<AgentPersona> {
    PRESETS.iter().map(PersonaPreset::to_persona).collect()
}

/// Look up a preset by brand name, ignoring case and surrounding whitespace
pub fn find(name: &str) -> Option<AgentPersona> {
    let wanted = name.trim();
    PRESETS
        .iter()
        .find(|p| p.brand_name.eq_ignore_ascii_case(wanted))
        .map(PersonaPreset::to_persona)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::VoiceRegister;

    #[test]
    fn test_find_preset() {
        let persona = find("bloom & bean").unwrap();
        assert_eq!(persona.brand_name, "Bloom & Bean");
        assert_eq!(persona.follow_up_delay, "4 minutes");
        assert!(find(" Glow Atelier ").is_some());
        assert!(find("Unknown Brand").is_none());
    }

    #[test]
    fn test_all_presets_complete() {
        let personas = all();
        assert_eq!(personas.len(), PRESETS.len());
        for p in personas {
            for field in [
                &p.brand_name,
                &p.brand_voice,
                &p.signature_offer,
                &p.call_to_action,
                &p.guarantee,
                &p.follow_up_delay,
            ] {
                assert!(!field.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_presets_cover_distinct_registers() {
        let registers: Vec<VoiceRegister> = PRESETS
            .iter()
            .map(|p| VoiceRegister::from_voice(p.brand_voice))
            .collect();
        assert_eq!(
            registers,
            vec![VoiceRegister::Playful, VoiceRegister::Direct, VoiceRegister::Warm]
        );
    }
}
