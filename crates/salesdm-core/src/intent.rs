//! Rule-based intent classification
//!
//! Scores a customer message against weighted term tables, one table per
//! intent. Matching is case-insensitive and works on whole words, so
//! "deliver" does not fire on "delivery" and "hi" does not fire on "this";
//! multi-word terms must appear as a contiguous phrase.
//!
//! The winning intent's score is normalized into a confidence:
//!
//! ```text
//! confidence = score / (score + SMOOTHING)
//! ```
//!
//! Ties go to the intent listed first in [`Intent::PRIORITY`].

use tracing::debug;

use crate::types::Intent;

/// Added to the winning score before normalizing, so one weak hit stays below 0.5
pub const SMOOTHING: f64 = 1.0;

/// Confidence reported when the message is non-empty but nothing matched
pub const FALLBACK_CONFIDENCE: f64 = 0.1;

/// Result of classifying one message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    /// Always within [0, 1]
    pub confidence: f64,
    /// Raw matched weight behind `intent`
    pub score: f64,
    /// Runner-up intent with a non-zero score, if any
    pub secondary: Option<Intent>,
}

impl Classification {
    fn fallback(confidence: f64) -> Self {
        Self {
            intent: Intent::Unclassified,
            confidence,
            score: 0.0,
            secondary: None,
        }
    }
}

type Terms = &'static [(&'static str, f64)];

const READY_TO_BUY: Terms = &[
    ("buy", 1.5),
    ("purchase", 1.5),
    ("order", 1.0),
    ("place an order", 2.0),
    ("checkout", 2.0),
    ("add to cart", 2.0),
    ("ready to", 1.5),
    ("sign me up", 2.5),
    ("i want it", 2.0),
    ("i'll take", 2.0),
    ("take it", 1.5),
    ("let's do it", 2.0),
    ("i'm in", 2.0),
    ("how do i pay", 2.5),
    ("where do i pay", 2.5),
    ("pay", 1.0),
    ("payment", 1.0),
    ("invoice", 1.0),
    ("bkash", 1.0),
];

const PRICING: Terms = &[
    ("how much", 2.0),
    ("price", 2.0),
    ("prices", 2.0),
    ("pricing", 2.0),
    ("cost", 1.5),
    ("costs", 1.5),
    ("quote", 1.5),
    ("discount", 1.5),
    ("fee", 1.0),
    ("fees", 1.0),
    ("rate", 1.0),
    ("rates", 1.0),
    ("deal", 1.0),
    ("budget", 1.0),
    ("taka", 1.0),
    ("tk", 1.0),
    ("bdt", 1.0),
    ("usd", 1.0),
    ("package", 0.5),
    ("plans", 0.5),
];

const SHIPPING: Terms = &[
    ("shipping", 2.0),
    ("ship", 1.5),
    ("ships", 1.5),
    ("deliver", 1.5),
    ("delivery", 1.5),
    ("deliveries", 1.5),
    ("courier", 1.5),
    ("dispatch", 1.5),
    ("tracking", 1.5),
    ("track", 1.0),
    ("arrive", 1.0),
    ("pickup", 1.0),
    ("pick up", 1.0),
    ("cash on delivery", 1.0),
    ("cod", 1.0),
    ("international", 1.0),
    ("outside", 0.5),
    ("address", 0.5),
    ("when will", 0.5),
];

const PRODUCT_INTEREST: Terms = &[
    ("tell me more", 2.0),
    ("interested", 1.5),
    ("more info", 1.5),
    ("in stock", 1.5),
    ("catalog", 1.5),
    ("catalogue", 1.5),
    ("what's included", 1.5),
    ("what is included", 1.5),
    ("details", 1.0),
    ("information", 1.0),
    ("available", 1.0),
    ("availability", 1.0),
    ("stock", 1.0),
    ("size", 1.0),
    ("sizes", 1.0),
    ("color", 1.0),
    ("colour", 1.0),
    ("features", 1.0),
    ("do you have", 1.0),
    ("recommend", 1.0),
    ("looking for", 1.0),
    ("options", 0.5),
];

const OBJECTION: Terms = &[
    ("expensive", 2.0),
    ("too much", 2.0),
    ("too pricey", 2.0),
    ("not worth", 2.0),
    ("can't afford", 2.0),
    ("scam", 2.0),
    ("not sure", 1.5),
    ("think about it", 1.5),
    ("maybe later", 1.5),
    ("cheaper", 1.5),
    ("hesitant", 1.5),
    ("worried", 1.5),
    ("doesn't work", 1.5),
    ("trust", 1.0),
    ("refund", 1.0),
    ("guarantee", 1.0),
    ("competitor", 1.0),
    ("elsewhere", 1.0),
    ("later", 0.5),
];

const GREETING: Terms = &[
    ("hi", 1.0),
    ("hello", 1.0),
    ("hey", 1.0),
    ("good morning", 1.0),
    ("good afternoon", 1.0),
    ("good evening", 1.0),
    ("greetings", 1.0),
    ("salam", 1.0),
    ("assalamualaikum", 1.0),
    ("thanks", 0.5),
    ("thank you", 0.5),
    ("yo", 0.5),
];

/// Term table for each scored intent
fn terms_for(intent: Intent) -> Terms {
    match intent {
        Intent::ReadyToBuy => READY_TO_BUY,
        Intent::PricingInquiry => PRICING,
        Intent::ShippingInquiry => SHIPPING,
        Intent::ProductInterest => PRODUCT_INTEREST,
        Intent::Objection => OBJECTION,
        Intent::Greeting => GREETING,
        Intent::Unclassified => &[],
    }
}

/// Classify a customer message. Never fails: blank or unmatched input
/// resolves to [`Intent::Unclassified`] with a low confidence.
pub fn classify(message: &str) -> Classification {
    let normalized = normalize(message);
    if normalized.trim().is_empty() {
        debug!("Empty message, using fallback intent");
        return Classification::fallback(0.0);
    }

    // PRIORITY order plus strict `>` means earlier intents win ties
    let mut best: Option<(Intent, f64)> = None;
    let mut runner_up: Option<(Intent, f64)> = None;
    for intent in Intent::PRIORITY {
        let score = score(&normalized, terms_for(intent));
        if score <= 0.0 {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {
                if runner_up.is_none_or(|(_, second)| score > second) {
                    runner_up = Some((intent, score));
                }
            }
            _ => {
                runner_up = best;
                best = Some((intent, score));
            }
        }
    }

    let Some((intent, score)) = best else {
        debug!("No intent rule matched, using fallback intent");
        return Classification::fallback(FALLBACK_CONFIDENCE);
    };

    let confidence = (score / (score + SMOOTHING)).clamp(0.0, 1.0);
    let secondary = runner_up.map(|(intent, _)| intent);
    debug!(
        "Classified message as {} (score={}, confidence={:.2}, secondary={:?})",
        intent, score, confidence, secondary
    );

    Classification {
        intent,
        confidence,
        score,
        secondary,
    }
}

/// Sum of the weights of every distinct term found in `normalized`
fn score(normalized: &str, terms: Terms) -> f64 {
    terms
        .iter()
        .filter(|(term, _)| normalized.contains(&format!(" {} ", term)))
        .map(|(_, weight)| weight)
        .sum()
}

/// Lowercase, fold punctuation to spaces and pad with a space on each side,
/// so a term matches as a whole word with `contains(" term ")`.
fn normalize(message: &str) -> String {
    let cleaned: String = message
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' => '\'',
            c if c.is_alphanumeric() || c == '\'' => c,
            _ => ' ',
        })
        .collect();

    let mut padded = String::with_capacity(cleaned.len() + 2);
    padded.push(' ');
    for word in cleaned.split_whitespace() {
        padded.push_str(word);
        padded.push(' ');
    }
    padded
}
