//! Keyword tables for intent routing
//!
//! All entries are lowercase. Term tables are matched by substring
//! containment against lowercased input; token tables only match whole
//! alphanumeric words, for short words that also occur inside unrelated
//! ones ("math" in "aftermath", "tone" in "stone"). Rule order in
//! [`THEME_RULES`] is the routing priority.

use crate::personas::PersonaId;

/// Terms that mark input as belonging to the leadership/communication domain
pub const IN_DOMAIN_TERMS: &[&str] = &[
    "leader",
    "leadership",
    "team",
    "emotion",
    "empathy",
    "speech",
    "presence",
    "communicat",
    "influence",
    "virtue",
    "authority",
    "values",
    "mindfulness",
    "presentation",
    "confidence",
    "persuasion",
    "persuade",
    "integrity",
    "motivation",
    "body language",
    "posture",
    "manage",
    "ceo",
    "executive",
    "coach",
    "mentor",
    "guide",
    "develop",
    "improve",
    "pitch",
    "negotiat",
    "gravitas",
    "charisma",
];

/// Topics the suite never answers, even when in-domain terms are present.
///
/// Covers coding, recipes, math, history, science, translation, markets and
/// weather. Short words live in [`OFF_TOPIC_TOKENS`].
pub const OFF_TOPIC_TERMS: &[&str] = &[
    // coding
    "coding",
    "programming",
    "python",
    "javascript",
    "source code",
    "debug",
    "compile",
    // recipes
    "recipe",
    "cooking",
    "baking",
    // math
    "mathematics",
    "math problem",
    "math homework",
    "algebra",
    "calculus",
    "equation",
    // history
    "history",
    "historical",
    // science
    "scientific",
    "physics",
    "chemistry",
    "biology",
    // translation
    "translate",
    "translation",
    // markets
    "stock market",
    "stock price",
    "stocks",
    "crypto",
    "bitcoin",
    "forex",
    // weather
    "weather",
    "forecast",
];

/// Off-topic words matched as whole tokens
pub const OFF_TOPIC_TOKENS: &[&str] = &[
    "bake", "bakes", "math", "maths", "science", "sciences", "market", "markets",
];

/// Short inputs that are let through the relevance gate
pub const ACKNOWLEDGEMENTS: &[&str] = &["hi", "hello", "ok", "thanks", "thank you", "yes", "no"];

/// Inputs shorter than this many tokens need an in-domain term
pub const MIN_UNRELATED_TOKENS: usize = 3;

/// Triggers for the council profile
pub const COUNCIL_TERMS: &[&str] = &["consult", "all mentors", "senate", "council"];

/// Secondary keyword check that redirects a matched rule to another persona
#[derive(Debug)]
pub struct Refinement {
    pub keywords: &'static [&'static str],
    pub persona: PersonaId,
}

/// One theme rule: first rule with a matching keyword wins
#[derive(Debug)]
pub struct ThemeRule {
    pub persona: PersonaId,
    pub keywords: &'static [&'static str],
    /// Keywords that must match a whole token
    pub tokens: &'static [&'static str],
    pub refinement: Option<Refinement>,
}

impl ThemeRule {
    /// Whether normalized `text` triggers this rule
    pub fn matches(&self, text: &str) -> bool {
        contains_any(text, self.keywords) || contains_token(text, self.tokens)
    }
}

/// Theme rules in priority order
pub const THEME_RULES: &[ThemeRule] = &[
    ThemeRule {
        persona: PersonaId::Eidos,
        keywords: &[
            "emotion",
            "empathy",
            "feeling",
            "conflict",
            "sensitive",
            "frustrat",
        ],
        tokens: &[],
        refinement: None,
    },
    ThemeRule {
        persona: PersonaId::Kinesis,
        keywords: &[
            "body language",
            "gesture",
            "posture",
            "eye contact",
            "nonverbal",
            "non-verbal",
            "tone of voice",
            "handshake",
            "facial expression",
        ],
        tokens: &["tone"],
        refinement: None,
    },
    ThemeRule {
        persona: PersonaId::Gravis,
        keywords: &["gravitas", "composure", "calm strength", "poise", "stay calm"],
        tokens: &[],
        refinement: None,
    },
    ThemeRule {
        persona: PersonaId::Virtus,
        keywords: &[
            "virtue",
            "integrity",
            "values",
            "duty",
            "ethics",
            "ethical",
            "honor",
            "honour",
        ],
        tokens: &[],
        refinement: None,
    },
    ThemeRule {
        persona: PersonaId::Ethos,
        keywords: &[
            "persuade",
            "persuasion",
            "influence",
            "story",
            "speech",
            "pitch",
            "proposal",
            "negotiat",
        ],
        tokens: &[],
        refinement: None,
    },
    ThemeRule {
        persona: PersonaId::Praxis,
        keywords: &["presence", "authority", "executive presence", "command the room"],
        tokens: &[],
        refinement: None,
    },
    ThemeRule {
        persona: PersonaId::Anima,
        keywords: &[
            "mindful",
            "alignment",
            "purpose",
            "anxiety",
            "anxious",
            "stress",
            "meditat",
        ],
        tokens: &["inner"],
        refinement: None,
    },
    ThemeRule {
        persona: PersonaId::Persona,
        keywords: &[
            "appearance",
            "attire",
            "style",
            "grooming",
            "energy",
            "brand",
            "impression",
        ],
        tokens: &[],
        refinement: Some(Refinement {
            keywords: &[
                "first impression",
                "introduce",
                "introduction",
                "elevator",
                "rapport",
            ],
            persona: PersonaId::Impressa,
        }),
    },
    ThemeRule {
        persona: PersonaId::Sentio,
        keywords: &[
            "empathic",
            "listen",
            "understand",
            "compassion",
            "caring",
            "perspective",
        ],
        tokens: &["care"],
        refinement: None,
    },
];

/// Whether `text` contains any of `terms`
pub fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// Whether any alphanumeric word of `text` equals one of `tokens`
pub fn contains_token(text: &str, tokens: &[&str]) -> bool {
    !tokens.is_empty()
        && text
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| tokens.contains(&word))
}
