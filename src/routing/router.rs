//! Intent routing based on keyword heuristics
//!
//! Maps the latest user message to a persona, or to an out-of-scope
//! decision that short-circuits the provider. Routing is a pure function of
//! the text: no network calls, no state.

use crate::personas::{PersonaId, PersonaProfile, PersonaRegistry, DEFAULT_PERSONA};
use crate::routing::keywords::{
    contains_any, contains_token, ACKNOWLEDGEMENTS, COUNCIL_TERMS, IN_DOMAIN_TERMS,
    MIN_UNRELATED_TOKENS, OFF_TOPIC_TERMS, OFF_TOPIC_TOKENS, THEME_RULES,
};
use std::sync::Arc;

/// Routing decision for a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision<'a> {
    /// Forward to the provider under this persona
    Persona(&'a PersonaProfile),
    /// Reply with the fixed refusal text; the provider is not called
    OutOfScope(&'a str),
}

impl RoutingDecision<'_> {
    /// Selected persona id, if any
    pub fn persona_id(&self) -> Option<PersonaId> {
        match self {
            Self::Persona(profile) => Some(profile.id),
            Self::OutOfScope(_) => None,
        }
    }

    pub fn is_out_of_scope(&self) -> bool {
        matches!(self, Self::OutOfScope(_))
    }
}

/// How the relevance gate judged the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    /// Mentions a topic the suite never covers
    OffTopic,
    /// Contains at least one in-domain term
    InDomain,
    /// Allow-listed greeting or acknowledgement
    Acknowledgement,
    /// Short text with no in-domain term
    ShortUnrelated,
    /// Longer text with no in-domain term
    Unrelated,
}

impl Relevance {
    /// Whether the gate rejects the input outright
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::OffTopic | Self::ShortUnrelated)
    }

    /// Whether unmatched input may fall back to the default persona
    pub fn allows_default(&self) -> bool {
        matches!(self, Self::InDomain | Self::Acknowledgement)
    }
}

/// Lowercase and trim
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Apply the relevance gate to normalized text
pub fn assess_relevance(normalized: &str) -> Relevance {
    if contains_any(normalized, OFF_TOPIC_TERMS) || contains_token(normalized, OFF_TOPIC_TOKENS) {
        return Relevance::OffTopic;
    }
    if contains_any(normalized, IN_DOMAIN_TERMS) {
        return Relevance::InDomain;
    }

    let bare = normalized.trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    if ACKNOWLEDGEMENTS.contains(&bare) {
        return Relevance::Acknowledgement;
    }

    if normalized.split_whitespace().count() < MIN_UNRELATED_TOKENS {
        Relevance::ShortUnrelated
    } else {
        Relevance::Unrelated
    }
}

/// Classify text to a persona id; `None` means out of scope.
pub fn classify(text: &str) -> Option<PersonaId> {
    let normalized = normalize(text);
    let relevance = assess_relevance(&normalized);
    if relevance.is_rejected() {
        return None;
    }

    if contains_any(&normalized, COUNCIL_TERMS) {
        return Some(PersonaId::Senate);
    }

    for rule in THEME_RULES {
        if !rule.matches(&normalized) {
            continue;
        }
        return Some(match &rule.refinement {
            Some(refinement) if contains_any(&normalized, refinement.keywords) => {
                refinement.persona
            }
            _ => rule.persona,
        });
    }

    relevance.allows_default().then_some(DEFAULT_PERSONA)
}

/// Intent router over a persona registry
#[derive(Debug, Clone)]
pub struct IntentRouter {
    registry: Arc<PersonaRegistry>,
}

impl IntentRouter {
    /// Create a new intent router
    pub fn new(registry: Arc<PersonaRegistry>) -> Self {
        Self { registry }
    }

    /// The persona registry this router resolves against
    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Route the latest user text
    pub fn route(&self, latest_user_text: &str) -> RoutingDecision<'_> {
        let decision = match classify(latest_user_text) {
            Some(id) => RoutingDecision::Persona(self.registry.get(id)),
            None => RoutingDecision::OutOfScope(self.registry.refusal_message()),
        };

        tracing::debug!(
            persona = decision.persona_id().map(|id| id.as_str()).unwrap_or("out_of_scope"),
            "Routed user message"
        );

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personas::SCOPE_GUARD_MESSAGE;

    fn router() -> IntentRouter {
        IntentRouter::new(Arc::new(PersonaRegistry::builtin().unwrap()))
    }

    fn routed(text: &str) -> Option<PersonaId> {
        router().route(text).persona_id()
    }

    #[test]
    fn test_posture_beats_pitch() {
        assert_eq!(
            routed("How should I use posture during a pitch?"),
            Some(PersonaId::Kinesis)
        );
    }

    #[test]
    fn test_stand_is_not_a_body_keyword() {
        assert_eq!(
            routed("How should I stand during a pitch?"),
            Some(PersonaId::Ethos)
        );
    }

    #[test]
    fn test_emotion_beats_persuasion() {
        assert_eq!(
            routed("How do I persuade a board when emotions run high?"),
            Some(PersonaId::Eidos)
        );
    }

    #[test]
    fn test_off_topic_recipe() {
        let router = router();
        let decision = router.route("What's a good pasta recipe?");
        assert_eq!(decision, RoutingDecision::OutOfScope(SCOPE_GUARD_MESSAGE));
    }

    #[test]
    fn test_off_topic_wins_over_in_domain_terms() {
        assert_eq!(routed("Leadership lessons from history for my team"), None);
        assert_eq!(routed("Help my team debug this python script"), None);
        assert_eq!(routed("What's the weather like for my presentation tomorrow?"), None);
    }

    #[test]
    fn test_off_topic_short_words() {
        for text in [
            "How can my team improve at math?",
            "How does science explain great leadership?",
            "Should my leadership team invest in markets?",
            "Help my team bake",
        ] {
            assert_eq!(routed(text), None, "{}", text);
        }
    }

    #[test]
    fn test_short_words_inside_longer_words_are_not_off_topic() {
        assert_eq!(
            routed("How does a leader recover in the aftermath of layoffs?"),
            Some(PersonaId::Praxis)
        );
        assert_eq!(
            routed("My conscience as a leader keeps me up at night"),
            Some(PersonaId::Praxis)
        );
        assert_eq!(assess_relevance("my team's aftermath plan"), Relevance::InDomain);
    }

    #[test]
    fn test_greetings_fall_back_to_default() {
        for text in ["hello", "Hi", "  thank you ", "Thanks!", "ok", "yes", "no"] {
            assert_eq!(routed(text), Some(PersonaId::Praxis), "{}", text);
        }
    }

    #[test]
    fn test_short_unrelated_is_out_of_scope() {
        for text in ["pizza?", "blue sky", "lol", "good morning"] {
            assert!(router().route(text).is_out_of_scope(), "{}", text);
        }
    }

    #[test]
    fn test_empty_and_whitespace_are_out_of_scope() {
        assert!(router().route("").is_out_of_scope());
        assert!(router().route("   \n\t ").is_out_of_scope());
    }

    #[test]
    fn test_long_unrelated_without_theme_is_out_of_scope() {
        assert_eq!(routed("what should I buy for my nephew"), None);
    }

    #[test]
    fn test_in_domain_without_theme_uses_default() {
        assert_eq!(routed("How can I improve my leadership?"), Some(PersonaId::Praxis));
        assert_eq!(routed("I'm a new CEO"), Some(PersonaId::Praxis));
    }

    #[test]
    fn test_council_triggers() {
        assert_eq!(routed("I'd like to consult all mentors"), Some(PersonaId::Senate));
        assert_eq!(routed("What would the Senate say about my team?"), Some(PersonaId::Senate));
    }

    #[test]
    fn test_council_beats_themes() {
        assert_eq!(
            routed("Consult the council on my body language"),
            Some(PersonaId::Senate)
        );
    }

    #[test]
    fn test_theme_rules() {
        let cases = [
            ("How do I handle conflict with a peer?", PersonaId::Eidos),
            ("Tips for better eye contact in interviews", PersonaId::Kinesis),
            ("How do I keep my composure under pressure?", PersonaId::Gravis),
            ("What does integrity look like for a manager?", PersonaId::Virtus),
            ("Help me structure a proposal for the board", PersonaId::Ethos),
            ("How do I build executive presence?", PersonaId::Praxis),
            ("I feel so much stress before big decisions", PersonaId::Anima),
            ("What attire suits a keynote?", PersonaId::Persona),
            ("How can I listen better to my reports?", PersonaId::Sentio),
        ];
        for (text, expected) in cases {
            assert_eq!(routed(text), Some(expected), "{}", text);
        }
    }

    #[test]
    fn test_whole_word_theme_keywords() {
        let cases = [
            ("How do I fix my tone in meetings?", PersonaId::Kinesis),
            ("How do I show my reports that I care?", PersonaId::Sentio),
            ("I want to find my inner", PersonaId::Anima),
            ("Where does my inner calm go before a board meeting?", PersonaId::Anima),
        ];
        for (text, expected) in cases {
            assert_eq!(routed(text), Some(expected), "{}", text);
        }
    }

    #[test]
    fn test_whole_word_keywords_ignore_longer_words() {
        assert_eq!(
            routed("Leadership lessons carved in stone"),
            Some(PersonaId::Praxis)
        );
        assert_eq!(
            routed("A careful leader plans the winner's dinner"),
            Some(PersonaId::Praxis)
        );
    }

    #[test]
    fn test_first_impression_refinement() {
        assert_eq!(
            routed("How do I make a strong first impression at a new job?"),
            Some(PersonaId::Impressa)
        );
        assert_eq!(
            routed("How do I build rapport through my personal brand?"),
            Some(PersonaId::Impressa)
        );
        assert_eq!(
            routed("What impression does my personal brand give off?"),
            Some(PersonaId::Persona)
        );
    }

    #[test]
    fn test_rapport_alone_does_not_reach_impressa() {
        // The refinement only applies once an appearance term matched.
        assert_eq!(routed("How do I build rapport with my team?"), Some(PersonaId::Praxis));
    }

    #[test]
    fn test_route_is_deterministic() {
        let router = router();
        for text in ["hello", "pasta recipe", "my posture", "", "consult"] {
            assert_eq!(router.route(text), router.route(text));
        }
    }

    #[test]
    fn test_route_is_case_insensitive() {
        assert_eq!(routed("MY POSTURE IS BAD"), Some(PersonaId::Kinesis));
    }

    #[test]
    fn test_assess_relevance() {
        assert_eq!(assess_relevance("a pasta recipe"), Relevance::OffTopic);
        assert_eq!(assess_relevance("my team"), Relevance::InDomain);
        assert_eq!(assess_relevance("thank you"), Relevance::Acknowledgement);
        assert_eq!(assess_relevance("blue sky"), Relevance::ShortUnrelated);
        assert_eq!(assess_relevance("the blue sky today"), Relevance::Unrelated);
        assert_eq!(assess_relevance(""), Relevance::ShortUnrelated);
    }

    #[test]
    fn test_decision_references_registry_profile() {
        let router = router();
        match router.route("gestures while speaking") {
            RoutingDecision::Persona(profile) => {
                assert_eq!(profile.id, PersonaId::Kinesis);
                assert!(profile.instruction_text.starts_with("You are Kinesis"));
            }
            other => panic!("unexpected decision: {:?}", other),
        }
    }
}
