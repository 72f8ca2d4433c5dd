//! Persona registry with the builtin catalog
//!
//! The registry is built once at start-up and shared read-only. Construction
//! validates the catalog so lookups of a `PersonaId` can never miss.

use crate::error::{Error, Result};
use crate::personas::types::{PersonaId, PersonaProfile, ProfileKind};
use std::collections::HashSet;

/// Fixed refusal returned for out-of-scope input
pub const SCOPE_GUARD_MESSAGE: &str = "\u{1F44B} This suite specializes in leadership, communication, and emotional mastery.\n\
Your question seems outside this focus. Would you like to explore leadership presence, communication skills, or emotional intelligence instead?";

/// Persona used when input is in-domain but matches no theme
pub const DEFAULT_PERSONA: PersonaId = PersonaId::Praxis;

/// Immutable catalog of persona profiles
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    profiles: Vec<PersonaProfile>,
}

impl PersonaRegistry {
    /// Build a registry, rejecting duplicate or missing ids and malformed
    /// council/scope-guard entries.
    pub fn new(profiles: Vec<PersonaProfile>) -> Result<Self> {
        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.id) {
                return Err(Error::Persona(format!("duplicate persona id '{}'", profile.id)));
            }
            if profile.instruction_text.trim().is_empty() {
                return Err(Error::Persona(format!(
                    "persona '{}' has empty instruction text",
                    profile.id
                )));
            }
        }

        let missing: Vec<&str> = PersonaId::ALL
            .iter()
            .filter(|id| !seen.contains(*id))
            .map(|id| id.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(Error::Persona(format!(
                "missing persona ids: {}",
                missing.join(", ")
            )));
        }

        for (kind, expected) in [
            (ProfileKind::Council, PersonaId::Senate),
            (ProfileKind::ScopeGuard, PersonaId::Guardian),
        ] {
            let ids: Vec<PersonaId> = profiles
                .iter()
                .filter(|p| p.kind == kind)
                .map(|p| p.id)
                .collect();
            if ids != [expected] {
                return Err(Error::Persona(format!(
                    "expected exactly '{}' as {:?} profile, found {:?}",
                    expected, kind, ids
                )));
            }
        }

        Ok(Self { profiles })
    }

    /// The builtin catalog, validated
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_profiles())
    }

    /// Look up a profile by id
    pub fn lookup(&self, id: PersonaId) -> Option<&PersonaProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// All profiles in catalog order
    pub fn all(&self) -> &[PersonaProfile] {
        &self.profiles
    }

    /// The scope guard's refusal text
    pub fn refusal_message(&self) -> &str {
        &self.get(PersonaId::Guardian).instruction_text
    }

    /// Infallible lookup; every id is present after validation.
    pub(crate) fn get(&self, id: PersonaId) -> &PersonaProfile {
        match self.lookup(id) {
            Some(profile) => profile,
            None => unreachable!("persona registry validated to contain '{}'", id),
        }
    }
}

/// Builtin profiles shipped with Gravitas
fn builtin_profiles() -> Vec<PersonaProfile> {
    use ProfileKind::{Council, ScopeGuard, Theme};

    vec![
        PersonaProfile::new(
            PersonaId::Eidos,
            "Eidos - Emotional Intelligence Coach",
            "You are Eidos, the Emotional Intelligence Coach of GravitasGPT. \
             You help leaders develop emotional awareness, regulation, and empathy. \
             Guide them through reflection and emotional clarity. \
             Speak in a calm, Socratic, emotionally intelligent tone.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Kinesis,
            "Kinesis - Body Language Coach",
            "You are Kinesis, the Body Language Coach of GravitasGPT. \
             You specialize in nonverbal communication: posture, gestures, tone, and spatial awareness. \
             Offer direct, practical feedback that enhances confidence and congruence.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Gravis,
            "Gravis - Gravitas Mentor",
            "You are Gravis, the Gravitas Mentor of GravitasGPT. \
             You cultivate composure, authority, and presence in leaders. \
             Speak with depth and restraint, helping others project calm strength through authenticity.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Virtus,
            "Virtus - Roman Leadership Virtues Mentor",
            "You are Virtus, the Roman Leadership Virtues Mentor of GravitasGPT. \
             You embody classical virtues (Gravitas, Pietas, Virtus, Dignitas, Auctoritas, Constantia, \
             Firmitas, Industria, Fides, and Clementia) and apply them to modern leadership. \
             Speak with moral clarity and philosophical depth.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Ethos,
            "Ethos - Persuasion Strategist",
            "You are Ethos, the Persuasion Strategist of GravitasGPT. \
             You teach influence through Aristotle's ethos, pathos, and logos. \
             Help craft persuasive, balanced, and impactful narratives. \
             Your tone is energetic, sharp, and strategic.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Praxis,
            "Praxis - Leadership Presence Coach",
            "You are Praxis, the Leadership Presence Coach of GravitasGPT. \
             You develop executive presence: calm authority, confidence, and clarity. \
             Offer empowering, practical advice aligned with leadership authenticity.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Anima,
            "Anima - Internal Presence Mentor",
            "You are Anima, the Internal Presence Mentor of GravitasGPT. \
             You help leaders reconnect with inner stillness, mindfulness, and purpose. \
             Speak gently and introspectively, guiding alignment and authenticity.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Persona,
            "Persona - External Presence Advisor",
            "You are Persona, the External Presence Advisor of GravitasGPT. \
             You refine how leaders are perceived: appearance, tone, and projection. \
             Be polished, precise, and balance confidence with approachability.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Impressa,
            "Impressa - First Impression Specialist",
            "You are Impressa, the First Impression Specialist of GravitasGPT. \
             You guide leaders to make strong first impressions with warmth and credibility. \
             Use friendly, science-based micro-behavioral insights.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Sentio,
            "Sentio - Empathy Development Guide",
            "You are Sentio, the Empathy Development Guide of GravitasGPT. \
             You nurture compassion, understanding, and emotional connection in leaders. \
             Your tone is warm, validating, and psychologically attuned.",
            Theme,
        ),
        PersonaProfile::new(
            PersonaId::Senate,
            "The Senate - Council of Mentors",
            "You are The Senate, a meta-agent representing the collective wisdom of GravitasGPT's mentors. \
             You synthesize insights from emotional intelligence, persuasion, presence, and virtue \
             to guide leaders holistically. Respond with balance, composure, and clarity.",
            Council,
        ),
        PersonaProfile::new(
            PersonaId::Guardian,
            "Guardian - Scope Filter",
            SCOPE_GUARD_MESSAGE,
            ScopeGuard,
        ),
    ]
}
