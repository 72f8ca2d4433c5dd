//! Persona types
//!
//! A persona is a fixed instruction text that steers the completion
//! provider's voice. The set of personas is closed and known at compile
//! time; the registry validates that every id has exactly one profile.

use serde::{Deserialize, Serialize};

/// Identifier of a builtin persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaId {
    /// Emotional intelligence coach
    Eidos,
    /// Body language coach
    Kinesis,
    /// Gravitas mentor
    Gravis,
    /// Roman leadership virtues mentor
    Virtus,
    /// Persuasion strategist
    Ethos,
    /// Leadership presence coach
    Praxis,
    /// Internal presence mentor
    Anima,
    /// External presence advisor
    Persona,
    /// First impression specialist
    Impressa,
    /// Empathy development guide
    Sentio,
    /// Council of mentors
    Senate,
    /// Scope filter
    Guardian,
}

impl PersonaId {
    /// Every id, in catalog order
    pub const ALL: [PersonaId; 12] = [
        Self::Eidos,
        Self::Kinesis,
        Self::Gravis,
        Self::Virtus,
        Self::Ethos,
        Self::Praxis,
        Self::Anima,
        Self::Persona,
        Self::Impressa,
        Self::Sentio,
        Self::Senate,
        Self::Guardian,
    ];

    /// Wire id
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eidos => "eidos",
            Self::Kinesis => "kinesis",
            Self::Gravis => "gravis",
            Self::Virtus => "virtus",
            Self::Ethos => "ethos",
            Self::Praxis => "praxis",
            Self::Anima => "anima",
            Self::Persona => "persona",
            Self::Impressa => "impressa",
            Self::Sentio => "sentio",
            Self::Senate => "senate",
            Self::Guardian => "guardian",
        }
    }
}

impl std::fmt::Display for PersonaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersonaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown persona: {}", s))
    }
}

/// Role a profile plays in routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Single-theme mentor
    Theme,
    /// Synthesis voice of all mentors
    Council,
    /// Out-of-scope filter; its instruction text is the refusal shown to users
    ScopeGuard,
}

/// A named behavior profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaProfile {
    pub id: PersonaId,
    pub display_name: String,
    pub instruction_text: String,
    pub kind: ProfileKind,
}

impl PersonaProfile {
    pub fn new(
        id: PersonaId,
        display_name: impl Into<String>,
        instruction_text: impl Into<String>,
        kind: ProfileKind,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            instruction_text: instruction_text.into(),
            kind,
        }
    }
}

/// Public listing entry (instruction text is not exposed)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSummary {
    pub id: PersonaId,
    pub display_name: String,
    pub kind: ProfileKind,
}

impl From<&PersonaProfile> for PersonaSummary {
    fn from(profile: &PersonaProfile) -> Self {
        Self {
            id: profile.id,
            display_name: profile.display_name.clone(),
            kind: profile.kind,
        }
    }
}
