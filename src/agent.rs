//! Agent provenance tags and their display metadata

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the backend reasoning pipeline that produced a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentTag {
    Hypothesis,
    Challenger,
    TestChooser,
    AskQuestion,
    RequestTest,
    ProvideDiagnosis,
    /// Any tag the client does not know, kept verbatim
    Other(String),
}

impl AgentTag {
    pub const KNOWN: [AgentTag; 6] = [
        AgentTag::Hypothesis,
        AgentTag::Challenger,
        AgentTag::TestChooser,
        AgentTag::AskQuestion,
        AgentTag::RequestTest,
        AgentTag::ProvideDiagnosis,
    ];

    /// Wire name as sent by the backend
    pub fn as_str(&self) -> &str {
        match self {
            AgentTag::Hypothesis => "HypothesisAgent",
            AgentTag::Challenger => "ChallengerAgent",
            AgentTag::TestChooser => "TestChooserAgent",
            AgentTag::AskQuestion => "AskQuestion",
            AgentTag::RequestTest => "RequestTest",
            AgentTag::ProvideDiagnosis => "ProvideDiagnosis",
            AgentTag::Other(tag) => tag,
        }
    }

    pub fn parse(tag: &str) -> Self {
        match tag {
            "HypothesisAgent" => AgentTag::Hypothesis,
            "ChallengerAgent" => AgentTag::Challenger,
            "TestChooserAgent" => AgentTag::TestChooser,
            "AskQuestion" => AgentTag::AskQuestion,
            "RequestTest" => AgentTag::RequestTest,
            "ProvideDiagnosis" => AgentTag::ProvideDiagnosis,
            other => AgentTag::Other(other.to_string()),
        }
    }

    /// Tags whose output is addressed to the user rather than internal
    /// reasoning
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AgentTag::AskQuestion | AgentTag::RequestTest | AgentTag::ProvideDiagnosis
        )
    }
}

impl From<String> for AgentTag {
    fn from(tag: String) -> Self {
        match AgentTag::parse(&tag) {
            AgentTag::Other(_) => AgentTag::Other(tag),
            known => known,
        }
    }
}

impl From<AgentTag> for String {
    fn from(tag: AgentTag) -> Self {
        match tag {
            AgentTag::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AgentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconRole {
    Brain,
    AlertTriangle,
    TestTube,
    HelpCircle,
    FileText,
    Stethoscope,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Purple,
    Orange,
    Blue,
    Green,
    Indigo,
    Red,
    Emerald,
}

/// How a message's author is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentDisplayConfig {
    pub label: &'static str,
    pub icon: IconRole,
    pub color: ColorRole,
}

impl AgentDisplayConfig {
    const fn new(label: &'static str, icon: IconRole, color: ColorRole) -> Self {
        Self { label, icon, color }
    }
}

pub const DEFAULT_DISPLAY: AgentDisplayConfig =
    AgentDisplayConfig::new("AI Assistant", IconRole::Bot, ColorRole::Emerald);

/// Map an optional agent tag to its display metadata.
///
/// Unknown and absent tags fall back to the generic assistant.
#[must_use]
pub fn classify(agent: Option<&AgentTag>) -> AgentDisplayConfig {
    let Some(agent) = agent else {
        return DEFAULT_DISPLAY;
    };
    match agent {
        AgentTag::Hypothesis => {
            AgentDisplayConfig::new("Hypothesis Agent", IconRole::Brain, ColorRole::Purple)
        }
        AgentTag::Challenger => {
            AgentDisplayConfig::new("Challenger Agent", IconRole::AlertTriangle, ColorRole::Orange)
        }
        AgentTag::TestChooser => {
            AgentDisplayConfig::new("Test Chooser Agent", IconRole::TestTube, ColorRole::Blue)
        }
        AgentTag::AskQuestion => {
            AgentDisplayConfig::new("Question Agent", IconRole::HelpCircle, ColorRole::Green)
        }
        AgentTag::RequestTest => {
            AgentDisplayConfig::new("Test Request Agent", IconRole::FileText, ColorRole::Indigo)
        }
        AgentTag::ProvideDiagnosis => {
            AgentDisplayConfig::new("Diagnosis Agent", IconRole::Stethoscope, ColorRole::Red)
        }
        AgentTag::Other(_) => DEFAULT_DISPLAY,
    }
}

/// [`classify`] over a raw wire string
#[must_use]
pub fn classify_tag(agent: Option<&str>) -> AgentDisplayConfig {
    classify(agent.map(AgentTag::parse).as_ref())
}
