//! Wire types shared with the diagnostic backend

use crate::agent::AgentTag;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in the conversation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub content: String,
    /// ISO-8601, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_agent",
        skip_serializing_if = "Option::is_none"
    )]
    pub agent: Option<AgentTag>,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Some(Role::User),
            content: content.into(),
            timestamp: Some(timestamp.into()),
            agent: None,
        }
    }

    pub fn assistant(content: impl Into<String>, agent: Option<AgentTag>) -> Self {
        Self {
            role: Some(Role::Assistant),
            content: content.into(),
            timestamp: None,
            agent,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Some(Role::User)
    }
}

/// An empty tag carries no provenance; treat it as absent.
fn deserialize_agent<'de, D>(deserializer: D) -> Result<Option<AgentTag>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|tag| !tag.is_empty()).map(AgentTag::from))
}

/// Body of `POST /chat` and `POST /chat/stream`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<&'a str>,
}

/// Full server-side view of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub conversation_id: String,
    /// Backend graph state, passed through without interpretation
    #[serde(default)]
    pub graph_state: Value,
}

impl ConversationSnapshot {
    pub fn new(conversation_id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            messages,
            conversation_id: conversation_id.into(),
            graph_state: Value::Null,
        }
    }
}
