//! Conversation state types

use crate::api::Message;

pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// Identifies one in-flight submit so its completion can be matched up
pub type RequestId = u64;

/// A submit that has been applied optimistically but not yet resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub request_id: RequestId,
    pub text: String,
}

/// Coarse phase derived from the loading flag and error field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
    ErrorShown,
}

/// Client-side view of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    /// Insertion order is display order
    pub messages: Vec<Message>,
    pub conversation_id: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub pending: Vec<PendingSend>,
    pub next_request_id: RequestId,
}

impl ConversationState {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            messages: Vec::new(),
            conversation_id: conversation_id.into(),
            is_loading: false,
            error: None,
            pending: Vec::new(),
            next_request_id: 1,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::Sending
        } else if self.error.is_some() {
            Phase::ErrorShown
        } else {
            Phase::Idle
        }
    }

    #[must_use]
    pub fn is_pending(&self, request_id: RequestId) -> bool {
        self.pending.iter().any(|p| p.request_id == request_id)
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERSATION_ID)
    }
}
