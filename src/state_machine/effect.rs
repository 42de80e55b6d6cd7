//! Effects produced by state transitions

use super::state::RequestId;

/// Backend calls to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `send_message`; completes with `SendCompleted` or `SendFailed`
    SendMessage {
        request_id: RequestId,
        content: String,
        conversation_id: String,
    },

    /// `clear_conversation`; completes with `ClearCompleted` or `ClearFailed`
    ClearConversation { conversation_id: String },

    /// `get_conversation`; completes with `ReloadCompleted` or `ReloadFailed`
    FetchConversation { conversation_id: String },
}
