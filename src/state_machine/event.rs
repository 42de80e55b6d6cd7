//! Events that can occur in a conversation

use super::state::RequestId;
use crate::api::{ApiError, ConversationSnapshot};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
        /// ISO-8601 time the message was composed
        timestamp: String,
    },
    ClearRequested,
    DismissError,
    ReloadRequested,

    // Backend completions
    SendCompleted {
        request_id: RequestId,
        snapshot: ConversationSnapshot,
    },
    SendFailed {
        request_id: RequestId,
        error: ApiError,
    },
    ClearCompleted,
    ClearFailed {
        error: ApiError,
    },
    ReloadCompleted {
        snapshot: ConversationSnapshot,
    },
    ReloadFailed {
        error: ApiError,
    },
}
