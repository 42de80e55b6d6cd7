//! Pure state transition function
//!
//! A submit is two-phase: the user message is applied locally as a pending
//! patch, then the backend's snapshot is committed over the whole log. Failed
//! sends keep the optimistic message visible.

use super::state::PendingSend;
use super::{ConversationState, Effect, Event};
use crate::api::{ConversationSnapshot, Message};
use thiserror::Error;

pub const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again.";
pub const CLEAR_FAILED_MESSAGE: &str = "Failed to clear conversation.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load conversation.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Events that cannot be applied; the state is left as it was
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("No pending request with id {0}")]
    UnknownRequest(u64),
}

/// Pure transition function.
///
/// Given the same inputs it always produces the same outputs; all I/O is
/// described by the returned effects.
///
/// # Errors
///
/// Returns [`TransitionError`] for a blank submit or a completion that does
/// not match an outstanding request.
pub fn transition(
    state: &ConversationState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // Submit is accepted in every phase: concurrent sends race and the
        // last to resolve wins, and an error on screen does not block it here.
        Event::UserSubmit { text, timestamp } => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyMessage);
            }

            let mut next = state.clone();
            let request_id = next.next_request_id;
            next.next_request_id += 1;
            next.messages.push(Message::user(text.clone(), timestamp));
            next.pending.push(PendingSend {
                request_id,
                text: text.clone(),
            });
            next.is_loading = true;
            next.error = None;

            let conversation_id = next.conversation_id.clone();
            Ok(TransitionResult::new(next).with_effect(Effect::SendMessage {
                request_id,
                content: text,
                conversation_id,
            }))
        }

        Event::SendCompleted {
            request_id,
            snapshot,
        } => {
            let mut next = settle(state, request_id)?;
            commit(&mut next, snapshot);
            next.error = None;
            Ok(TransitionResult::new(next))
        }

        Event::SendFailed { request_id, .. } => {
            let mut next = settle(state, request_id)?;
            next.error = Some(SEND_FAILED_MESSAGE.to_string());
            Ok(TransitionResult::new(next))
        }

        Event::ClearRequested => {
            Ok(
                TransitionResult::new(state.clone()).with_effect(Effect::ClearConversation {
                    conversation_id: state.conversation_id.clone(),
                }),
            )
        }

        // The conversation id survives a clear; only the log goes.
        Event::ClearCompleted => {
            let mut next = state.clone();
            next.messages.clear();
            next.error = None;
            Ok(TransitionResult::new(next))
        }

        Event::ClearFailed { .. } => {
            let mut next = state.clone();
            next.error = Some(CLEAR_FAILED_MESSAGE.to_string());
            Ok(TransitionResult::new(next))
        }

        Event::DismissError => {
            let mut next = state.clone();
            next.error = None;
            Ok(TransitionResult::new(next))
        }

        Event::ReloadRequested => {
            Ok(
                TransitionResult::new(state.clone()).with_effect(Effect::FetchConversation {
                    conversation_id: state.conversation_id.clone(),
                }),
            )
        }

        Event::ReloadCompleted { snapshot } => {
            let mut next = state.clone();
            next.messages = snapshot.messages;
            next.conversation_id = snapshot.conversation_id;
            next.error = None;
            Ok(TransitionResult::new(next))
        }

        // Nothing stored server-side yet: an empty log is the true state.
        Event::ReloadFailed { error } if error.is_not_found() => {
            let mut next = state.clone();
            next.messages.clear();
            next.error = None;
            Ok(TransitionResult::new(next))
        }

        Event::ReloadFailed { .. } => {
            let mut next = state.clone();
            next.error = Some(LOAD_FAILED_MESSAGE.to_string());
            Ok(TransitionResult::new(next))
        }
    }
}

/// Resolve a pending send. Any resolution drops the loading flag, even when
/// other sends are still outstanding.
fn settle(
    state: &ConversationState,
    request_id: u64,
) -> Result<ConversationState, TransitionError> {
    if !state.is_pending(request_id) {
        return Err(TransitionError::UnknownRequest(request_id));
    }
    let mut next = state.clone();
    next.pending.retain(|p| p.request_id != request_id);
    next.is_loading = false;
    Ok(next)
}

/// The server's log is authoritative and replaces the local one wholesale.
fn commit(state: &mut ConversationState, snapshot: ConversationSnapshot) {
    state.messages = snapshot.messages;
    state.conversation_id = snapshot.conversation_id;
}
