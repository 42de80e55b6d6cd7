//! Conversation runtime executor

use crate::api::{ApiError, ChatBackend};
use crate::state_machine::{transition, ConversationState, Effect, Event};
use chrono::{SecondsFormat, Utc};
use std::collections::VecDeque;
use tokio::sync::watch;

/// Drives the pure state machine against a backend.
///
/// Each operation dispatches its event, executes the resulting effects and
/// feeds their completions back in. State is only touched inside a single
/// dispatch, never across an `.await`, so operations started concurrently
/// interleave at the network calls and the last completion to land wins.
pub struct ConversationRuntime<B: ChatBackend> {
    backend: B,
    state: watch::Sender<ConversationState>,
}

impl<B: ChatBackend> ConversationRuntime<B> {
    pub fn new(backend: B, conversation_id: impl Into<String>) -> Self {
        Self {
            backend,
            state: watch::Sender::new(ConversationState::new(conversation_id)),
        }
    }

    /// Current state
    pub fn state(&self) -> ConversationState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.state.subscribe()
    }

    /// Send a user message. Blank input is ignored.
    pub async fn submit(&self, text: &str) {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.run(Event::UserSubmit {
            text: text.to_string(),
            timestamp,
        })
        .await;
    }

    /// Delete the conversation server-side and empty the local log
    pub async fn clear_conversation(&self) {
        self.run(Event::ClearRequested).await;
    }

    /// Replace the local log with the backend's copy
    pub async fn reload(&self) {
        self.run(Event::ReloadRequested).await;
    }

    pub fn dismiss_error(&self) {
        let effects = self.dispatch(Event::DismissError);
        debug_assert!(effects.is_empty());
    }

    /// Stream a reply for `text` without touching the conversation state.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`ApiError`].
    pub async fn stream_message(
        &self,
        text: &str,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ApiError> {
        let conversation_id = self.state.borrow().conversation_id.clone();
        self.backend
            .stream_message(text, &conversation_id, on_chunk)
            .await
    }

    async fn run(&self, event: Event) {
        let mut queue: VecDeque<Effect> = self.dispatch(event).into();
        while let Some(effect) = queue.pop_front() {
            let completion = self.execute_effect(effect).await;
            queue.extend(self.dispatch(completion));
        }
    }

    /// Apply one event atomically, returning the effects to execute
    fn dispatch(&self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.state.send_if_modified(|state| match transition(state, event) {
            Ok(result) => {
                let changed = *state != result.new_state;
                *state = result.new_state;
                effects = result.effects;
                changed
            }
            Err(e) => {
                tracing::debug!(error = %e, "Event rejected");
                false
            }
        });
        effects
    }

    async fn execute_effect(&self, effect: Effect) -> Event {
        match effect {
            Effect::SendMessage {
                request_id,
                content,
                conversation_id,
            } => {
                tracing::info!(conv_id = %conversation_id, request_id, "Sending message");
                match self.backend.send_message(&content, &conversation_id).await {
                    Ok(snapshot) => Event::SendCompleted {
                        request_id,
                        snapshot,
                    },
                    Err(error) => {
                        tracing::warn!(request_id, error = %error, "Error sending message");
                        Event::SendFailed { request_id, error }
                    }
                }
            }

            Effect::ClearConversation { conversation_id } => {
                tracing::info!(conv_id = %conversation_id, "Clearing conversation");
                match self.backend.clear_conversation(&conversation_id).await {
                    Ok(()) => Event::ClearCompleted,
                    Err(error) => {
                        tracing::warn!(error = %error, "Error clearing conversation");
                        Event::ClearFailed { error }
                    }
                }
            }

            Effect::FetchConversation { conversation_id } => {
                tracing::info!(conv_id = %conversation_id, "Loading conversation");
                match self.backend.get_conversation(&conversation_id).await {
                    Ok(snapshot) => Event::ReloadCompleted { snapshot },
                    Err(error) => {
                        if !error.is_not_found() {
                            tracing::warn!(error = %error, "Error loading conversation");
                        }
                        Event::ReloadFailed { error }
                    }
                }
            }
        }
    }
}
