//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConversationState, PendingSend, Phase, RequestId, DEFAULT_CONVERSATION_ID};
pub use transition::{
    transition, TransitionError, TransitionResult, CLEAR_FAILED_MESSAGE, LOAD_FAILED_MESSAGE,
    SEND_FAILED_MESSAGE,
};
