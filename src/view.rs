//! Display filter over the conversation log

use crate::agent::{classify, AgentDisplayConfig};
use crate::api::{Message, Role};

/// Transient presentation toggles, not part of the conversation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Show every agent's reasoning rather than only user-facing turns
    pub show_full_details: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_full_details: true,
        }
    }
}

impl ViewOptions {
    pub fn toggle_details(&mut self) {
        self.show_full_details = !self.show_full_details;
    }
}

/// Whether a message survives the reduced (reasoning hidden) view
#[must_use]
pub fn is_user_facing(message: &Message) -> bool {
    match (&message.role, &message.agent) {
        (_, Some(agent)) if agent.is_user_facing() => true,
        (Some(Role::User), _) => true,
        (Some(Role::Assistant), None) => true,
        _ => false,
    }
}

/// Messages to render, in log order
#[must_use]
pub fn visible_messages(messages: &[Message], options: ViewOptions) -> Vec<&Message> {
    if options.show_full_details {
        messages.iter().collect()
    } else {
        messages.iter().filter(|m| is_user_facing(m)).collect()
    }
}

/// Heading shown above a message
#[must_use]
pub fn author_label(message: &Message) -> &'static str {
    if message.is_user() {
        "You"
    } else {
        display_config(message).label
    }
}

#[must_use]
pub fn display_config(message: &Message) -> AgentDisplayConfig {
    classify(message.agent.as_ref())
}
