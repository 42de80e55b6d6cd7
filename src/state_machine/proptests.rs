//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::agent::AgentTag;
use crate::api::{ApiError, ConversationSnapshot, Message, Role};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_agent() -> impl Strategy<Value = Option<AgentTag>> {
    prop_oneof![
        Just(None),
        proptest::sample::select(AgentTag::KNOWN.to_vec()).prop_map(Some),
        "[A-Za-z]{1,10}".prop_map(|s| Some(AgentTag::from(s))),
    ]
}

fn arb_message() -> impl Strategy<Value = Message> {
    (
        prop_oneof![Just(None), Just(Some(Role::User)), Just(Some(Role::Assistant))],
        "[a-zA-Z0-9 ?]{0,30}",
        arb_agent(),
    )
        .prop_map(|(role, content, agent)| Message {
            role,
            content,
            timestamp: None,
            agent,
        })
}

fn arb_log() -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(arb_message(), 0..8)
}

fn arb_snapshot() -> impl Strategy<Value = ConversationSnapshot> {
    ("[a-z0-9-]{1,12}", arb_log()).prop_map(|(id, messages)| ConversationSnapshot::new(id, messages))
}

fn arb_state() -> impl Strategy<Value = ConversationState> {
    (
        "[a-z0-9-]{1,12}",
        arb_log(),
        proptest::option::of("[a-zA-Z .]{1,30}"),
    )
        .prop_map(|(id, messages, error)| {
            let mut state = ConversationState::new(id);
            state.messages = messages;
            state.error = error;
            state
        })
}

fn arb_text() -> impl Strategy<Value = String> {
    "[ \t]{0,3}[a-zA-Z0-9?]{1,20}[ \t]{0,3}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,6}"
}

fn arb_api_error() -> impl Strategy<Value = ApiError> {
    prop_oneof![
        Just(ApiError::network("connection refused")),
        Just(ApiError::not_found("missing")),
        (400u16..600).prop_map(|code| ApiError::status(code, "failed")),
        Just(ApiError::decode("bad json")),
    ]
}

fn submit(text: String) -> Event {
    Event::UserSubmit {
        text,
        timestamp: "2024-05-01T10:00:00.000Z".to_string(),
    }
}

/// Operations a user or the backend can perform, resolved against the
/// current state when applied
#[derive(Debug, Clone)]
enum Op {
    Submit(String),
    CompleteOldest(ConversationSnapshot),
    CompleteNewest(ConversationSnapshot),
    FailOldest(ApiError),
    Clear(bool),
    Reload(Option<ConversationSnapshot>, ApiError),
    Dismiss,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_text().prop_map(Op::Submit),
        2 => arb_snapshot().prop_map(Op::CompleteOldest),
        1 => arb_snapshot().prop_map(Op::CompleteNewest),
        1 => arb_api_error().prop_map(Op::FailOldest),
        1 => any::<bool>().prop_map(Op::Clear),
        1 => (proptest::option::of(arb_snapshot()), arb_api_error())
            .prop_map(|(snapshot, error)| Op::Reload(snapshot, error)),
        1 => Just(Op::Dismiss),
    ]
}

fn apply(state: &ConversationState, event: Event) -> ConversationState {
    transition(state, event).unwrap().new_state
}

/// Apply an op, skipping completions when nothing is pending
fn apply_op(state: &ConversationState, op: Op) -> ConversationState {
    match op {
        Op::Submit(text) => apply(state, submit(text)),
        Op::CompleteOldest(snapshot) => match state.pending.first() {
            Some(p) => apply(
                state,
                Event::SendCompleted {
                    request_id: p.request_id,
                    snapshot,
                },
            ),
            None => state.clone(),
        },
        Op::CompleteNewest(snapshot) => match state.pending.last() {
            Some(p) => apply(
                state,
                Event::SendCompleted {
                    request_id: p.request_id,
                    snapshot,
                },
            ),
            None => state.clone(),
        },
        Op::FailOldest(error) => match state.pending.first() {
            Some(p) => apply(
                state,
                Event::SendFailed {
                    request_id: p.request_id,
                    error,
                },
            ),
            None => state.clone(),
        },
        Op::Clear(ok) => {
            let requested = apply(state, Event::ClearRequested);
            if ok {
                apply(&requested, Event::ClearCompleted)
            } else {
                apply(
                    &requested,
                    Event::ClearFailed {
                        error: ApiError::network("refused"),
                    },
                )
            }
        }
        Op::Reload(snapshot, error) => {
            let requested = apply(state, Event::ReloadRequested);
            match snapshot {
                Some(snapshot) => apply(&requested, Event::ReloadCompleted { snapshot }),
                None => apply(&requested, Event::ReloadFailed { error }),
            }
        }
        Op::Dismiss => apply(state, Event::DismissError),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_submit_appends_exactly_one_user_message(state in arb_state(), text in arb_text()) {
        let result = transition(&state, submit(text.clone())).unwrap();
        let next = result.new_state;

        prop_assert_eq!(next.messages.len(), state.messages.len() + 1);
        prop_assert_eq!(&next.messages[..state.messages.len()], &state.messages[..]);
        let last = next.messages.last().unwrap();
        prop_assert!(last.is_user());
        prop_assert_eq!(&last.content, &text);
        prop_assert!(next.is_loading);
        prop_assert_eq!(next.error, None);
        prop_assert_eq!(result.effects.len(), 1);
        let is_send = matches!(result.effects[0], Effect::SendMessage { .. });
        prop_assert!(is_send);
    }

    #[test]
    fn prop_blank_submit_is_rejected(state in arb_state(), text in arb_blank()) {
        prop_assert_eq!(
            transition(&state, submit(text)).unwrap_err(),
            TransitionError::EmptyMessage
        );
    }

    #[test]
    fn prop_send_completed_is_full_replacement(
        state in arb_state(),
        text in arb_text(),
        snapshot in arb_snapshot(),
    ) {
        let sent = apply(&state, submit(text));
        let request_id = sent.pending[0].request_id;
        let next = apply(&sent, Event::SendCompleted { request_id, snapshot: snapshot.clone() });

        prop_assert_eq!(next.messages, snapshot.messages);
        prop_assert_eq!(next.conversation_id, snapshot.conversation_id);
        prop_assert!(!next.is_loading);
        prop_assert_eq!(next.error, None);
    }

    #[test]
    fn prop_send_failed_keeps_optimistic_log(
        state in arb_state(),
        text in arb_text(),
        error in arb_api_error(),
    ) {
        let sent = apply(&state, submit(text));
        let request_id = sent.pending[0].request_id;
        let next = apply(&sent, Event::SendFailed { request_id, error });

        prop_assert_eq!(&next.messages, &sent.messages);
        prop_assert!(!next.is_loading);
        prop_assert_eq!(next.error.as_deref(), Some(SEND_FAILED_MESSAGE));
        prop_assert_eq!(next.conversation_id, state.conversation_id);
    }

    #[test]
    fn prop_clear_success_keeps_id(state in arb_state()) {
        let next = apply(&state, Event::ClearCompleted);
        prop_assert!(next.messages.is_empty());
        prop_assert_eq!(next.error, None);
        prop_assert_eq!(next.conversation_id, state.conversation_id);
        prop_assert_eq!(next.is_loading, state.is_loading);
    }

    #[test]
    fn prop_clear_failure_keeps_messages(state in arb_state()) {
        let next = apply(&state, Event::ClearFailed { error: ApiError::network("refused") });
        prop_assert_eq!(next.messages, state.messages);
        prop_assert!(next.error.is_some());
    }

    #[test]
    fn prop_requests_do_not_mutate(state in arb_state()) {
        prop_assert_eq!(apply(&state, Event::ClearRequested), state.clone());
        prop_assert_eq!(apply(&state, Event::ReloadRequested), state);
    }

    #[test]
    fn prop_loading_implies_pending(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let mut state = ConversationState::default();
        for op in ops {
            state = apply_op(&state, op);

            if state.is_loading {
                prop_assert!(!state.pending.is_empty());
            }
            prop_assert!(state.pending.iter().all(|p| p.request_id < state.next_request_id));
        }
    }

    #[test]
    fn prop_last_resolved_send_wins(
        first in arb_snapshot(),
        second in arb_snapshot(),
    ) {
        let state = apply(&ConversationState::default(), submit("A".to_string()));
        let state = apply(&state, submit("B".to_string()));
        prop_assert_eq!(state.messages.len(), 2);

        // B resolves first, then A
        let state = apply(&state, Event::SendCompleted { request_id: 2, snapshot: second });
        prop_assert!(!state.is_loading);
        let state = apply(&state, Event::SendCompleted { request_id: 1, snapshot: first.clone() });

        prop_assert_eq!(state.messages, first.messages);
        prop_assert_eq!(state.conversation_id, first.conversation_id);
        prop_assert!(state.pending.is_empty());
    }
}
