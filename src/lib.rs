//! Diagnostic Companion - client for a multi-agent medical-support backend
//!
//! Relays user input to the reasoning backend, keeps the client-side
//! conversation state, and decides which agent turns are shown.

pub mod agent;
pub mod api;
pub mod config;
pub mod runtime;
pub mod state_machine;
pub mod view;
