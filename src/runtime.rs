//! Runtime for executing conversations against a backend

mod executor;


pub use executor::ConversationRuntime;
