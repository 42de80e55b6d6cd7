//! Transport to the diagnostic reasoning backend
//!
//! Provides a common interface over the backend's REST surface so the
//! runtime can be exercised against mocks.

mod client;
mod error;
pub mod stream;
mod types;

pub use client::HttpBackend;
pub use error::{ApiError, ApiErrorKind};
pub use types::{ChatRequest, ConversationSnapshot, Message, Role};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Operations the conversation needs from the backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `POST /chat`
    async fn send_message(
        &self,
        content: &str,
        conversation_id: &str,
    ) -> Result<ConversationSnapshot, ApiError>;

    /// `GET /conversation/{id}`
    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationSnapshot, ApiError>;

    /// `DELETE /conversation/{id}`
    async fn clear_conversation(&self, conversation_id: &str) -> Result<(), ApiError>;

    /// `POST /chat/stream`, invoking `on_chunk` with each decoded fragment
    async fn stream_message(
        &self,
        content: &str,
        conversation_id: &str,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ApiError>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn send_message(
        &self,
        content: &str,
        conversation_id: &str,
    ) -> Result<ConversationSnapshot, ApiError> {
        (**self).send_message(content, conversation_id).await
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationSnapshot, ApiError> {
        (**self).get_conversation(conversation_id).await
    }

    async fn clear_conversation(&self, conversation_id: &str) -> Result<(), ApiError> {
        (**self).clear_conversation(conversation_id).await
    }

    async fn stream_message(
        &self,
        content: &str,
        conversation_id: &str,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ApiError> {
        (**self).stream_message(content, conversation_id, on_chunk).await
    }
}

/// Logging wrapper for chat backends
pub struct LoggingBackend {
    inner: Arc<dyn ChatBackend>,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn ChatBackend>) -> Self {
        Self { inner }
    }
}

fn log_outcome<T>(
    operation: &str,
    conversation_id: &str,
    start: Instant,
    result: &Result<T, ApiError>,
    detail: impl FnOnce(&T) -> usize,
) {
    let duration = start.elapsed();
    match result {
        Ok(value) => {
            tracing::info!(
                operation,
                conv_id = %conversation_id,
                duration_ms = %duration.as_millis(),
                count = detail(value),
                "Backend request completed"
            );
        }
        Err(e) => {
            tracing::error!(
                operation,
                conv_id = %conversation_id,
                duration_ms = %duration.as_millis(),
                kind = ?e.kind,
                error = %e.message,
                "Backend request failed"
            );
        }
    }
}

#[async_trait]
impl ChatBackend for LoggingBackend {
    async fn send_message(
        &self,
        content: &str,
        conversation_id: &str,
    ) -> Result<ConversationSnapshot, ApiError> {
        let start = Instant::now();
        let result = self.inner.send_message(content, conversation_id).await;
        log_outcome("send_message", conversation_id, start, &result, |s| {
            s.messages.len()
        });
        result
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationSnapshot, ApiError> {
        let start = Instant::now();
        let result = self.inner.get_conversation(conversation_id).await;
        log_outcome("get_conversation", conversation_id, start, &result, |s| {
            s.messages.len()
        });
        result
    }

    async fn clear_conversation(&self, conversation_id: &str) -> Result<(), ApiError> {
        let start = Instant::now();
        let result = self.inner.clear_conversation(conversation_id).await;
        log_outcome("clear_conversation", conversation_id, start, &result, |_| 0);
        result
    }

    async fn stream_message(
        &self,
        content: &str,
        conversation_id: &str,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ApiError> {
        let start = Instant::now();
        let mut fragments = 0usize;
        let mut counting = |text: &str| {
            fragments += 1;
            on_chunk(text);
        };
        let result = self
            .inner
            .stream_message(content, conversation_id, &mut counting)
            .await;
        log_outcome("stream_message", conversation_id, start, &result, |_| {
            fragments
        });
        result
    }
}
