//! HTTP implementation of the chat backend

use super::stream::Utf8StreamDecoder;
use super::{ApiError, ChatBackend, ChatRequest, ConversationSnapshot};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

/// Backend reached over REST at an injected base URL
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Fails if `base_url` cannot take path segments (e.g. `mailto:`) or the
    /// HTTP client cannot be initialised.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::invalid_url(format!(
                "Base URL cannot carry endpoint paths: {base_url}"
            )));
        }
        // No timeout: a hung request stays outstanding until it resolves.
        let client = Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::decode(format!("Failed to parse response: {e} - body: {body}")))
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, &body))
}

fn classify_status(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::not_found(format!("Not found: {body}")),
        _ => ApiError::status(status.as_u16(), format!("HTTP {status}: {body}")),
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(
        &self,
        content: &str,
        conversation_id: &str,
    ) -> Result<ConversationSnapshot, ApiError> {
        let response = self
            .client
            .post(self.endpoint(&["chat"]))
            .json(&ChatRequest {
                message: content,
                conversation_id: Some(conversation_id),
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        Self::read_json(response).await
    }

    async fn get_conversation(&self, conversation_id: &str) -> Result<ConversationSnapshot, ApiError> {
        let response = self
            .client
            .get(self.endpoint(&["conversation", conversation_id]))
            .send()
            .await?;
        let response = check_status(response).await?;
        Self::read_json(response).await
    }

    async fn clear_conversation(&self, conversation_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.endpoint(&["conversation", conversation_id]))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn stream_message(
        &self,
        content: &str,
        conversation_id: &str,
        on_chunk: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(&["chat", "stream"]))
            .json(&ChatRequest {
                message: content,
                conversation_id: Some(conversation_id),
            })
            .send()
            .await?;
        let response = check_status(response).await?;

        // Nothing to read is not a failure.
        if response.content_length() == Some(0) {
            tracing::debug!("Stream response has no body");
            return Ok(());
        }

        let mut decoder = Utf8StreamDecoder::new();
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            let text = decoder.decode(&chunk);
            if !text.is_empty() {
                on_chunk(&text);
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            on_chunk(&tail);
        }
        Ok(())
    }
}
