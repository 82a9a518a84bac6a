use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::BackendError;
use crate::state::ChatReply;

/// The chat endpoint as the session sees it: one message in, one reply out.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatReply, BackendError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client for a `POST {"message": ...}` chat endpoint
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Self::new(&config.endpoint, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn classify(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout.as_secs())
        } else {
            BackendError::Transport(err)
        }
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn send(&self, message: &str) -> Result<ChatReply, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        parse_reply(status, &body)
    }
}

/// Turn a raw endpoint response into a reply or a failure.
pub(crate) fn parse_reply(status: StatusCode, body: &str) -> Result<ChatReply, BackendError> {
    if !status.is_success() {
        // The reference backend reports `{"error": "..."}`; anything else is just noise.
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.error);
        return Err(BackendError::Status { status, detail });
    }

    Ok(serde_json::from_str(body)?)
}
