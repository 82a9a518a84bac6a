use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong talking to the chat endpoint.
///
/// The user sees one apology for all of these; the variants exist for logs and tests.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no reply within {0}s")]
    Timeout(u64),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}
