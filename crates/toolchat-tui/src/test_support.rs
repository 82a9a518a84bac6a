use async_trait::async_trait;
use toolchat_core::{BackendError, ChatBackend, ChatReply, ToolUsage};

/// Never answers, so a submitted turn stays pending.
pub struct NeverBackend;

#[async_trait]
impl ChatBackend for NeverBackend {
    async fn send(&self, _message: &str) -> Result<ChatReply, BackendError> {
        std::future::pending().await
    }
}

/// Answers every message with the same reply.
pub struct FixedBackend {
    pub response: &'static str,
    pub tool: Option<&'static str>,
}

#[async_trait]
impl ChatBackend for FixedBackend {
    async fn send(&self, _message: &str) -> Result<ChatReply, BackendError> {
        Ok(ChatReply {
            response: self.response.to_string(),
            tool_used: self.tool.map(ToolUsage::named),
        })
    }
}
