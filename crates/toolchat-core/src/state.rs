//! UI-agnostic conversation types
//!
//! This module contains data structures that are shared between different frontends
//! (the terminal UI, the one-shot CLI, HTML output) and don't depend on any specific
//! rendering medium.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tools::Tool;

/// Who authored a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn avatar(&self) -> &'static str {
        match self {
            Sender::User => "👤",
            Sender::Assistant => "🤖",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "AI",
        }
    }
}

/// Tool-usage metadata as the backend reports it.
///
/// Only `name` is interpreted; everything else the backend sends (arguments, raw tool
/// output) is carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUsage {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolUsage {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extra: Map::new(),
        }
    }
}

/// Display chrome for a tool invocation, resolved from a [`ToolUsage`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolBadge {
    pub tool_id: String,
    pub icon: &'static str,
    pub display_name: String,
}

impl ToolBadge {
    /// Resolve the icon and display name for a tool id. Unknown ids get the generic
    /// icon and keep the raw id as their name.
    pub fn resolve(tool_id: &str) -> Self {
        match Tool::from_id(tool_id) {
            Some(tool) => Self {
                tool_id: tool_id.to_string(),
                icon: tool.icon(),
                display_name: tool.display_name().to_string(),
            },
            None => Self {
                tool_id: tool_id.to_string(),
                icon: Tool::GENERIC_ICON,
                display_name: tool_id.to_string(),
            },
        }
    }

    pub fn label(&self) -> String {
        format!("Used {}", self.display_name)
    }
}

/// A rendered chat message. Never mutated once it is in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub tool: Option<ToolBadge>,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            text: text.to_string(),
            tool: None,
        }
    }

    pub fn assistant(text: &str, tool_used: Option<&ToolUsage>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.to_string(),
            tool: tool_used.map(|usage| ToolBadge::resolve(&usage.name)),
        }
    }
}

/// Successful payload of the chat endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub tool_used: Option<ToolUsage>,
}

/// Transient per-conversation UI state owned by a controller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub pending_request: bool,
    pub draft_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tool_badge() {
        let badge = ToolBadge::resolve("calculator");
        assert_eq!(badge.icon, "🧮");
        assert_eq!(badge.label(), "Used Calculator");
    }

    #[test]
    fn test_unknown_tool_badge_keeps_raw_id() {
        let badge = ToolBadge::resolve("unknown_tool_xyz");
        assert_eq!(badge.icon, "🔧");
        assert_eq!(badge.display_name, "unknown_tool_xyz");
        assert_eq!(badge.label(), "Used unknown_tool_xyz");
    }

    #[test]
    fn test_reply_with_opaque_tool_fields() {
        let body = r#"{
            "response": "4",
            "tool_used": {"name": "calculator", "arguments": {"expression": "2+2"}, "result": {"result": 4}}
        }"#;
        let reply: ChatReply = serde_json::from_str(body).unwrap();
        let usage = reply.tool_used.unwrap();
        assert_eq!(usage.name, "calculator");
        assert!(usage.extra.contains_key("arguments"));
        assert!(usage.extra.contains_key("result"));
    }

    #[test]
    fn test_reply_with_null_or_missing_tool() {
        let null: ChatReply = serde_json::from_str(r#"{"response": "hi", "tool_used": null}"#).unwrap();
        assert!(null.tool_used.is_none());

        let missing: ChatReply = serde_json::from_str(r#"{"response": "hi"}"#).unwrap();
        assert!(missing.tool_used.is_none());
    }

    #[test]
    fn test_reply_missing_response_is_rejected() {
        assert!(serde_json::from_str::<ChatReply>(r#"{"error": "boom"}"#).is_err());
    }

    #[test]
    fn test_assistant_message_without_tool() {
        let msg = Message::assistant("hello", None);
        assert_eq!(msg.sender, Sender::Assistant);
        assert!(msg.tool.is_none());
    }
}
