use crate::sanitize::html_escape;
use crate::state::{Message, Sender};

/// One visible row of the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(Message),
    /// "Assistant is composing" placeholder, not part of the semantic transcript
    Loading,
}

/// Append-only conversation log plus the single loading placeholder.
///
/// Messages are only ever pushed. The placeholder is the one entry that can be removed,
/// and there is never more than one of it.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.entries.push(Entry::Message(message));
    }

    pub fn show_loading(&mut self) {
        if !self.is_loading() {
            self.entries.push(Entry::Loading);
        }
    }

    pub fn remove_loading(&mut self) {
        self.entries.retain(|entry| *entry != Entry::Loading);
    }

    pub fn is_loading(&self) -> bool {
        self.entries.iter().any(|entry| *entry == Entry::Loading)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Message(message) => Some(message),
            Entry::Loading => None,
        })
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages().last()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Render the transcript as HTML fragments, one `div.message` per entry.
///
/// Message text is escaped; avatars and badges are built here and trusted.
pub fn render_html(transcript: &Transcript) -> String {
    let mut html = String::new();
    for entry in transcript.entries() {
        match entry {
            Entry::Message(message) => html.push_str(&message_html(message)),
            Entry::Loading => html.push_str(LOADING_HTML),
        }
        html.push('\n');
    }
    html
}

const LOADING_HTML: &str = concat!(
    r#"<div class="message assistant-message" id="loading-message">"#,
    r#"<div class="message-content"><div class="avatar">🤖</div>"#,
    r#"<div class="text"><div class="loading">"#,
    r#"<div class="loading-dot"></div><div class="loading-dot"></div><div class="loading-dot"></div>"#,
    r#"</div></div></div></div>"#,
);

fn message_html(message: &Message) -> String {
    let class = match message.sender {
        Sender::User => "user-message",
        Sender::Assistant => "assistant-message",
    };

    let badge = message
        .tool
        .as_ref()
        .map(|badge| {
            format!(
                r#"<div class="tool-badge"><span class="tool-icon">{}</span><span>{}</span></div>"#,
                badge.icon,
                // Unknown tools show the backend's raw id, which is untrusted text.
                html_escape(&badge.label())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div class="message {}"><div class="message-content"><div class="avatar">{}</div><div class="text"><p>{}</p>{}</div></div></div>"#,
        class,
        message.sender.avatar(),
        html_escape(&message.text),
        badge
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ToolUsage;

    #[test]
    fn test_single_loading_placeholder() {
        let mut transcript = Transcript::new();
        transcript.show_loading();
        transcript.show_loading();
        assert_eq!(transcript.len(), 1);

        transcript.remove_loading();
        assert!(transcript.is_empty());
        assert!(!transcript.is_loading());
    }

    #[test]
    fn test_remove_loading_keeps_messages() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("hi"));
        transcript.show_loading();
        transcript.remove_loading();
        transcript.push(Message::assistant("hello", None));

        let texts: Vec<&str> = transcript.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hi", "hello"]);
    }

    #[test]
    fn test_html_escapes_message_text() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("<script>alert('x')</script>"));

        let html = render_html(&transcript);
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("user-message"));
    }

    #[test]
    fn test_html_badge_for_known_tool() {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant("4", Some(&ToolUsage::named("calculator"))));

        let html = render_html(&transcript);
        assert!(html.contains(r#"<span class="tool-icon">🧮</span><span>Used Calculator</span>"#));
    }

    #[test]
    fn test_html_badge_escapes_unknown_tool_id() {
        let mut transcript = Transcript::new();
        transcript.push(Message::assistant("ok", Some(&ToolUsage::named("<b>x</b>"))));

        let html = render_html(&transcript);
        assert!(html.contains("Used &lt;b&gt;x&lt;/b&gt;"));
        assert!(html.contains(r#"<span class="tool-icon">🔧</span>"#));
    }

    #[test]
    fn test_html_loading_placeholder() {
        let mut transcript = Transcript::new();
        transcript.show_loading();
        assert!(render_html(&transcript).contains(r#"id="loading-message""#));
    }
}
