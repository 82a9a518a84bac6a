use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use toolchat_core::sanitize::terminal_safe;
use toolchat_core::{Entry, Message, Sender};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use crate::app::App;

/// Split a word into pieces no wider than `width` terminal columns.
/// A single character wider than `width` still gets a piece of its own.
fn split_by_columns(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0;
    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if piece_width + w > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0;
        }
        piece.push(c);
        piece_width += w;
    }
    pieces.push(piece);
    pieces
}

/// Wrap text to fit within a given width, returning multiple lines.
/// Widths are terminal columns, so wide (CJK) characters count as two.
/// Breaks on spaces where it can and splits words longer than the width.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;
    let mut fresh = true; // nothing placed on current_line yet

    for word in text.split(' ') {
        let mut word = word.to_string();

        // Split words that could never fit on a line of their own
        if word.width() > width {
            if !fresh {
                lines.push(std::mem::take(&mut current_line));
                current_len = 0;
                fresh = true;
            }
            let mut pieces = split_by_columns(&word, width);
            word = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
        let word_len = word.width();

        if fresh {
            // First word on line
            current_line = word;
            current_len = word_len;
            fresh = false;
        } else if current_len + 1 + word_len <= width {
            // Word fits on current line
            current_line.push(' ');
            current_line.push_str(&word);
            current_len += 1 + word_len;
        } else {
            // Word doesn't fit, start new line
            lines.push(std::mem::take(&mut current_line));
            current_line = word;
            current_len = word_len;
        }
    }

    lines.push(current_line);
    lines
}

/// The slice of a single-line input that fits in `width` columns with the cursor visible.
/// Returns the visible text and the cursor's column inside it.
fn input_window(text: &str, cursor_col: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let offset = (cursor_col + 1).saturating_sub(width);

    let mut visible = String::new();
    let mut start = None;
    let mut col = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if col >= offset {
            let first = *start.get_or_insert(col);
            if col + w - first > width {
                break;
            }
            visible.push(c);
        }
        col += w;
    }

    let first = start.unwrap_or(offset);
    (visible, cursor_col.saturating_sub(first))
}

fn role_line(sender: Sender) -> Line<'static> {
    let color = match sender {
        Sender::User => Color::Cyan,
        Sender::Assistant => Color::Yellow,
    };
    Line::from(Span::styled(
        format!("{} {}:", sender.avatar(), sender.label()),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn message_lines(message: &Message, width: usize, lines: &mut Vec<Line<'static>>) {
    lines.push(role_line(message.sender));

    // Text is neutralized before it reaches the terminal and never parsed as markup
    for raw_line in terminal_safe(&message.text).split('\n') {
        for wrapped in wrap_text_to_width(raw_line, width) {
            lines.push(Line::from(wrapped));
        }
    }

    if let Some(badge) = &message.tool {
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", badge.icon)),
            Span::styled(
                terminal_safe(&badge.label()),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    lines.push(Line::default());
}

/// Lay out the whole transcript for a pane `width` columns wide.
/// Every returned line occupies exactly one row.
fn transcript_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for entry in app.session.transcript().entries() {
        match entry {
            Entry::Message(message) => message_lines(message, width, &mut lines),
            Entry::Loading => {
                lines.push(role_line(Sender::Assistant));
                // Animated ellipsis: cycles through ".", "..", "..."
                let dots = ".".repeat((app.animation_frame as usize) + 1);
                lines.push(Line::from(Span::styled(
                    format!("Thinking{}", dots),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    lines
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, transcript, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" toolchat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!(" {} ", app.endpoint), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    let border_color = if app.session.is_pending() { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Conversation ");

    if app.session.transcript().is_empty() {
        app.update_chat_layout(0, inner_height);
        let placeholder = Paragraph::new(Text::from(Span::styled(
            "Ask anything. The assistant can calculate, check the weather, analyze numbers, \
             generate passwords, validate emails and convert currencies.",
            Style::default().fg(Color::DarkGray),
        )))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let lines = transcript_lines(app, inner_width as usize);
    let rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.update_chat_layout(rows, inner_height);

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let enabled = app.input_enabled();
    let border_color = if !enabled {
        Color::DarkGray
    } else if app.input_focused {
        Color::Yellow
    } else {
        Color::Gray
    };
    let title = if enabled { " Message " } else { " Waiting for reply... " };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Horizontal scrolling keeps the cursor inside the box. Positions are terminal
    // columns of the neutralized text, which is what actually gets drawn.
    let inner_width = area.width.saturating_sub(2) as usize;
    let draft = app.draft();
    let before_cursor = draft
        .char_indices()
        .nth(app.input_cursor)
        .map_or(draft, |(i, _)| &draft[..i]);
    let cursor_col = terminal_safe(before_cursor).width();
    let (visible_text, cursor_x) = input_window(&terminal_safe(draft), cursor_col, inner_width);

    let text_color = if enabled { Color::Cyan } else { Color::DarkGray };
    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(text_color))
        .block(input_block);

    frame.render_widget(input, area);

    // Show cursor only while the input accepts keys
    if enabled && app.input_focused {
        let cursor_x = u16::try_from(cursor_x).unwrap_or(u16::MAX);
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Black).bg(Color::Gray);
    let label_style = Style::default().fg(Color::Gray);

    let (mode_text, mode_style) = if app.session.is_pending() {
        (" WAITING ", Style::default().fg(Color::Black).bg(Color::Yellow).bold())
    } else {
        (" READY ", Style::default().fg(Color::Black).bg(Color::Green).bold())
    };

    let mut hints = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", label_style),
    ];
    if !app.session.is_pending() {
        hints.extend(vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
        ]);
    }
    hints.extend(vec![
        Span::styled(" ↑/↓ PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixedBackend, NeverBackend};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use toolchat_core::Session;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for row in buffer.content.chunks(width) {
            for cell in row {
                text.push_str(cell.symbol());
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        screen_text(&terminal)
    }

    #[test]
    fn test_wrap_breaks_on_spaces() {
        assert_eq!(
            wrap_text_to_width("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text_to_width("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_leading_spaces() {
        assert_eq!(wrap_text_to_width("  indented", 20), vec!["  indented"]);
    }

    #[test]
    fn test_wrap_counts_wide_characters_as_two_columns() {
        let lines = wrap_text_to_width(&"汉".repeat(7), 6);
        assert_eq!(lines, vec!["汉汉汉", "汉汉汉", "汉"]);
        assert!(lines.iter().all(|line| line.width() <= 6));

        assert_eq!(wrap_text_to_width("ab 汉字 cd", 6), vec!["ab", "汉字", "cd"]);
    }

    #[test]
    fn test_input_window_tracks_columns() {
        assert_eq!(input_window("hello", 5, 10), ("hello".to_string(), 5));
        assert_eq!(input_window("abcdef", 6, 4), ("def".to_string(), 3));
        // A wide character straddling the left edge is dropped whole
        assert_eq!(input_window("汉汉汉", 6, 4), ("汉".to_string(), 2));
    }

    #[test]
    fn test_wrap_keeps_empty_line() {
        assert_eq!(wrap_text_to_width("", 10), vec![""]);
    }

    #[tokio::test]
    async fn test_renders_reply_with_badge() {
        let mut app = App::new(
            Session::new(Arc::new(FixedBackend {
                response: "4",
                tool: Some("calculator"),
            })),
            "http://localhost:5000/api/chat",
        );
        assert!(app.session.run_turn("What is 2+2?").await);

        let screen = draw(&mut app);
        assert!(screen.contains("What is 2+2?"));
        assert!(screen.contains("Used Calculator"));
        assert!(!screen.contains("Thinking"));
    }

    #[tokio::test]
    async fn test_renders_thinking_while_pending() {
        let mut app = App::new(Session::new(Arc::new(NeverBackend)), "http://localhost:5000/api/chat");
        for c in "hello".chars() {
            app.insert_char(c);
        }
        app.submit();

        let screen = draw(&mut app);
        assert!(screen.contains("Thinking."));
        assert!(screen.contains("Waiting for reply"));
    }

    #[tokio::test]
    async fn test_wide_reply_is_shown_in_full() {
        // 60 characters, 120 columns
        let mut app = App::new(
            Session::new(Arc::new(FixedBackend {
                response: "汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终汉终",
                tool: None,
            })),
            "http://localhost:5000/api/chat",
        );
        assert!(app.session.run_turn("translate").await);

        let screen = draw(&mut app);
        let shown = screen.chars().filter(|c| *c == '汉' || *c == '终').count();
        assert_eq!(shown, 60);
    }

    #[tokio::test]
    async fn test_escape_sequences_render_inert() {
        let mut app = App::new(
            Session::new(Arc::new(FixedBackend {
                response: "\x1b[31mred\x1b[0m <script>",
                tool: Some("unknown_tool_xyz"),
            })),
            "http://localhost:5000/api/chat",
        );
        app.session.run_turn("hi").await;

        let screen = draw(&mut app);
        assert!(!screen.contains('\x1b'));
        assert!(screen.contains("␛[31mred␛[0m <script>"));
        assert!(screen.contains("Used unknown_tool_xyz"));
    }
}
