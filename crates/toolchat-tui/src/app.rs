use toolchat_core::{Session, TurnCompletion};

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub session: Session,
    pub endpoint: String,

    // Input box
    pub input_cursor: usize, // cursor position in the draft, in chars
    pub input_focused: bool,

    // Transcript view
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the transcript pane
    pub chat_rows: u16,   // wrapped rows of the last render
    pub follow_latest: bool,

    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(session: Session, endpoint: &str) -> Self {
        let mut app = Self {
            should_quit: false,
            session,
            endpoint: endpoint.to_string(),
            input_cursor: 0,
            input_focused: false,
            chat_scroll: 0,
            chat_height: 0,
            chat_rows: 0,
            follow_latest: true,
            animation_frame: 0,
        };
        app.sync_session();
        app
    }

    pub fn draft(&self) -> &str {
        self.session.draft()
    }

    pub fn input_enabled(&self) -> bool {
        self.session.input_enabled()
    }

    // Draft editing. Every edit goes through the session so a pending turn can refuse it.
    pub fn insert_char(&mut self, c: char) {
        if !self.input_enabled() {
            return;
        }
        let mut draft = self.draft().to_string();
        let byte_pos = char_to_byte_index(&draft, self.input_cursor);
        draft.insert(byte_pos, c);
        self.session.edit_draft(draft);
        self.input_cursor += 1;
    }

    /// Insert pasted text at the cursor. The draft is a single line, so line breaks
    /// and tabs become spaces instead of submitting.
    pub fn insert_str(&mut self, text: &str) {
        if !self.input_enabled() {
            return;
        }
        let folded: String = text
            .replace("\r\n", "\n")
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();
        let mut draft = self.draft().to_string();
        let byte_pos = char_to_byte_index(&draft, self.input_cursor);
        draft.insert_str(byte_pos, &folded);
        self.session.edit_draft(draft);
        self.input_cursor += folded.chars().count();
    }

    pub fn backspace(&mut self) {
        if !self.input_enabled() || self.input_cursor == 0 {
            return;
        }
        self.input_cursor -= 1;
        let mut draft = self.draft().to_string();
        let byte_pos = char_to_byte_index(&draft, self.input_cursor);
        draft.remove(byte_pos);
        self.session.edit_draft(draft);
    }

    pub fn delete(&mut self) {
        if !self.input_enabled() {
            return;
        }
        let mut draft = self.draft().to_string();
        if self.input_cursor < draft.chars().count() {
            let byte_pos = char_to_byte_index(&draft, self.input_cursor);
            draft.remove(byte_pos);
            self.session.edit_draft(draft);
        }
    }

    pub fn cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.draft().chars().count();
        self.input_cursor = (self.input_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.input_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.input_cursor = self.draft().chars().count();
    }

    pub fn submit(&mut self) {
        if self.session.submit() {
            self.input_cursor = 0;
            self.input_focused = false;
        }
        self.sync_session();
    }

    pub fn on_completion(&mut self, completion: TurnCompletion) {
        self.session.complete(completion);
        self.sync_session();
    }

    /// Pick up focus and scroll requests the session raised since the last call.
    fn sync_session(&mut self) {
        if self.session.take_focus_request() {
            self.input_focused = true;
            self.input_cursor = self.draft().chars().count();
        }
        if self.session.take_scroll_request() {
            self.follow_latest = true;
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Transcript scrolling
    pub fn scroll_up(&mut self, rows: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(rows);
        self.follow_latest = false;
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.chat_scroll = (self.chat_scroll + rows).min(self.max_scroll());
        if self.chat_scroll == self.max_scroll() {
            self.follow_latest = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.chat_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.chat_height.max(1));
    }

    /// Record the size of the freshly laid-out transcript and keep the scroll in range.
    pub fn update_chat_layout(&mut self, rows: u16, height: u16) {
        self.chat_rows = rows;
        self.chat_height = height;
        if self.follow_latest {
            self.chat_scroll = self.max_scroll();
        } else {
            self.chat_scroll = self.chat_scroll.min(self.max_scroll());
        }
    }

    fn max_scroll(&self) -> u16 {
        self.chat_rows.saturating_sub(self.chat_height)
    }
}
