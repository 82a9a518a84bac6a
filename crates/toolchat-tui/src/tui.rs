use std::io::{self, Stderr};
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyEvent, KeyEventKind, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use futures_util::StreamExt;
use tokio::sync::mpsc;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Period of the "Thinking..." animation
const TICK: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Text delivered in one piece by bracketed paste
    Paste(String),
    Resize,
    Tick,
    /// The terminal stopped delivering input; no more keys will arrive
    InputLost(io::Error),
}

/// Map a raw terminal event to what the chat loop cares about.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Some terminals report release and repeat as well
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Paste(text) => Some(AppEvent::Paste(text)),
        Event::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}

/// Merges terminal input and the animation ticker into one stream.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        spawn_input_reader(tx.clone());
        spawn_ticker(tx);
        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

fn spawn_input_reader(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut reader = event::EventStream::new();
        while let Some(evt) = reader.next().await {
            let app_event = match evt {
                Ok(evt) => translate(evt),
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event stream failed");
                    // The ticker keeps the channel open, so the loop has to be told.
                    let _ = tx.send(AppEvent::InputLost(e));
                    break;
                }
            };

            if let Some(app_event) = app_event {
                if tx.send(app_event).is_err() {
                    break;
                }
            }
        }
    });
}

fn spawn_ticker(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK);
        loop {
            interval.tick().await;
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

/// Switch the terminal into the chat screen: raw mode, alternate screen, wheel and paste events.
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(
        io::stderr(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    Ok(Terminal::new(CrosstermBackend::new(io::stderr()))?)
}

pub fn restore() -> Result<()> {
    execute!(
        io::stderr(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    disable_raw_mode()?;
    Ok(())
}

/// Leave raw mode before a panic message is printed, or the shell is left unusable.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        previous(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(KeyCode::Char('a'), KeyModifiers::NONE, kind))
    }

    #[test]
    fn test_only_key_presses_pass() {
        assert!(matches!(translate(key(KeyEventKind::Press)), Some(AppEvent::Key(_))));
        assert!(translate(key(KeyEventKind::Release)).is_none());
        assert!(translate(key(KeyEventKind::Repeat)).is_none());
    }

    #[test]
    fn test_paste_arrives_whole() {
        match translate(Event::Paste("line one\nline two".to_string())) {
            Some(AppEvent::Paste(text)) => assert_eq!(text, "line one\nline two"),
            other => panic!("expected paste, got {:?}", other),
        }
    }

    #[test]
    fn test_focus_changes_are_dropped() {
        assert!(translate(Event::FocusGained).is_none());
        assert!(matches!(translate(Event::Resize(80, 24)), Some(AppEvent::Resize)));
    }
}
