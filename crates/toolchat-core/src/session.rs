//! Async driver around the [`Controller`].
//!
//! A `Session` owns one conversation: the controller, the transcript it feeds, and the
//! backend it talks to. Backend calls run on spawned tasks and report back through a
//! single-consumer channel, so the frontend's event loop stays free while a turn is out.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backend::ChatBackend;
use crate::controller::{Controller, Effect, Event};
use crate::error::BackendError;
use crate::state::ChatReply;
use crate::transcript::Transcript;

/// Result of one backend call, tagged with the turn that started it
#[derive(Debug)]
pub struct TurnCompletion {
    pub turn: u64,
    pub outcome: Result<ChatReply, BackendError>,
}

pub struct Session {
    controller: Controller,
    transcript: Transcript,
    backend: Arc<dyn ChatBackend>,
    completions_tx: mpsc::UnboundedSender<TurnCompletion>,
    completions_rx: mpsc::UnboundedReceiver<TurnCompletion>,
    input_enabled: bool,
    focus_requested: bool,
    scroll_requested: bool,
    requests_sent: u64,
}

impl Session {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller: Controller::new(),
            transcript: Transcript::new(),
            backend,
            completions_tx,
            completions_rx,
            input_enabled: true,
            // The input starts out focused.
            focus_requested: true,
            scroll_requested: false,
            requests_sent: 0,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn draft(&self) -> &str {
        self.controller.draft()
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Number of backend calls this session has started
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    pub fn edit_draft(&mut self, text: String) {
        let effects = self.controller.handle(Event::Edit(text));
        self.apply(effects);
    }

    /// Submit the current draft. Returns whether a turn was started.
    pub fn submit(&mut self) -> bool {
        let effects = self.controller.handle(Event::Submit);
        if effects.is_empty() {
            if self.controller.is_pending() {
                debug!("submit ignored: a reply is still pending");
            } else {
                debug!("submit ignored: draft is blank");
            }
            return false;
        }
        self.apply(effects);
        true
    }

    /// Wait for the next backend call to finish.
    pub async fn next_completion(&mut self) -> Option<TurnCompletion> {
        self.completions_rx.recv().await
    }

    pub fn complete(&mut self, completion: TurnCompletion) {
        let turn = completion.turn;
        let effects = self.controller.handle(Event::Completed {
            turn,
            outcome: completion.outcome,
        });
        if effects.is_empty() {
            warn!(turn, "ignoring completion for a turn that is not in flight");
            return;
        }
        self.apply(effects);
    }

    /// Run one whole turn: set the draft, submit it and wait for the outcome.
    /// Returns false without touching the backend when the turn was refused.
    pub async fn run_turn(&mut self, text: &str) -> bool {
        self.edit_draft(text.to_string());
        if !self.submit() {
            return false;
        }
        while self.is_pending() {
            match self.next_completion().await {
                Some(completion) => self.complete(completion),
                None => break,
            }
        }
        true
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Append(message) => self.transcript.push(message),
                Effect::ShowLoading => self.transcript.show_loading(),
                Effect::RemoveLoading => self.transcript.remove_loading(),
                Effect::ScrollToLatest => self.scroll_requested = true,
                Effect::SetInputEnabled(enabled) => self.input_enabled = enabled,
                Effect::FocusInput => self.focus_requested = true,
                Effect::SendRequest { turn, message } => self.dispatch(turn, message),
            }
        }
    }

    fn dispatch(&mut self, turn: u64, message: String) {
        self.requests_sent += 1;
        info!(turn, chars = message.chars().count(), "sending chat request");

        let backend = Arc::clone(&self.backend);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let outcome = backend.send(&message).await;
            match &outcome {
                Ok(reply) => info!(
                    turn,
                    tool = reply.tool_used.as_ref().map(|t| t.name.as_str()),
                    "reply received"
                ),
                Err(e) => warn!(turn, error = %e, "chat request failed"),
            }
            // Fails only once the session itself is gone.
            let _ = tx.send(TurnCompletion { turn, outcome });
        });
    }
}
