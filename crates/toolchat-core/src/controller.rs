//! Turn lifecycle state machine.
//!
//! The controller never performs I/O. Each call to [`Controller::transition`] consumes the
//! current controller and an [`Event`] and returns the next controller plus the ordered
//! [`Effect`]s the caller has to carry out (append to the transcript, start the backend
//! request, toggle the input). A turn moves `Idle → Submitting → AwaitingReply → Idle`;
//! `Submitting` only exists between the user echo and the request dispatch, which happen
//! in the same transition, so it is never observable from outside.

use crate::error::BackendError;
use crate::state::{ChatReply, InteractionState, Message};

/// Shown in place of a reply whenever a turn fails for any reason
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingReply { turn: u64 },
}

#[derive(Debug)]
pub enum Event {
    /// The draft text changed in the input box
    Edit(String),
    /// The user asked to send the current draft
    Submit,
    /// The backend call for `turn` finished
    Completed {
        turn: u64,
        outcome: Result<ChatReply, BackendError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Append(Message),
    ShowLoading,
    RemoveLoading,
    ScrollToLatest,
    SetInputEnabled(bool),
    FocusInput,
    SendRequest { turn: u64, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct Controller {
    state: InteractionState,
    in_flight: Option<u64>,
    turns_started: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn draft(&self) -> &str {
        &self.state.draft_text
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending_request
    }

    pub fn phase(&self) -> Phase {
        match self.in_flight {
            Some(turn) => Phase::AwaitingReply { turn },
            None => Phase::Idle,
        }
    }

    /// Apply `event` in place and return the effects to execute.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let (next, effects) = std::mem::take(self).transition(event);
        *self = next;
        effects
    }

    pub fn transition(mut self, event: Event) -> (Self, Vec<Effect>) {
        let effects = match event {
            Event::Edit(text) => {
                // Input is locked while a reply is outstanding.
                if !self.state.pending_request {
                    self.state.draft_text = text;
                }
                Vec::new()
            }
            Event::Submit => self.submit(),
            Event::Completed { turn, outcome } => self.complete(turn, outcome),
        };
        (self, effects)
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.state.pending_request {
            return Vec::new();
        }
        let message = self.state.draft_text.trim().to_string();
        if message.is_empty() {
            return Vec::new();
        }

        self.turns_started += 1;
        let turn = self.turns_started;
        self.state.draft_text.clear();
        self.state.pending_request = true;
        self.in_flight = Some(turn);

        vec![
            // Idle -> Submitting
            Effect::Append(Message::user(&message)),
            Effect::ScrollToLatest,
            Effect::SetInputEnabled(false),
            // Submitting -> AwaitingReply
            Effect::ShowLoading,
            Effect::ScrollToLatest,
            Effect::SendRequest { turn, message },
        ]
    }

    fn complete(&mut self, turn: u64, outcome: Result<ChatReply, BackendError>) -> Vec<Effect> {
        if self.in_flight != Some(turn) {
            return Vec::new();
        }
        self.in_flight = None;
        self.state.pending_request = false;

        let message = match outcome {
            Ok(reply) => Message::assistant(&reply.response, reply.tool_used.as_ref()),
            Err(_) => Message::assistant(APOLOGY, None),
        };

        vec![
            Effect::RemoveLoading,
            Effect::Append(message),
            Effect::ScrollToLatest,
            Effect::SetInputEnabled(true),
            Effect::FocusInput,
        ]
    }
}
