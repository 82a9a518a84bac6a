pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod sanitize;
pub mod session;
pub mod state;
pub mod tools;
pub mod transcript;

// Re-export main types for convenience
pub use backend::{ChatBackend, ChatClient};
pub use config::Config;
pub use controller::{Controller, Effect, Event, Phase, APOLOGY};
pub use error::BackendError;
pub use session::{Session, TurnCompletion};
pub use state::{ChatReply, InteractionState, Message, Sender, ToolBadge, ToolUsage};
pub use tools::Tool;
pub use transcript::{render_html, Entry, Transcript};
