use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

#[cfg(test)]
mod test_support;

use app::App;
use toolchat_core::sanitize::terminal_safe;
use toolchat_core::{render_html, ChatClient, Config, Entry, Session, Transcript};

#[derive(Parser)]
#[command(name = "toolchat")]
#[command(about = "Chat with a tool-using assistant from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Chat endpoint URL (overrides the config file)
    #[arg(long, global = true, env = "TOOLCHAT_ENDPOINT")]
    endpoint: Option<String>,

    /// Seconds to wait for a reply before giving up
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Where to write logs in interactive mode
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single message and print the conversation
    Ask {
        /// Your message
        message: String,
        /// How to print the transcript
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    config.validate()?;

    match &cli.command {
        Some(Commands::Ask { message, format }) => {
            logging::init_stderr(cli.debug);
            ask(&config, message, *format).await
        }
        None => {
            let log_path = match &cli.log_file {
                Some(path) => path.clone(),
                None => logging::default_log_path()?,
            };
            logging::init_file(&log_path, cli.debug)?;
            run_tui(&config).await
        }
    }
}

fn new_session(config: &Config) -> Result<Session> {
    let client = ChatClient::from_config(config)?;
    tracing::info!(endpoint = client.endpoint(), timeout_secs = config.timeout_secs, "chat client ready");
    Ok(Session::new(Arc::new(client)))
}

async fn ask(config: &Config, message: &str, format: OutputFormat) -> Result<()> {
    let mut session = new_session(config)?;

    if !session.run_turn(message).await {
        return Err(anyhow!("Nothing to send: the message is empty"));
    }

    match format {
        OutputFormat::Text => print!("{}", render_text(session.transcript())),
        OutputFormat::Html => print!("{}", render_html(session.transcript())),
    }
    Ok(())
}

/// Plain terminal rendering used by `ask`
fn render_text(transcript: &Transcript) -> String {
    let mut out = String::new();
    for entry in transcript.entries() {
        if let Entry::Message(message) = entry {
            out.push_str(&format!(
                "{} {}: {}\n",
                message.sender.avatar(),
                message.sender.label(),
                terminal_safe(&message.text)
            ));
            if let Some(badge) = &message.tool {
                out.push_str(&format!("   {} {}\n", badge.icon, terminal_safe(&badge.label())));
            }
        }
    }
    out
}

async fn run_tui(config: &Config) -> Result<()> {
    let session = new_session(config)?;
    let mut app = App::new(session, &config.endpoint);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            tokio::select! {
                Some(event) = events.next() => handler::handle_event(&mut app, event)?,
                Some(completion) = app.session.next_completion() => app.on_completion(completion),
                else => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
