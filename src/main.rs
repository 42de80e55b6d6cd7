//! Terminal front-end for the diagnostic companion

use crossterm::style::{Color, Stylize};
use diagnostic_companion::agent::ColorRole;
use diagnostic_companion::api::{ChatBackend, HttpBackend, LoggingBackend, Message};
use diagnostic_companion::config::CompanionConfig;
use diagnostic_companion::runtime::ConversationRuntime;
use diagnostic_companion::state_machine::{ConversationState, DEFAULT_CONVERSATION_ID};
use diagnostic_companion::view::{author_label, display_config, visible_messages, ViewOptions};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Describe your symptoms and the companion will guide you through questions and test recommendations.
Commands: /clear (new session)  /reasoning (toggle reasoning)  /retry (dismiss error)
          /reload (fetch server copy)  /stream <text>  /quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Message(String),
    Stream(String),
    Clear,
    ToggleReasoning,
    Retry,
    Reload,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return Command::Message(line.to_string());
        };
        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        match name {
            "clear" | "new" => Command::Clear,
            "reasoning" => Command::ToggleReasoning,
            "retry" | "dismiss" => Command::Retry,
            "reload" => Command::Reload,
            "stream" => Command::Stream(rest.trim().to_string()),
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

fn terminal_color(role: ColorRole) -> Color {
    match role {
        ColorRole::Purple => Color::Magenta,
        ColorRole::Orange => Color::DarkYellow,
        ColorRole::Blue => Color::Blue,
        ColorRole::Green => Color::Green,
        ColorRole::Indigo => Color::DarkBlue,
        ColorRole::Red => Color::Red,
        ColorRole::Emerald => Color::DarkGreen,
    }
}

fn render_message(message: &Message) {
    let label = author_label(message);
    let color = if message.is_user() {
        Color::Cyan
    } else {
        terminal_color(display_config(message).color)
    };
    println!("{}", label.with(color).bold());
    println!("{}\n", message.content);
}

fn render(state: &ConversationState, view: ViewOptions) {
    println!("{}", "─".repeat(60).dark_grey());
    for message in visible_messages(&state.messages, view) {
        render_message(message);
    }
    if let Some(error) = &state.error {
        println!("{} {error} (type /retry)", "Error:".red().bold());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diagnostic_companion=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CompanionConfig::from_env();
    let base_url = config.base_url()?;
    tracing::info!(url = %base_url, conv_id = %config.conversation_id, "Starting companion");

    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(base_url)?);
    let runtime = ConversationRuntime::new(LoggingBackend::new(backend), config.conversation_id.clone());
    let mut view = ViewOptions {
        show_full_details: config.show_reasoning,
    };

    println!("{}", "AI Companion - Intelligent Medical Support".bold());
    println!("{HELP}");

    if config.conversation_id != DEFAULT_CONVERSATION_ID {
        runtime.reload().await;
        render(&runtime.state(), view);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Unknown(name) => {
                println!("Unknown command /{name}; try /help");
                continue;
            }
            Command::Clear => runtime.clear_conversation().await,
            Command::ToggleReasoning => {
                view.toggle_details();
                let mode = if view.show_full_details { "shown" } else { "hidden" };
                println!("Reasoning {mode}");
            }
            Command::Retry => runtime.dismiss_error(),
            Command::Reload => runtime.reload().await,
            Command::Stream(text) => {
                let mut stdout = std::io::stdout();
                let result = runtime
                    .stream_message(&text, &mut |fragment: &str| {
                        print!("{fragment}");
                        if let Err(e) = stdout.flush() {
                            tracing::debug!(error = %e, "Failed to flush stdout");
                        }
                    })
                    .await;
                println!();
                if let Err(e) = result {
                    println!("{} {e}", "Stream failed:".red().bold());
                }
                continue;
            }
            Command::Message(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                // Input stays disabled until the error is dismissed
                if runtime.state().error.is_some() {
                    println!("Dismiss the error with /retry before sending another message.");
                    continue;
                }
                println!("{}", "Thinking...".dark_grey());
                runtime.submit(&text).await;
            }
        }
        render(&runtime.state(), view);
    }

    Ok(())
}
