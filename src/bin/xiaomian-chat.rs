//! Interactive chat against the interview-prep backend.
//!
//! This binary drives the full-page chat flow from a terminal: bootstrap,
//! send/reply, and session save/list/load.
//!
//! # Usage
//!
//! ```bash
//! # Anonymous local session with the default backend URL
//! xiaomian-chat
//!
//! # Authenticated against a specific backend
//! xiaomian-chat --base-url https://api.example.com/api --token $TOKEN
//!
//! # Pick a context
//! xiaomian-chat --context learning
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/sessions` - List saved sessions for this context
//! - `/save <name>` - Save the current session
//! - `/load <id>` - Load a saved session
//! - `/feedback <text>` - Send feedback
//! - `/logout` - Forget the bearer token
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use xiaomian::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, help_text, parse_command,
};
use xiaomian::types::{FeedbackRequest, Message, MessageRole, SessionId};
use xiaomian::{ApiConfig, ChatClient, CredentialProvider, MemoryCredentials};

/// ANSI escape code for dim text (status and hints).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for red text (failure placeholders).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Main entry point for the xiaomian-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let (args, _) = ChatArgs::from_command_line_relaxed("xiaomian-chat [OPTIONS]");
    let config = ChatConfig::from(&args);
    let use_color = config.use_color;

    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("XIAOMIAN_TOKEN").ok());
    let credentials = Arc::new(match token {
        Some(token) => MemoryCredentials::new(token),
        None => MemoryCredentials::anonymous(),
    });

    let api_config = match args.base_url.clone() {
        Some(base_url) => ApiConfig::new(base_url),
        None => ApiConfig::default(),
    };
    let client = ChatClient::new(api_config, credentials.clone())?;
    let feedback_client = client.clone();
    let mut session = ChatSession::new(client, config);

    println!("Xiaomian Chat ({} context)", session.config().context_type);
    println!("Type /help for commands, /quit to exit\n");

    print_hint("初始化中，请稍候...", use_color);
    session.initialize().await;
    for message in session.messages() {
        print_message(message, use_color);
    }

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("再见！");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Sessions => {
                            session.refresh_sessions().await;
                            print_sessions(&session);
                        }
                        ChatCommand::Save(name) => match session.save(&name).await {
                            Ok(()) => println!("会话已保存"),
                            Err(err) => {
                                tracing::warn!(error = %err, "session save failed");
                                println!("保存失败，请重试");
                            }
                        },
                        ChatCommand::Load(id) => {
                            match session.load(SessionId::from(id)).await {
                                Ok(()) => {
                                    for message in session.messages() {
                                        print_message(message, use_color);
                                    }
                                }
                                Err(err) => {
                                    tracing::warn!(error = %err, "session load failed");
                                    println!("加载会话失败，请重试");
                                }
                            }
                        }
                        ChatCommand::Feedback(text) => {
                            let request = FeedbackRequest::new("general", text);
                            match feedback_client.submit_feedback(&request).await {
                                Ok(()) => println!("反馈已收到，感谢您的建议！"),
                                Err(err) => {
                                    tracing::warn!(error = %err, "feedback failed");
                                    println!("{}", err.user_message());
                                }
                            }
                        }
                        ChatCommand::Logout => {
                            credentials.clear();
                            print_hint("已退出登录，继续使用临时会话", use_color);
                        }
                        ChatCommand::Invalid(message) => {
                            println!("{}", message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the backend
                if let Some(reply) = session.send(line).await {
                    print_message(reply, use_color);
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\n再见！");
                break;
            }
            Err(err) => {
                eprintln!("Input error: {}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_message(message: &Message, use_color: bool) {
    let speaker = match message.role {
        MessageRole::User => "You",
        MessageRole::Assistant => "小面",
    };

    if message.error && use_color {
        println!("{speaker}: {ANSI_RED}{}{ANSI_RESET}", message.content);
    } else {
        println!("{speaker}: {}", message.content);
    }

    for recommendation in &message.recommendations {
        println!(
            "    [{}] {}",
            recommendation.title, recommendation.description
        );
        if let Some(follow_up) = recommendation.follow_up_input() {
            print_hint(&format!("    试试输入：{follow_up}"), use_color);
        }
    }
    if !message.suggested_actions.is_empty() {
        print_hint(
            &format!("    建议：{}", message.suggested_actions.join(" / ")),
            use_color,
        );
    }
}

fn print_sessions(session: &ChatSession) {
    let saved = session.saved_sessions();
    if saved.is_empty() {
        println!("暂无保存的会话");
        return;
    }
    println!("已保存的会话:");
    for entry in saved {
        match entry.updated_at.as_deref() {
            Some(updated_at) => {
                println!("    {}  {}  ({})", entry.session_id, entry.name, updated_at)
            }
            None => println!("    {}  {}", entry.session_id, entry.name),
        }
    }
}

fn print_hint(hint: &str, use_color: bool) {
    if use_color {
        println!("{ANSI_DIM}{hint}{ANSI_RESET}");
    } else {
        println!("{hint}");
    }
}
