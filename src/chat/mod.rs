//! Chat surfaces built on the client library.
//!
//! Two conversational surfaces share the same bootstrap, normalization,
//! and send flow:
//!
//! - the full-page chat panel, with session save/list/load
//! - the floating widget, a minimizable window with its own session
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and per-surface configuration
//! - [`session`]: session bootstrap, message store, and send flow
//! - [`widget`]: the floating window state machine
//! - [`commands`]: slash command parsing for the REPL

mod commands;
mod config;
mod session;
mod widget;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{
    ChatArgs, ChatConfig, PAGE_REPLY_MERGE_THRESHOLD, WIDGET_REPLY_MERGE_THRESHOLD,
};
pub use session::{ChatSession, SessionPhase};
pub use widget::{ChatWidget, Position, Size, Viewport, WIDGET_MARGIN, WidgetState};
