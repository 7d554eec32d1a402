//! Configuration types for the chat surfaces.
//!
//! This module provides CLI argument parsing via `arrrg` and the
//! per-surface configuration that controls chat behavior.

use arrrg_derive::CommandLine;

use crate::types::ContextType;

/// Reply-merge threshold used by the full-page chat surface.
pub const PAGE_REPLY_MERGE_THRESHOLD: usize = 20;

/// Reply-merge threshold used by the floating widget, which shows less
/// text per message and merges more aggressively.
pub const WIDGET_REPLY_MERGE_THRESHOLD: usize = 50;

/// Command-line arguments for the xiaomian-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Backend base URL.
    #[arrrg(optional, "Backend API base URL (default: http://localhost:8000/api)", "URL")]
    pub base_url: Option<String>,

    /// Conversational context to chat in.
    #[arrrg(optional, "Context: general, learning, or personalized", "CONTEXT")]
    pub context: Option<String>,

    /// Bearer token for the backend.
    #[arrrg(optional, "Bearer token (default: XIAOMIAN_TOKEN env)", "TOKEN")]
    pub token: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The conversational context the session runs in.
    pub context_type: ContextType,

    /// First paragraphs shorter than this many characters are merged with
    /// the next one when normalizing replies.
    pub reply_merge_threshold: usize,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates the configuration for a full-page chat surface.
    ///
    /// Defaults:
    /// - Context: general
    /// - Reply merge threshold: 20
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            context_type: ContextType::General,
            reply_merge_threshold: PAGE_REPLY_MERGE_THRESHOLD,
            use_color: true,
        }
    }

    /// Creates the configuration for the floating widget surface.
    pub fn for_widget() -> Self {
        Self {
            reply_merge_threshold: WIDGET_REPLY_MERGE_THRESHOLD,
            ..Self::new()
        }
    }

    /// Sets the conversational context.
    pub fn with_context_type(mut self, context_type: ContextType) -> Self {
        self.context_type = context_type;
        self
    }

    /// Sets the reply merge threshold.
    pub fn with_reply_merge_threshold(mut self, threshold: usize) -> Self {
        self.reply_merge_threshold = threshold;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&ChatArgs> for ChatConfig {
    fn from(args: &ChatArgs) -> Self {
        let context_type = args
            .context
            .as_deref()
            .and_then(|s| s.parse::<ContextType>().ok())
            .unwrap_or_default();

        ChatConfig {
            context_type,
            use_color: !args.no_color,
            ..ChatConfig::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.context_type, ContextType::General);
        assert_eq!(config.reply_merge_threshold, PAGE_REPLY_MERGE_THRESHOLD);
        assert!(config.use_color);
    }

    #[test]
    fn widget_config_merges_more() {
        let config = ChatConfig::for_widget();
        assert_eq!(config.reply_merge_threshold, WIDGET_REPLY_MERGE_THRESHOLD);
        assert_eq!(config.context_type, ContextType::General);
    }

    #[test]
    fn config_from_args() {
        let args = ChatArgs {
            base_url: None,
            context: Some("learning".to_string()),
            token: None,
            no_color: true,
        };
        let config = ChatConfig::from(&args);
        assert_eq!(config.context_type, ContextType::Learning);
        assert!(!config.use_color);
    }

    #[test]
    fn unknown_context_falls_back_to_general() {
        let args = ChatArgs {
            context: Some("quiz".to_string()),
            ..ChatArgs::default()
        };
        let config = ChatConfig::from(&args);
        assert_eq!(config.context_type, ContextType::General);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_context_type(ContextType::Personalized)
            .with_reply_merge_threshold(32)
            .without_color();

        assert_eq!(config.context_type, ContextType::Personalized);
        assert_eq!(config.reply_merge_threshold, 32);
        assert!(!config.use_color);
    }
}
