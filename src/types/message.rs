use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::Recommendation;

/// One exchanged utterance in a chat view.
///
/// Assistant content has passed through the normalizer before it is stored;
/// user content is kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Who said it.
    pub role: MessageRole,

    /// Display-ready text.
    pub content: String,

    /// When the message was created locally.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,

    /// Suggestion cards attached to the message (assistant only).
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,

    /// One-click follow-up inputs offered with the message (assistant only).
    #[serde(default)]
    pub suggested_actions: Vec<String>,

    /// Marks a failure placeholder rather than real model output.
    #[serde(default)]
    pub error: bool,
}

/// Role type for a message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User role.
    User,

    /// Assistant role.
    Assistant,
}

impl Message {
    /// Create a new `Message` with the given role and content.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_utc(),
            recommendations: Vec::new(),
            suggested_actions: Vec::new(),
            error: false,
        }
    }

    /// Create a new user `Message`.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create a new assistant `Message`.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create an assistant `Message` flagged as a failure placeholder.
    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            error: true,
            ..Self::new(MessageRole::Assistant, content)
        }
    }

    /// Sets the creation timestamp.
    pub fn with_timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attaches suggestion cards.
    pub fn with_recommendations(mut self, recommendations: Vec<Recommendation>) -> Self {
        self.recommendations = recommendations;
        self
    }

    /// Attaches one-click follow-up inputs.
    pub fn with_suggested_actions(mut self, suggested_actions: Vec<String>) -> Self {
        self.suggested_actions = suggested_actions;
        self
    }
}
