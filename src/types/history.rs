use serde::{Deserialize, Serialize};

use crate::types::MessageRole;

/// Response to a history request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryResponse {
    /// The stored messages, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// One stored message as returned by the backend.
///
/// Content is raw model output; it has not passed through the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// Who said it.
    pub role: MessageRole,

    /// Raw stored text.
    pub content: String,

    /// Backend timestamp, when present.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl HistoryEntry {
    /// Creates a new entry.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_history() {
        let json = json!({
            "history": [
                {"role": "user", "content": "讲讲二叉树", "created_at": "2025-11-03T09:15:00"},
                {"role": "assistant", "content": "好的。", "created_at": "2025-11-03T09:15:02"}
            ]
        });

        let response: HistoryResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.history.len(), 2);
        assert_eq!(response.history[0].role, MessageRole::User);
        assert_eq!(response.history[1].content, "好的。");
    }

    #[test]
    fn missing_history_defaults_to_empty() {
        let response: HistoryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.history.is_empty());
    }
}
