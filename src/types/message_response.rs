use serde::{Deserialize, Serialize};

use crate::types::Recommendation;

/// Response to a send-message request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    /// Raw assistant reply; callers normalize before display.
    pub response: String,

    /// The session the reply belongs to. The server may upgrade a
    /// temporary session to a persisted one here.
    #[serde(default)]
    pub session_id: Option<String>,

    /// The backend's classified intent for the user's message.
    #[serde(default)]
    pub intent: Option<String>,

    /// Suggestion cards to render with the reply.
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,

    /// One-click follow-up inputs to offer.
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_full_response() {
        let json = json!({
            "response": "好的，我们从二叉树开始。",
            "session_id": "sess_2",
            "intent": "learning",
            "recommendations": [
                {
                    "type": "action",
                    "title": "开始学习任务",
                    "description": "完成专业学习任务，提升知识水平",
                    "action": "navigate",
                    "path": "/tasks"
                }
            ],
            "suggested_actions": ["查看任务", "开始学习"]
        });

        let response: MessageResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.session_id.as_deref(), Some("sess_2"));
        assert_eq!(response.intent.as_deref(), Some("learning"));
        assert_eq!(response.recommendations.len(), 1);
        assert_eq!(response.suggested_actions, vec!["查看任务", "开始学习"]);
    }

    #[test]
    fn optional_fields_default() {
        let json = json!({"response": "你好"});

        let response: MessageResponse = serde_json::from_value(json).unwrap();
        assert!(response.session_id.is_none());
        assert!(response.intent.is_none());
        assert!(response.recommendations.is_empty());
        assert!(response.suggested_actions.is_empty());
    }
}
