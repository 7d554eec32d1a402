use serde::{Deserialize, Serialize};

use crate::types::{ContextType, SessionId};

/// Body of a send-message request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageRequest {
    /// The user's input, verbatim.
    pub message: String,

    /// The session this message belongs to.
    pub session_id: SessionId,

    /// The conversational context.
    pub context_type: ContextType,
}

impl MessageRequest {
    /// Creates a new request.
    pub fn new(
        message: impl Into<String>,
        session_id: SessionId,
        context_type: ContextType,
    ) -> Self {
        Self {
            message: message.into(),
            session_id,
            context_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn serialize_request() {
        let request = MessageRequest::new(
            "讲讲二叉树",
            SessionId::new("sess_1"),
            ContextType::Learning,
        );

        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "message": "讲讲二叉树",
                "session_id": "sess_1",
                "context_type": "learning"
            })
        );
    }
}
