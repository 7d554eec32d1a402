use serde::{Deserialize, Serialize};

use crate::types::{ContextType, SessionId};

/// Body of a save-session request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveSessionRequest {
    /// The session to persist.
    pub session_id: SessionId,

    /// The user-assigned label.
    pub name: String,

    /// The conversational context.
    pub context_type: ContextType,
}

impl SaveSessionRequest {
    /// Creates a new request.
    pub fn new(session_id: SessionId, name: impl Into<String>, context_type: ContextType) -> Self {
        Self {
            session_id,
            name: name.into(),
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
        let request =
            SaveSessionRequest::new(SessionId::new("sess_1"), "面试准备", ContextType::General);

        assert_eq!(
            to_value(&request).unwrap(),
            json!({
                "session_id": "sess_1",
                "name": "面试准备",
                "context_type": "general"
            })
        );
    }
}
