use serde::{Deserialize, Serialize};

use crate::types::ContextType;

/// Response to a session-list request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionListResponse {
    /// The saved sessions, most recently updated first.
    #[serde(default)]
    pub sessions: Vec<SavedSession>,
}

/// A named, persisted conversation as listed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedSession {
    /// Backend row id.
    pub id: i64,

    /// The conversation identifier used for history lookups.
    pub session_id: String,

    /// The user-assigned label.
    pub name: String,

    /// The context the session was created in.
    #[serde(default)]
    pub context_type: Option<ContextType>,

    /// Creation timestamp, when present.
    #[serde(default)]
    pub created_at: Option<String>,

    /// Last-update timestamp, when present.
    #[serde(default)]
    pub updated_at: Option<String>,
}
