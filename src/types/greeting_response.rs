use serde::{Deserialize, Serialize};

/// Response to a greeting request.
///
/// The backend gets-or-creates a session for the requested context and
/// returns its identifier alongside the greeting text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GreetingResponse {
    /// The greeting to seed the conversation with.
    pub message: String,

    /// The backend-issued session identifier.
    pub session_id: String,
}
