// Public modules
pub mod context_type;
pub mod feedback_request;
pub mod greeting_response;
pub mod history;
pub mod message;
pub mod message_request;
pub mod message_response;
pub mod recommendation;
pub mod save_session_request;
pub mod saved_session;
pub mod session_id;

// Re-exports
pub use context_type::ContextType;
pub use feedback_request::FeedbackRequest;
pub use greeting_response::GreetingResponse;
pub use history::{HistoryEntry, HistoryResponse};
pub use message::{Message, MessageRole};
pub use message_request::MessageRequest;
pub use message_response::MessageResponse;
pub use recommendation::{Recommendation, RecommendationAction};
pub use save_session_request::SaveSessionRequest;
pub use saved_session::{SavedSession, SessionListResponse};
pub use session_id::SessionId;
