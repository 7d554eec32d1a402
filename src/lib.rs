// Public modules
pub mod auth;
pub mod chat;
pub mod client;
pub mod error;
pub mod normalize;
pub mod observability;
pub mod types;
pub mod utils;

// Re-exports
pub use auth::{CredentialProvider, MemoryCredentials};
pub use client::{ApiConfig, ChatClient};
pub use error::{Error, Result};
pub use types::*;
