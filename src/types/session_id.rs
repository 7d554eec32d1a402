use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Alphabet for temporary-session suffixes.
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Number of random suffix characters in a temporary session id.
const SUFFIX_LEN: usize = 9;

/// Opaque conversation identifier.
///
/// Issued by the backend, or synthesized locally as
/// `temp_<millis>_<suffix>` when no authenticated session can be
/// established. Temporary ids are never persisted server-side; the server
/// may replace one with a real id on the first successful message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a backend-issued identifier.
    pub fn new(id: impl Into<String>) -> Self {
        SessionId(id.into())
    }

    /// Synthesizes a local temporary identifier.
    pub fn temporary() -> Self {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        SessionId(format!("temp_{millis}_{suffix}"))
    }

    /// Returns true for locally synthesized identifiers.
    pub fn is_temporary(&self) -> bool {
        self.0.starts_with("temp_")
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        SessionId(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        SessionId(id.to_string())
    }
}
