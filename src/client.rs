use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::CredentialProvider;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    ContextType, FeedbackRequest, GreetingResponse, HistoryEntry, HistoryResponse, MessageRequest,
    MessageResponse, SaveSessionRequest, SavedSession, SessionId, SessionListResponse,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// Timeout for greeting/history/list reads.
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for message sends, which wait on model inference.
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the chat client.
///
/// There is no ambient configuration; everything the client needs is
/// injected here at construction.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend API, e.g. `http://localhost:8000/api`.
    pub base_url: String,

    /// Timeout for read calls (greeting, history, session list).
    pub read_timeout: Duration,

    /// Timeout for message sends.
    pub send_timeout: Duration,
}

impl ApiConfig {
    /// Creates a configuration for the given base URL with default
    /// timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Sets the read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the send timeout.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Client for the chat backend.
///
/// Wraps the HTTP calls the chat surfaces make and maps transport and
/// HTTP failures into [`Error`]. Credentials come from the injected
/// [`CredentialProvider`] capability on every request.
#[derive(Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    base_url: Url,
    read_timeout: Duration,
    send_timeout: Duration,
    credentials: Arc<dyn CredentialProvider>,
}

impl ChatClient {
    /// Creates a new client.
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base_url = Url::parse(&base_url)?;
        let client = ReqwestClient::builder().build().map_err(|e| {
            Error::http_client(format!("Failed to build HTTP client: {}", e), Some(Box::new(e)))
        })?;

        Ok(Self {
            client,
            base_url,
            read_timeout: config.read_timeout,
            send_timeout: config.send_timeout,
            credentials,
        })
    }

    /// Returns true when the credential capability currently holds a
    /// token. Chat sessions use this to decide between remote bootstrap
    /// and a local temporary session.
    pub fn has_credentials(&self) -> bool {
        self.credentials.token().is_some()
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the greeting for a context, creating or resuming the
    /// backend session for it.
    pub async fn greeting(&self, context_type: ContextType) -> Result<GreetingResponse> {
        let url = self.endpoint("chat/greeting")?;
        let builder = self
            .client
            .get(url)
            .query(&[("context_type", context_type.as_str())]);
        self.execute(builder, self.read_timeout).await
    }

    /// Fetches the stored history for a session, oldest first.
    pub async fn history(&self, session_id: &SessionId) -> Result<Vec<HistoryEntry>> {
        let url = self.endpoint(&format!("chat/history/{session_id}"))?;
        let response: HistoryResponse = self.execute(self.client.get(url), self.read_timeout).await?;
        Ok(response.history)
    }

    /// Sends a user message and returns the raw reply.
    pub async fn send_message(&self, request: &MessageRequest) -> Result<MessageResponse> {
        let url = self.endpoint("chat/message")?;
        self.execute(self.client.post(url).json(request), self.send_timeout)
            .await
    }

    /// Lists saved sessions for a context. An absent `sessions` field is
    /// an empty list, not an error.
    pub async fn sessions(&self, context_type: ContextType) -> Result<Vec<SavedSession>> {
        let url = self.endpoint("chat/sessions")?;
        let builder = self
            .client
            .get(url)
            .query(&[("context_type", context_type.as_str())]);
        let response: SessionListResponse = self.execute(builder, self.read_timeout).await?;
        Ok(response.sessions)
    }

    /// Persists a session under a user-assigned name.
    pub async fn save_session(&self, request: &SaveSessionRequest) -> Result<()> {
        let url = self.endpoint("chat/save-session")?;
        let _ack: serde_json::Value = self
            .execute(self.client.post(url).json(request), self.read_timeout)
            .await?;
        Ok(())
    }

    /// Submits user feedback.
    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<()> {
        let url = self.endpoint("chat/feedback")?;
        let _ack: serde_json::Value = self
            .execute(self.client.post(url).json(request), self.read_timeout)
            .await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Error::from)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let token = self
            .credentials
            .token()
            .ok_or_else(|| Error::authentication("no bearer token available"))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::authentication("bearer token contains invalid characters"))?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<T> {
        let headers = self.default_headers()?;

        CLIENT_REQUESTS.click();
        let response = builder
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                map_transport_error(e, timeout)
            })?;

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        response.json::<T>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // The backend reports errors as `{"detail": "..."}`.
        #[derive(Deserialize)]
        struct ErrorBody {
            detail: Option<String>,
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail);

        match status_code {
            401 => Error::authentication(
                detail.unwrap_or_else(|| "bearer token rejected".to_string()),
            ),
            408 => Error::timeout(
                detail.unwrap_or_else(|| "request timed out".to_string()),
                None,
            ),
            _ => Error::api(status_code, detail, format!("HTTP status {status_code}")),
        }
    }
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url.as_str())
            .field("read_timeout", &self.read_timeout)
            .field("send_timeout", &self.send_timeout)
            .finish()
    }
}

fn map_transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::timeout(
            format!("Request timed out: {}", err),
            Some(timeout.as_secs_f64()),
        )
    } else if err.is_connect() {
        Error::connection(format!("Connection error: {}", err), Some(Box::new(err)))
    } else {
        Error::http_client(format!("Request failed: {}", err), Some(Box::new(err)))
    }
}
