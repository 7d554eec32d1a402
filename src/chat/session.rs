//! Core chat session management.
//!
//! This module provides the `ChatSession` struct, which owns one
//! conversation: its identifier, its append-only message store, and the
//! bootstrap/send/persistence flows against the backend.

use crate::chat::config::ChatConfig;
use crate::client::ChatClient;
use crate::error::{Error, Result};
use crate::normalize::{contains_failure_marker, normalize_reply};
use crate::observability::{BOOTSTRAP_FALLBACKS, REPLY_SUBSTITUTIONS, SEND_FAILURES};
use crate::types::{
    HistoryEntry, Message, MessageRequest, MessageRole, SaveSessionRequest, SavedSession,
    SessionId,
};
use crate::utils::time::parse_backend_timestamp;

/// Lifecycle phase of a chat session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Constructed but not yet bootstrapped.
    New,

    /// Bootstrap in progress; input is rejected.
    Initializing,

    /// Bootstrapped and accepting input.
    Ready,
}

/// A chat session bound to one conversational surface.
///
/// The session seeds itself with a greeting on [`initialize`], then
/// alternates user sends and normalized assistant replies in an
/// append-only store. Failures never surface raw: bootstrap failures fall
/// back to a local temporary session, and send failures append a
/// sanitized, error-flagged assistant message.
///
/// [`initialize`]: ChatSession::initialize
pub struct ChatSession {
    client: ChatClient,
    config: ChatConfig,
    session_id: Option<SessionId>,
    messages: Vec<Message>,
    saved_sessions: Vec<SavedSession>,
    phase: SessionPhase,
    sending: bool,
}

impl ChatSession {
    /// Creates a new session over the given client and configuration.
    pub fn new(client: ChatClient, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            session_id: None,
            messages: Vec::new(),
            saved_sessions: Vec::new(),
            phase: SessionPhase::New,
            sending: false,
        }
    }

    /// Bootstraps the session: obtain or fabricate a session identifier
    /// and seed the store with a single greeting message.
    ///
    /// Without credentials this is purely local: a temporary identifier
    /// and the context's fixed greeting. With credentials the backend is
    /// asked for a greeting and prior history; the most recent clean
    /// assistant message wins over the fresh greeting. Any network
    /// failure degrades to the local path. This method never fails and is
    /// a no-op once the session is ready.
    pub async fn initialize(&mut self) {
        if self.phase == SessionPhase::Ready {
            return;
        }
        self.phase = SessionPhase::Initializing;

        if self.client.has_credentials() {
            match self.bootstrap_remote().await {
                Ok(()) => {
                    self.phase = SessionPhase::Ready;
                    return;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "chat bootstrap failed, using local session");
                    BOOTSTRAP_FALLBACKS.click();
                }
            }
        }

        self.bootstrap_local();
        self.phase = SessionPhase::Ready;
    }

    /// Sends a user message and appends the assistant's reply.
    ///
    /// Returns `None` without touching the store when the input is blank,
    /// a send is already in flight, or the session is still initializing.
    /// Otherwise the user message is appended immediately, and the
    /// returned reference is the appended assistant message: the
    /// normalized reply on success, or an error-flagged placeholder with
    /// sanitized text on failure. A failed send never alters the session
    /// identifier.
    pub async fn send(&mut self, input: &str) -> Option<&Message> {
        if input.trim().is_empty() || self.sending || self.phase == SessionPhase::Initializing {
            return None;
        }

        if self.session_id.is_none() {
            self.initialize().await;
        }
        let session_id = match &self.session_id {
            Some(id) => id.clone(),
            None => {
                let id = SessionId::temporary();
                self.session_id = Some(id.clone());
                id
            }
        };

        self.messages.push(Message::user(input));

        let request = MessageRequest::new(input, session_id, self.config.context_type);
        self.sending = true;
        let result = self.client.send_message(&request).await;
        self.sending = false;

        let message = match result {
            Ok(response) => {
                if contains_failure_marker(&response.response) {
                    REPLY_SUBSTITUTIONS.click();
                }
                let content =
                    normalize_reply(&response.response, self.config.reply_merge_threshold);
                if let Some(id) = response.session_id {
                    self.session_id = Some(SessionId::from(id));
                }
                if let Some(intent) = response.intent.as_deref() {
                    tracing::debug!(intent, "reply classified");
                }
                Message::assistant(content)
                    .with_recommendations(response.recommendations)
                    .with_suggested_actions(response.suggested_actions)
            }
            Err(err) => {
                tracing::warn!(error = %err, "message send failed");
                SEND_FAILURES.click();
                Message::failure(err.user_message())
            }
        };

        self.messages.push(message);
        self.messages.last()
    }

    /// Persists the session under a user-assigned name and refreshes the
    /// saved-session list. The list is only refreshed after the backend
    /// confirms; there is no optimistic update.
    pub async fn save(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation(
                "session name must not be empty",
                Some("name".to_string()),
            ));
        }
        let Some(session_id) = self.session_id.clone() else {
            return Err(Error::validation(
                "no active session to save",
                Some("session_id".to_string()),
            ));
        };

        let request = SaveSessionRequest::new(session_id, name, self.config.context_type);
        self.client.save_session(&request).await?;
        self.refresh_sessions().await;
        Ok(())
    }

    /// Refreshes the saved-session list for this context.
    ///
    /// Unauthenticated sessions keep an empty list; refresh failures are
    /// logged and leave the previous list in place.
    pub async fn refresh_sessions(&mut self) -> &[SavedSession] {
        if self.client.has_credentials() {
            match self.client.sessions(self.config.context_type).await {
                Ok(sessions) => self.saved_sessions = sessions,
                Err(err) => {
                    tracing::warn!(error = %err, "failed to refresh saved sessions");
                }
            }
        }
        &self.saved_sessions
    }

    /// Replaces the conversation with the stored history of another
    /// session.
    ///
    /// On success the store is wholesale replaced (never merged) and the
    /// given identifier becomes current. On failure the store and
    /// identifier are left untouched and the error propagates.
    pub async fn load(&mut self, session_id: SessionId) -> Result<()> {
        let history = self.client.history(&session_id).await?;
        self.replace_with_history(session_id, history);
        Ok(())
    }

    fn replace_with_history(&mut self, session_id: SessionId, history: Vec<HistoryEntry>) {
        self.messages = history_to_messages(history, self.config.reply_merge_threshold);
        self.session_id = Some(session_id);
        self.phase = SessionPhase::Ready;
    }

    async fn bootstrap_remote(&mut self) -> Result<()> {
        let greeting = self.client.greeting(self.config.context_type).await?;
        let session_id = SessionId::from(greeting.session_id);
        let history = self.client.history(&session_id).await?;
        let seed = seed_from_history(
            &history,
            &greeting.message,
            self.config.reply_merge_threshold,
        );
        self.session_id = Some(session_id);
        self.messages = vec![seed];
        Ok(())
    }

    fn bootstrap_local(&mut self) {
        self.session_id = Some(SessionId::temporary());
        self.messages = vec![Message::assistant(
            self.config.context_type.default_greeting(),
        )];
    }

    /// The exchanged messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The active session identifier, once bootstrapped.
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The last refreshed saved-session list.
    pub fn saved_sessions(&self) -> &[SavedSession] {
        &self.saved_sessions
    }

    /// The session's lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// True while the bootstrap sequence runs; input is rejected.
    pub fn is_initializing(&self) -> bool {
        self.phase == SessionPhase::Initializing
    }

    /// True while a send is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// The session's configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }
}

/// Picks the seed message for a freshly bootstrapped session.
///
/// The most recent assistant message that carries no failure marker wins,
/// normalized; when none survives the fresh greeting is used instead.
fn seed_from_history(history: &[HistoryEntry], greeting: &str, merge_threshold: usize) -> Message {
    let survivor = history
        .iter()
        .filter(|entry| entry.role == MessageRole::Assistant)
        .filter(|entry| !contains_failure_marker(&entry.content))
        .next_back();

    match survivor {
        Some(entry) => {
            let mut message = Message::assistant(normalize_reply(&entry.content, merge_threshold));
            if let Some(created_at) = entry
                .created_at
                .as_deref()
                .and_then(parse_backend_timestamp)
            {
                message = message.with_timestamp(created_at);
            }
            message
        }
        None => Message::assistant(normalize_reply(greeting, merge_threshold)),
    }
}

/// Converts stored history into display messages.
///
/// Failure-marked entries are dropped regardless of role; assistant
/// content is normalized, user content is kept verbatim.
fn history_to_messages(history: Vec<HistoryEntry>, merge_threshold: usize) -> Vec<Message> {
    history
        .into_iter()
        .filter(|entry| !contains_failure_marker(&entry.content))
        .map(|entry| {
            let content = match entry.role {
                MessageRole::Assistant => normalize_reply(&entry.content, merge_threshold),
                MessageRole::User => entry.content,
            };
            let mut message = Message::new(entry.role, content);
            if let Some(created_at) = entry
                .created_at
                .as_deref()
                .and_then(parse_backend_timestamp)
            {
                message = message.with_timestamp(created_at);
            }
            message
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::auth::MemoryCredentials;
    use crate::client::ApiConfig;
    use crate::error::SESSION_EXPIRED_MESSAGE;
    use crate::types::ContextType;

    fn anonymous_session(context_type: ContextType) -> ChatSession {
        let credentials = Arc::new(MemoryCredentials::anonymous());
        let client = ChatClient::new(ApiConfig::default(), credentials).unwrap();
        ChatSession::new(client, ChatConfig::new().with_context_type(context_type))
    }

    #[tokio::test]
    async fn unauthenticated_bootstrap_uses_default_greeting() {
        for context_type in ContextType::all() {
            let mut session = anonymous_session(context_type);
            assert_eq!(session.phase(), SessionPhase::New);

            session.initialize().await;

            assert_eq!(session.phase(), SessionPhase::Ready);
            assert_eq!(session.message_count(), 1);

            let greeting = &session.messages()[0];
            assert_eq!(greeting.role, MessageRole::Assistant);
            assert_eq!(greeting.content, context_type.default_greeting());
            assert!(!greeting.error);

            let id = session.session_id().unwrap();
            assert!(id.is_temporary());
        }
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let mut session = anonymous_session(ContextType::General);
        session.initialize().await;
        let id = session.session_id().unwrap().clone();

        session.initialize().await;
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.session_id(), Some(&id));
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let mut session = anonymous_session(ContextType::General);
        session.initialize().await;
        let before = session.message_count();

        assert!(session.send("").await.is_none());
        assert!(session.send("   ").await.is_none());
        assert!(session.send("\n\t ").await.is_none());
        assert_eq!(session.message_count(), before);
    }

    #[tokio::test]
    async fn unauthenticated_send_appends_sanitized_failure() {
        let mut session = anonymous_session(ContextType::General);
        session.initialize().await;
        let id = session.session_id().unwrap().clone();

        let reply = session.send("你好").await.unwrap().clone();
        assert!(reply.error);
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.content, SESSION_EXPIRED_MESSAGE);

        // user message appended optimistically, then exactly one failure
        assert_eq!(session.message_count(), 3);
        assert_eq!(session.messages()[1].role, MessageRole::User);
        assert_eq!(session.messages()[1].content, "你好");

        // a failed send never touches the session identifier
        assert_eq!(session.session_id(), Some(&id));
    }

    #[tokio::test]
    async fn send_bootstraps_on_demand() {
        let mut session = anonymous_session(ContextType::Learning);

        session.send("讲讲二叉树").await;

        // greeting seeded first, then the user message and the failure
        assert_eq!(session.message_count(), 3);
        assert_eq!(
            session.messages()[0].content,
            ContextType::Learning.default_greeting()
        );
        assert!(session.session_id().unwrap().is_temporary());
    }

    #[tokio::test]
    async fn unreachable_backend_folds_into_error_message() {
        let credentials = Arc::new(MemoryCredentials::new("tok"));
        let config = ApiConfig::new("http://127.0.0.1:9/api")
            .with_read_timeout(Duration::from_secs(2))
            .with_send_timeout(Duration::from_secs(2));
        let client = ChatClient::new(config, credentials).unwrap();
        let mut session = ChatSession::new(client, ChatConfig::new());

        // bootstrap falls back to a local temporary session, silently
        session.initialize().await;
        assert_eq!(session.message_count(), 1);
        assert!(session.session_id().unwrap().is_temporary());
        assert!(!session.messages()[0].error);

        // the send failure is sanitized, never the raw error text
        let reply = session.send("hi").await.unwrap();
        assert!(reply.error);
        assert!(!reply.content.contains("error"));
        assert!(!reply.content.contains("reqwest"));
    }

    #[tokio::test]
    async fn save_requires_a_name() {
        let mut session = anonymous_session(ContextType::General);
        session.initialize().await;

        let err = session.save("").await.unwrap_err();
        assert!(err.is_validation());
        let err = session.save("   ").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn refresh_sessions_is_empty_without_credentials() {
        let mut session = anonymous_session(ContextType::General);
        assert!(session.refresh_sessions().await.is_empty());
        assert!(session.saved_sessions().is_empty());
    }

    #[test]
    fn seed_prefers_last_clean_assistant_message() {
        let history = vec![
            HistoryEntry::new(MessageRole::Assistant, "生成失败: x"),
            HistoryEntry::new(MessageRole::Assistant, "valid reply"),
        ];
        let seed = seed_from_history(&history, "greeting", 20);
        assert_eq!(seed.content, "valid reply");
    }

    #[test]
    fn seed_falls_back_to_greeting() {
        let failures = vec![
            HistoryEntry::new(MessageRole::Assistant, "Connection error"),
            HistoryEntry::new(MessageRole::User, "还在吗"),
        ];
        let seed = seed_from_history(&failures, "**你好**", 20);
        assert_eq!(seed.content, "你好");

        let seed = seed_from_history(&[], "你好", 20);
        assert_eq!(seed.content, "你好");
    }

    #[test]
    fn history_conversion_filters_and_normalizes() {
        let history = vec![
            HistoryEntry::new(MessageRole::User, "**原样保留**"),
            HistoryEntry::new(MessageRole::Assistant, "生成失败: boom"),
            HistoryEntry::new(MessageRole::Assistant, "**重点**内容"),
        ];

        let messages = history_to_messages(history, 20);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "**原样保留**");
        assert_eq!(messages[1].content, "重点内容");
    }

    #[tokio::test]
    async fn loading_replaces_the_store_wholesale() {
        let mut session = anonymous_session(ContextType::General);
        session.initialize().await;

        let first = vec![
            HistoryEntry::new(MessageRole::User, "x-question"),
            HistoryEntry::new(MessageRole::Assistant, "x-answer"),
        ];
        session.replace_with_history(SessionId::new("sess_x"), first);
        assert_eq!(session.message_count(), 2);

        let second = vec![HistoryEntry::new(MessageRole::Assistant, "y-answer")];
        session.replace_with_history(SessionId::new("sess_y"), second);

        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages()[0].content, "y-answer");
        assert!(session.messages().iter().all(|m| !m.content.contains("x-")));
        assert_eq!(session.session_id().map(SessionId::as_str), Some("sess_y"));
    }
}
