use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{ChatExchange, ChatReply},
        dto::request::ChatRequest,
    },
    repositories::ChatRepository,
};

#[derive(Clone, Debug, Default)]
struct ChatSession {
    /// Bumped by `clear_history`; replies to requests sent under an older
    /// generation are dropped.
    generation: u64,
    session_id: Option<String>,
    history: Vec<ChatExchange>,
}

/// Chatbot conversation context for the whole app. Created once at start-up
/// and only reset by `clear_history`.
pub struct ChatService {
    repository: Arc<dyn ChatRepository>,
    session: RwLock<ChatSession>,
}

impl ChatService {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self::with_session_id(repository, None)
    }

    /// Resumes a conversation whose id was kept from a previous run.
    pub fn with_session_id(
        repository: Arc<dyn ChatRepository>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            repository,
            session: RwLock::new(ChatSession {
                generation: 0,
                session_id,
                history: Vec::new(),
            }),
        }
    }

    pub async fn session_id(&self) -> Option<String> {
        self.session.read().await.session_id.clone()
    }

    pub async fn history(&self) -> Vec<ChatExchange> {
        self.session.read().await.history.clone()
    }

    /// Sends a question, echoing the current session id. A session id in the
    /// reply replaces the stored one; a reply without one leaves it as is.
    ///
    /// A reply that lands after `clear_history` is discarded and reported as
    /// a `Conflict`.
    pub async fn ask(&self, query: &str) -> AppResult<ChatReply> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::ValidationError("Please enter a question".to_string()));
        }

        let (generation, session_id) = {
            let session = self.session.read().await;
            (session.generation, session.session_id.clone())
        };
        let request = ChatRequest {
            query: query.to_string(),
            session_id,
        };
        let reply = self.repository.send(request).await?;

        let mut session = self.session.write().await;
        if session.generation != generation {
            log::warn!("Discarding chat reply received after the conversation was cleared");
            return Err(AppError::Conflict(
                "The conversation was cleared before the answer arrived".to_string(),
            ));
        }
        if let Some(id) = reply.session_id.as_deref().filter(|id| !id.is_empty()) {
            if session.session_id.as_deref() != Some(id) {
                log::debug!("Chat session id is now {}", id);
                session.session_id = Some(id.to_string());
            }
        }
        session.history.push(ChatExchange {
            query: query.to_string(),
            reply: reply.clone(),
            asked_at: Utc::now(),
        });

        Ok(reply)
    }

    /// Forgets the conversation; the next question starts a new session.
    pub async fn clear_history(&self) {
        let mut session = self.session.write().await;
        *session = ChatSession {
            generation: session.generation + 1,
            ..ChatSession::default()
        };
        log::info!("Chat history cleared");
    }
}
