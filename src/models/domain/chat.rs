use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chatbot answer. A missing `session_id` means the backend kept no
/// conversational state for this turn.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatReply {
    pub answer: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub document_url: Option<String>,
    #[serde(default)]
    pub document_name: Option<String>,
}

impl ChatReply {
    /// The cited source, when the backend sent a link for it.
    pub fn source(&self) -> Option<(&str, &str)> {
        let url = self.document_url.as_deref().filter(|u| !u.is_empty())?;
        let name = self.document_name.as_deref().unwrap_or(url);
        Some((name, url))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatExchange {
    pub query: String,
    pub reply: ChatReply,
    pub asked_at: DateTime<Utc>,
}
