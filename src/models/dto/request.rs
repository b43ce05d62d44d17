use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct VoteRequest {
    pub option_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct FeedbackSubmission {
    #[validate(length(min = 1, max = 200, message = "Please enter your name"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 5000, message = "Please enter a message"))]
    pub message: String,
}

impl FeedbackSubmission {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    /// Copy with surrounding whitespace removed, so that a field holding only
    /// spaces fails the length check.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}
