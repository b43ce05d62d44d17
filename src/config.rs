use std::env;

use secrecy::SecretString;
use url::Url;

use crate::errors::{AppError, AppResult};

/// How free-text ("reveal answer") questions take part in completing a trivia.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FreeTextPolicy {
    /// Free-text questions never count as answered. A trivia ending in one
    /// cannot reach the results view.
    #[default]
    Excluded,
    /// Revealing the answer of the last question enables `finish`.
    /// Free-text questions are still never scored.
    RevealCompletes,
}

impl FreeTextPolicy {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "excluded" => Some(Self::Excluded),
            "reveal" | "reveal_completes" => Some(Self::RevealCompletes),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub site_origin: String,
    pub api_token: Option<SecretString>,
    pub poll_page_size: u32,
    pub max_poll_pages: u32,
    pub free_text_policy: FreeTextPolicy,
    /// Chatbot session to resume instead of starting a new one.
    pub chat_session_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            site_origin: env::var("SITE_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            api_token: env::var("API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            poll_page_size: env::var("POLL_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(100),
            max_poll_pages: env::var("MAX_POLL_PAGES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(50),
            free_text_policy: env::var("FREE_TEXT_COMPLETION")
                .ok()
                .and_then(|p| FreeTextPolicy::parse(&p))
                .unwrap_or_default(),
            chat_session_id: env::var("CHAT_SESSION_ID")
                .ok()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }

    /// Checks the values that would otherwise only fail on the first request.
    pub fn validate(&self) -> AppResult<()> {
        for (name, value) in [
            ("API_BASE_URL", &self.api_base_url),
            ("SITE_ORIGIN", &self.site_origin),
        ] {
            let url = Url::parse(value).map_err(|e| {
                AppError::ValidationError(format!("{} is not a valid URL: {}", name, e))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(AppError::ValidationError(format!(
                    "{} must use http or https, got '{}'",
                    name,
                    url.scheme()
                )));
            }
        }

        if self.poll_page_size == 0 {
            return Err(AppError::ValidationError(
                "POLL_PAGE_SIZE must be greater than zero".to_string(),
            ));
        }

        if self.max_poll_pages == 0 {
            return Err(AppError::ValidationError(
                "MAX_POLL_PAGES must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            site_origin: "https://voice.example.org".to_string(),
            api_token: None,
            poll_page_size: 2,
            max_poll_pages: 10,
            free_text_policy: FreeTextPolicy::Excluded,
            chat_session_id: None,
        }
    }
}
