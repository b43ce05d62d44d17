use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::dto::response::ErrorBody,
};

/// Thin JSON transport over the REST backend. No timeouts or retries: a
/// failure surfaces immediately and the caller decides whether to retry.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl ApiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("citizens-voice/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let response = self.send(self.http.get(&url).query(query)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let response = self.send(self.http.post(&url).json(body)).await?;
        Ok(response.json().await?)
    }

    /// POST where the response body carries nothing the caller needs.
    pub async fn post_empty<B>(&self, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        log::debug!("POST {}", url);
        self.send(self.http.post(&url).json(body)).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message);
        Err(status_error(status, message))
    }
}

/// Maps a non-success status to the error taxonomy.
pub fn status_error(status: StatusCode, message: Option<String>) -> AppError {
    let message = message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });

    match status {
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::BAD_REQUEST
        | StatusCode::FORBIDDEN
        | StatusCode::CONFLICT
        | StatusCode::UNPROCESSABLE_ENTITY => AppError::Conflict(message),
        _ => AppError::Network(format!("{}: {}", status.as_u16(), message)),
    }
}
