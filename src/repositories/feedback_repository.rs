use async_trait::async_trait;

use crate::{
    client::ApiClient,
    errors::AppResult,
    models::{domain::FeedbackLinks, dto::request::FeedbackSubmission},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn links(&self) -> AppResult<FeedbackLinks>;
    async fn submit(&self, submission: FeedbackSubmission) -> AppResult<()>;
}

pub struct HttpFeedbackRepository {
    client: ApiClient,
}

impl HttpFeedbackRepository {
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }
}

#[async_trait]
impl FeedbackRepository for HttpFeedbackRepository {
    async fn links(&self) -> AppResult<FeedbackLinks> {
        self.client.get_json("feedback-links", &[]).await
    }

    async fn submit(&self, submission: FeedbackSubmission) -> AppResult<()> {
        self.client.post_empty("feedback", &submission).await
    }
}
