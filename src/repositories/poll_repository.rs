use async_trait::async_trait;

use crate::{
    client::ApiClient,
    errors::{AppError, AppResult},
    models::{
        domain::{Poll, PollResults},
        dto::{
            request::VoteRequest,
            response::{Page, PollResultsResponse},
        },
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Fetches one page (1-based) of the poll listing.
    async fn list_page(&self, page: u32, page_size: u32) -> AppResult<Page<Poll>>;
    async fn vote(&self, poll_id: i64, option_id: i64) -> AppResult<()>;
    async fn results(&self, poll_id: i64) -> AppResult<PollResults>;
}

pub struct HttpPollRepository {
    client: ApiClient,
}

impl HttpPollRepository {
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }
}

#[async_trait]
impl PollRepository for HttpPollRepository {
    async fn list_page(&self, page: u32, page_size: u32) -> AppResult<Page<Poll>> {
        self.client
            .get_json(
                "polls",
                &[("page", page.to_string()), ("page_size", page_size.to_string())],
            )
            .await
    }

    async fn vote(&self, poll_id: i64, option_id: i64) -> AppResult<()> {
        self.client
            .post_empty(&format!("polls/{}/vote", poll_id), &VoteRequest { option_id })
            .await
    }

    async fn results(&self, poll_id: i64) -> AppResult<PollResults> {
        let raw: PollResultsResponse = self
            .client
            .get_json(&format!("polls/{}/results", poll_id), &[])
            .await
            .map_err(|err| match err {
                AppError::NotFound(_) => {
                    AppError::NotFound(format!("Poll with id '{}' not found", poll_id))
                }
                other => other,
            })?;
        Ok(raw.validate(poll_id))
    }
}
