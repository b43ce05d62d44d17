use async_trait::async_trait;

use crate::{
    client::ApiClient,
    errors::{AppError, AppResult},
    models::domain::{Trivia, TriviaSummary},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriviaRepository: Send + Sync {
    async fn list_trivia(&self) -> AppResult<Vec<TriviaSummary>>;
    async fn find_by_id(&self, id: i64) -> AppResult<Trivia>;
}

pub struct HttpTriviaRepository {
    client: ApiClient,
}

impl HttpTriviaRepository {
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }
}

#[async_trait]
impl TriviaRepository for HttpTriviaRepository {
    async fn list_trivia(&self) -> AppResult<Vec<TriviaSummary>> {
        self.client.get_json("trivia", &[]).await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Trivia> {
        self.client
            .get_json(&format!("trivia/{}", id), &[])
            .await
            .map_err(|err| match err {
                AppError::NotFound(_) => {
                    AppError::NotFound(format!("Trivia with id '{}' not found", id))
                }
                other => other,
            })
    }
}
