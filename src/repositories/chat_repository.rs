use async_trait::async_trait;

use crate::{
    client::ApiClient,
    errors::AppResult,
    models::{domain::ChatReply, dto::request::ChatRequest},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn send(&self, request: ChatRequest) -> AppResult<ChatReply>;
}

pub struct HttpChatRepository {
    client: ApiClient,
}

impl HttpChatRepository {
    pub fn new(client: &ApiClient) -> Self {
        Self { client: client.clone() }
    }
}

#[async_trait]
impl ChatRepository for HttpChatRepository {
    async fn send(&self, request: ChatRequest) -> AppResult<ChatReply> {
        self.client.post_json("chat", &request).await
    }
}
