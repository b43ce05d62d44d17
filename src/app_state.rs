use std::sync::Arc;

use crate::{
    client::ApiClient,
    config::Config,
    errors::AppResult,
    repositories::{
        HttpChatRepository, HttpFeedbackRepository, HttpPollRepository, HttpTriviaRepository,
    },
    services::{
        chat_service::ChatService, deep_link::DeepLinkResolver, feedback_service::FeedbackService,
        poll_service::PollService, trivia_service::TriviaService,
    },
};

/// Everything one visitor session owns. Dropping it drops the voted set,
/// the results cache, the open trivia and the chat context.
#[derive(Clone)]
pub struct AppState {
    pub trivia_service: Arc<TriviaService>,
    pub poll_service: Arc<PollService>,
    pub chat_service: Arc<ChatService>,
    pub feedback_service: Arc<FeedbackService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;
        let client = ApiClient::new(&config)?;

        let trivia_repository = Arc::new(HttpTriviaRepository::new(&client));
        let trivia_service = Arc::new(TriviaService::new(
            trivia_repository,
            DeepLinkResolver::new(&config.site_origin),
            config.free_text_policy,
        ));

        let poll_repository = Arc::new(HttpPollRepository::new(&client));
        let poll_service = Arc::new(PollService::new(
            poll_repository,
            config.poll_page_size,
            config.max_poll_pages,
        ));

        let chat_service = Arc::new(ChatService::with_session_id(
            Arc::new(HttpChatRepository::new(&client)),
            config.chat_session_id.clone(),
        ));
        let feedback_service = Arc::new(FeedbackService::new(Arc::new(
            HttpFeedbackRepository::new(&client),
        )));

        Ok(Self {
            trivia_service,
            poll_service,
            chat_service,
            feedback_service,
            config: Arc::new(config),
        })
    }
}
