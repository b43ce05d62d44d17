pub mod chat_repository;
pub mod feedback_repository;
pub mod poll_repository;
pub mod trivia_repository;

pub use chat_repository::{ChatRepository, HttpChatRepository};
pub use feedback_repository::{FeedbackRepository, HttpFeedbackRepository};
pub use poll_repository::{HttpPollRepository, PollRepository};
pub use trivia_repository::{HttpTriviaRepository, TriviaRepository};
