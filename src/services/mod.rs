pub mod chat_service;
pub mod deep_link;
pub mod feedback_service;
pub mod poll_results;
pub mod poll_service;
pub mod trivia_service;
pub mod trivia_session;
