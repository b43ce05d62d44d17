use serde::{Deserialize, Deserializer};

pub mod chat;
pub mod feedback;
pub mod poll;
pub mod trivia;

pub use chat::{ChatExchange, ChatReply};
pub use feedback::FeedbackLinks;
pub use poll::{OptionResult, Poll, PollOption, PollResults, PollStatus};
pub use trivia::{QuestionKind, Trivia, TriviaOption, TriviaQuestion, TriviaSummary};

/// The backend sends `null` for empty collections on some endpoints.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
