use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A full trivia set, as returned by the detail endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Trivia {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub questions: Vec<TriviaQuestion>,
}

/// A trivia card on the listing page. Some backends send the nested
/// questions instead of a count.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TriviaSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub question_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<TriviaQuestion>>,
}

impl TriviaSummary {
    pub fn total_questions(&self) -> usize {
        self.question_count
            .or_else(|| self.questions.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    /// Card caption, e.g. "1 question – Play".
    pub fn play_label(&self) -> String {
        let total = self.total_questions();
        let noun = if total == 1 { "question" } else { "questions" };
        format!("{} {} – Play", total, noun)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TriviaQuestion {
    pub id: i64,
    pub question_text: String,
    #[serde(default)]
    pub answer_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<TriviaOption>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TriviaOption {
    pub id: i64,
    pub text: String,
    /// Trusted as sent by the backend.
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice,
    FreeText,
}

impl TriviaQuestion {
    pub fn kind(&self) -> QuestionKind {
        if self.options.is_empty() {
            QuestionKind::FreeText
        } else {
            QuestionKind::MultipleChoice
        }
    }

    /// The free-text answer or explanation, if it has any visible content.
    pub fn answer(&self) -> Option<&str> {
        self.answer_text
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    pub fn option(&self, option_id: i64) -> Option<&TriviaOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn correct_option(&self) -> Option<&TriviaOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}
