use serde::Serialize;

use crate::{
    config::FreeTextPolicy,
    errors::{AppError, AppResult},
    models::domain::{QuestionKind, Trivia, TriviaOption, TriviaQuestion},
};

/// Per-question result slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Unanswered,
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn is_answered(self) -> bool {
        self != Outcome::Unanswered
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Perfect,
    GoodEffort,
    KeepTrying,
}

impl Verdict {
    fn from_score(score: usize, total: usize) -> Self {
        if score == total {
            Verdict::Perfect
        } else if score * 2 >= total {
            Verdict::GoodEffort
        } else {
            Verdict::KeepTrying
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Verdict::Perfect => "Well done!",
            Verdict::GoodEffort => "Good effort!",
            Verdict::KeepTrying => "Keep trying!",
        }
    }
}

/// What the results view shows at the end of a play-through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TriviaSummaryView {
    pub trivia_id: i64,
    pub score: usize,
    pub total: usize,
    pub outcomes: Vec<Outcome>,
    pub verdict: Verdict,
}

impl TriviaSummaryView {
    pub fn headline(&self) -> String {
        format!("You got {} out of {} correct!", self.score, self.total)
    }
}

/// Feedback for an answered multiple-choice question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerFeedback<'a> {
    pub correct: bool,
    pub selected: &'a TriviaOption,
    /// Only filled in when the pick was wrong, so the view can point at the
    /// right answer.
    pub correct_option: Option<&'a TriviaOption>,
    pub explanation: Option<&'a str>,
}

/// One play-through of one trivia set.
///
/// A question's selection and outcome are written at most once until
/// `reset`. Navigation never touches them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriviaSession {
    trivia: Trivia,
    policy: FreeTextPolicy,
    index: usize,
    selections: Vec<Option<i64>>,
    revealed: Vec<bool>,
    outcomes: Vec<Outcome>,
    showing_results: bool,
}

impl TriviaSession {
    pub fn new(trivia: Trivia, policy: FreeTextPolicy) -> Self {
        let len = trivia.questions.len();
        Self {
            trivia,
            policy,
            index: 0,
            selections: vec![None; len],
            revealed: vec![false; len],
            outcomes: vec![Outcome::Unanswered; len],
            showing_results: false,
        }
    }

    pub fn trivia(&self) -> &Trivia {
        &self.trivia
    }

    pub fn trivia_id(&self) -> i64 {
        self.trivia.id
    }

    pub fn question_count(&self) -> usize {
        self.trivia.questions.len()
    }

    pub fn has_questions(&self) -> bool {
        !self.trivia.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn last_index(&self) -> Option<usize> {
        self.question_count().checked_sub(1)
    }

    pub fn is_last(&self) -> bool {
        self.last_index() == Some(self.index)
    }

    /// "Question 2 of 5"
    pub fn position_label(&self) -> String {
        format!("Question {} of {}", self.index + 1, self.question_count())
    }

    pub fn current_question(&self) -> Option<&TriviaQuestion> {
        self.trivia.questions.get(self.index)
    }

    pub fn selected_option(&self) -> Option<i64> {
        self.selections.get(self.index).copied().flatten()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed.get(self.index).copied().unwrap_or(false)
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        self.outcomes.get(index).copied()
    }

    pub fn showing_results(&self) -> bool {
        self.showing_results
    }

    pub fn score(&self) -> usize {
        self.outcomes.iter().filter(|o| **o == Outcome::Correct).count()
    }

    fn require_question(&self) -> AppResult<&TriviaQuestion> {
        if self.showing_results {
            return Err(AppError::Conflict(
                "This play-through is finished; play again to answer".to_string(),
            ));
        }
        self.current_question()
            .ok_or_else(|| AppError::ValidationError("This trivia has no questions".to_string()))
    }

    /// Locks in an answer for the current multiple-choice question.
    pub fn select_option(&mut self, option_id: i64) -> AppResult<Outcome> {
        let question = self.require_question()?;
        if question.kind() != QuestionKind::MultipleChoice {
            return Err(AppError::ValidationError(
                "Only multiple-choice questions take an option".to_string(),
            ));
        }
        if self.outcomes[self.index].is_answered() {
            return Err(AppError::Conflict("This question has already been answered".to_string()));
        }
        let option = question.option(option_id).ok_or_else(|| {
            AppError::ValidationError(format!("Option {} is not part of this question", option_id))
        })?;

        let outcome = if option.is_correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        self.selections[self.index] = Some(option_id);
        self.outcomes[self.index] = outcome;
        Ok(outcome)
    }

    /// Shows the answer of the current free-text question. Never scored.
    pub fn reveal(&mut self) -> AppResult<()> {
        let question = self.require_question()?;
        if question.kind() != QuestionKind::FreeText {
            return Err(AppError::ValidationError(
                "Only free-text questions can be revealed".to_string(),
            ));
        }
        self.revealed[self.index] = true;
        Ok(())
    }

    pub fn revealed_answer(&self) -> Option<&str> {
        if self.is_revealed() {
            self.current_question().and_then(TriviaQuestion::answer)
        } else {
            None
        }
    }

    pub fn answer_feedback(&self) -> Option<AnswerFeedback<'_>> {
        let question = self.current_question()?;
        let selected = question.option(self.selected_option()?)?;
        let correct = selected.is_correct;
        Some(AnswerFeedback {
            correct,
            selected,
            correct_option: if correct { None } else { question.correct_option() },
            explanation: question.answer(),
        })
    }

    /// Jumps to `index`. Returns false when it is out of bounds.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.question_count() {
            return false;
        }
        self.index = index;
        true
    }

    pub fn next(&mut self) -> bool {
        match self.last_index() {
            Some(last) if self.index < last => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn current_counts_as_answered(&self) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        match question.kind() {
            QuestionKind::MultipleChoice => self.outcomes[self.index].is_answered(),
            QuestionKind::FreeText => {
                self.policy == FreeTextPolicy::RevealCompletes && self.revealed[self.index]
            }
        }
    }

    pub fn can_finish(&self) -> bool {
        !self.showing_results && self.is_last() && self.current_counts_as_answered()
    }

    /// Moves to the results view.
    pub fn finish(&mut self) -> AppResult<TriviaSummaryView> {
        if self.showing_results {
            return Ok(self.summary());
        }
        if !self.can_finish() {
            return Err(AppError::Conflict(
                "Answer the last question before finishing".to_string(),
            ));
        }
        self.showing_results = true;
        Ok(self.summary())
    }

    pub fn summary(&self) -> TriviaSummaryView {
        let score = self.score();
        let total = self.question_count();
        TriviaSummaryView {
            trivia_id: self.trivia.id,
            score,
            total,
            outcomes: self.outcomes.clone(),
            verdict: Verdict::from_score(score, total),
        }
    }

    /// "Play again".
    pub fn reset(&mut self) {
        let len = self.question_count();
        self.index = 0;
        self.selections = vec![None; len];
        self.revealed = vec![false; len];
        self.outcomes = vec![Outcome::Unanswered; len];
        self.showing_results = false;
    }
}
