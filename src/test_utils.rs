use crate::models::domain::{Poll, PollOption, PollStatus, Trivia, TriviaOption, TriviaQuestion};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    fn option(id: i64, text: &str, is_correct: bool) -> TriviaOption {
        TriviaOption {
            id,
            text: text.to_string(),
            is_correct,
        }
    }

    /// Three multiple-choice questions; the correct options are 101, 202
    /// and 301.
    pub fn three_question_trivia() -> Trivia {
        Trivia {
            id: 1,
            title: "Parliament basics".to_string(),
            description: Some("How well do you know the House?".to_string()),
            image: None,
            questions: vec![
                TriviaQuestion {
                    id: 1,
                    question_text: "Who presides over sittings of the House?".to_string(),
                    answer_text: Some("The Speaker presides over sittings.".to_string()),
                    options: vec![
                        option(101, "The Speaker", true),
                        option(102, "The Clerk", false),
                    ],
                },
                TriviaQuestion {
                    id: 2,
                    question_text: "What is a hansard?".to_string(),
                    answer_text: None,
                    options: vec![
                        option(201, "A committee report", false),
                        option(202, "The verbatim record of debates", true),
                    ],
                },
                TriviaQuestion {
                    id: 3,
                    question_text: "Which stage comes first for a bill?".to_string(),
                    answer_text: None,
                    options: vec![option(301, "First reading", true), option(302, "Assent", false)],
                },
            ],
        }
    }

    /// One multiple-choice question followed by a free-text one.
    pub fn mixed_trivia() -> Trivia {
        Trivia {
            id: 2,
            title: "Bills".to_string(),
            description: None,
            image: None,
            questions: vec![
                TriviaQuestion {
                    id: 1,
                    question_text: "Who presides over sittings of the House?".to_string(),
                    answer_text: None,
                    options: vec![
                        option(101, "The Speaker", true),
                        option(102, "The Clerk", false),
                    ],
                },
                TriviaQuestion {
                    id: 2,
                    question_text: "How many readings does a bill go through?".to_string(),
                    answer_text: Some("Three".to_string()),
                    options: vec![],
                },
            ],
        }
    }

    pub fn empty_trivia() -> Trivia {
        Trivia {
            id: 3,
            title: "Coming soon".to_string(),
            description: None,
            image: None,
            questions: vec![],
        }
    }

    /// Active poll with options 11 (40 votes) and 12 (60 votes).
    pub fn active_poll(id: i64) -> Poll {
        Poll {
            id,
            title: format!("Poll {}", id),
            description: None,
            category: Some("Governance".to_string()),
            is_active: true,
            featured: false,
            show_results_before_voting: false,
            status: PollStatus::Active,
            status_display: "Active".to_string(),
            start_date: None,
            end_date: None,
            options: vec![
                PollOption {
                    id: 11,
                    text: "A".to_string(),
                    vote_count: 40,
                    vote_percentage: 40.0,
                },
                PollOption {
                    id: 12,
                    text: "B".to_string(),
                    vote_count: 60,
                    vote_percentage: 60.0,
                },
            ],
            total_votes: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::QuestionKind;

    #[test]
    fn test_fixtures_three_question_trivia() {
        let trivia = three_question_trivia();
        assert_eq!(trivia.questions.len(), 3);
        assert!(trivia
            .questions
            .iter()
            .all(|q| q.kind() == QuestionKind::MultipleChoice));
    }

    #[test]
    fn test_fixtures_mixed_trivia() {
        let trivia = mixed_trivia();
        assert_eq!(trivia.questions[1].kind(), QuestionKind::FreeText);
    }

    #[test]
    fn test_fixtures_active_poll() {
        let poll = active_poll(9);
        assert_eq!(poll.id, 9);
        assert_eq!(poll.total_votes, 100);
        assert!(poll.is_active);
    }
}
