use serde::Serialize;

use crate::models::domain::{Poll, PollResults};

/// Whether counts and percentages are visible for a poll.
pub fn show_results(poll: &Poll, has_voted: bool) -> bool {
    has_voted || poll.show_results_before_voting || poll.is_closed()
}

/// Folds server tallies into the poll. Options missing from `results` keep
/// their previous snapshot.
pub fn merge_results(poll: &mut Poll, results: &PollResults) {
    for option in poll.options.iter_mut() {
        if let Some(result) = results.for_option(option.id) {
            option.vote_count = result.vote_count;
            option.vote_percentage = result.percentage;
        }
    }
    poll.total_votes = results.total_votes;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionView {
    pub id: i64,
    pub text: String,
    /// `None` while results are hidden.
    pub vote_count: Option<u64>,
    pub percentage: Option<f64>,
    /// Marks the options confirmed by fresh results after voting.
    pub highlighted: bool,
}

/// Render-ready projection of one poll card.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollView {
    pub poll_id: i64,
    pub title: String,
    pub has_voted: bool,
    pub is_voting: bool,
    pub show_results: bool,
    pub can_vote: bool,
    pub can_load_results: bool,
    pub results_loaded: bool,
    pub total_votes: Option<u64>,
    pub options: Vec<OptionView>,
}

impl PollView {
    /// Cached results take precedence over the listing snapshot.
    pub fn build(
        poll: &Poll,
        has_voted: bool,
        is_voting: bool,
        cached: Option<&PollResults>,
    ) -> Self {
        let visible = show_results(poll, has_voted);
        let options = poll
            .options
            .iter()
            .map(|option| {
                let result = cached.and_then(|r| r.for_option(option.id));
                let vote_count = result.map(|r| r.vote_count).unwrap_or(option.vote_count);
                let percentage = result.map(|r| r.percentage).unwrap_or(option.vote_percentage);
                OptionView {
                    id: option.id,
                    text: option.text.clone(),
                    vote_count: visible.then_some(vote_count),
                    percentage: visible.then_some(percentage),
                    highlighted: has_voted && result.is_some(),
                }
            })
            .collect();

        Self {
            poll_id: poll.id,
            title: poll.title.clone(),
            has_voted,
            is_voting,
            show_results: visible,
            can_vote: poll.is_active && !has_voted && !is_voting,
            can_load_results: poll.is_active
                && !has_voted
                && poll.total_votes > 0
                && cached.is_none(),
            results_loaded: cached.is_some(),
            total_votes: visible
                .then_some(cached.map(|r| r.total_votes).unwrap_or(poll.total_votes)),
            options,
        }
    }

    pub fn thank_you(&self) -> Option<&'static str> {
        self.has_voted.then_some("Thank you for your vote!")
    }
}
