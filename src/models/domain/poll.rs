use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Poll {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub show_results_before_voting: bool,
    #[serde(default)]
    pub status: PollStatus,
    /// Human label for `status`, e.g. "Closed".
    #[serde(default)]
    pub status_display: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub total_votes: u64,
}

/// Counts are the snapshot from the last fetch or merge. The percentage is
/// never recomputed locally.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PollOption {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub vote_percentage: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Draft,
    Active,
    Closed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Poll {
    pub fn is_closed(&self) -> bool {
        self.status == PollStatus::Closed
    }

    pub fn option(&self, option_id: i64) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Aggregate tallies for one poll, already validated at the network boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollResults {
    pub poll_id: i64,
    pub total_votes: u64,
    pub results: Vec<OptionResult>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct OptionResult {
    pub option_id: i64,
    pub vote_count: u64,
    pub percentage: f64,
}

impl PollResults {
    pub fn for_option(&self, option_id: i64) -> Option<&OptionResult> {
        self.results.iter().find(|r| r.option_id == option_id)
    }
}
