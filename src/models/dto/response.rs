use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::domain::{null_as_default, OptionResult, PollResults};

/// One page of a paginated listing. `next` is null on the last page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Poll results as they come off the wire. Entries are kept untyped until
/// `validate` so one bad entry does not fail the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct PollResultsResponse {
    #[serde(default)]
    pub poll_id: Option<i64>,
    pub total_votes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Value>,
}

impl PollResultsResponse {
    /// Converts into `PollResults`, logging and dropping malformed entries.
    pub fn validate(self, poll_id: i64) -> PollResults {
        if let Some(reported) = self.poll_id {
            if reported != poll_id {
                log::warn!(
                    "Results response for poll {} reports poll id {}",
                    poll_id,
                    reported
                );
            }
        }

        let results = self
            .results
            .into_iter()
            .filter_map(|entry| match OptionResult::deserialize(&entry) {
                Ok(result)
                    if result.percentage.is_finite()
                        && (0.0..=100.0).contains(&result.percentage) =>
                {
                    Some(result)
                }
                Ok(result) => {
                    log::warn!(
                        "Dropping result for option {} of poll {}: percentage {} out of range",
                        result.option_id,
                        poll_id,
                        result.percentage
                    );
                    None
                }
                Err(err) => {
                    log::warn!(
                        "Dropping malformed result entry for poll {}: {} ({})",
                        poll_id,
                        entry,
                        err
                    );
                    None
                }
            })
            .collect();

        PollResults {
            poll_id,
            total_votes: self.total_votes,
            results,
        }
    }
}

/// Error payloads the backend uses for rejected requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.detail.or(self.error).or(self.message)
    }
}
