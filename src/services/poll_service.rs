use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Poll, PollResults},
    repositories::PollRepository,
    services::poll_results::{merge_results, PollView},
};

/// Marks a poll as having a vote in flight until dropped.
struct InFlight<'a> {
    set: &'a DashSet<i64>,
    poll_id: i64,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a DashSet<i64>, poll_id: i64) -> Option<Self> {
        set.insert(poll_id).then_some(Self { set, poll_id })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.poll_id);
    }
}

/// Poll listing, voting and result reconciliation for one visitor session.
///
/// The voted set lives only as long as this service; it is not synced with
/// the backend and a new session may vote again.
pub struct PollService {
    repository: Arc<dyn PollRepository>,
    page_size: u32,
    max_pages: u32,
    polls: RwLock<Vec<Poll>>,
    voted: DashSet<i64>,
    voting: DashSet<i64>,
    results: DashMap<i64, PollResults>,
}

impl PollService {
    pub fn new(repository: Arc<dyn PollRepository>, page_size: u32, max_pages: u32) -> Self {
        Self {
            repository,
            page_size,
            max_pages,
            polls: RwLock::new(Vec::new()),
            voted: DashSet::new(),
            voting: DashSet::new(),
            results: DashMap::new(),
        }
    }

    /// Walks the paginated listing and replaces the in-memory poll list.
    /// On failure the previous list is kept.
    pub async fn load_all(&self) -> AppResult<usize> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.repository.list_page(page, self.page_size).await?;
            let has_next = batch.has_next();
            all.extend(batch.results);

            if !has_next {
                break;
            }
            if page >= self.max_pages {
                log::warn!(
                    "Stopped poll listing after {} pages; {} polls loaded",
                    page,
                    all.len()
                );
                break;
            }
            page += 1;
        }

        let count = all.len();
        *self.polls.write().await = all;
        log::info!("Loaded {} polls", count);
        Ok(count)
    }

    pub async fn polls(&self) -> Vec<Poll> {
        self.polls.read().await.clone()
    }

    pub async fn poll(&self, poll_id: i64) -> Option<Poll> {
        self.polls
            .read()
            .await
            .iter()
            .find(|p| p.id == poll_id)
            .cloned()
    }

    pub async fn active(&self) -> Vec<Poll> {
        self.polls
            .read()
            .await
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect()
    }

    pub async fn featured(&self) -> Vec<Poll> {
        self.polls
            .read()
            .await
            .iter()
            .filter(|p| p.featured)
            .cloned()
            .collect()
    }

    pub fn has_voted(&self, poll_id: i64) -> bool {
        self.voted.contains(&poll_id)
    }

    pub fn is_voting(&self, poll_id: i64) -> bool {
        self.voting.contains(&poll_id)
    }

    pub fn cached_results(&self, poll_id: i64) -> Option<PollResults> {
        self.results.get(&poll_id).map(|r| r.value().clone())
    }

    /// Casts one vote, then fetches and merges the confirmed tallies.
    ///
    /// Refused locally when the poll is inactive, already voted on in this
    /// session, or has a vote in flight. If the backend rejects the vote the
    /// session is left untouched so the visitor can retry. If the vote is
    /// accepted but the results fetch fails, the vote still counts as cast.
    pub async fn vote(&self, poll_id: i64, option_id: i64) -> AppResult<PollResults> {
        let poll = self
            .poll(poll_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Poll with id '{}' not found", poll_id)))?;
        if !poll.is_active {
            return Err(AppError::Conflict("This poll is not accepting votes".to_string()));
        }
        if poll.option(option_id).is_none() {
            return Err(AppError::ValidationError(format!(
                "Option {} is not part of poll {}",
                option_id, poll_id
            )));
        }

        let _in_flight = InFlight::acquire(&self.voting, poll_id).ok_or_else(|| {
            AppError::Conflict("A vote for this poll is already being submitted".to_string())
        })?;
        if self.has_voted(poll_id) {
            return Err(AppError::Conflict("You have already voted on this poll".to_string()));
        }

        if let Err(err) = self.repository.vote(poll_id, option_id).await {
            log::warn!("Vote on poll {} rejected: {}", poll_id, err);
            return Err(err);
        }
        self.voted.insert(poll_id);
        log::info!("Recorded vote on poll {} for option {}", poll_id, option_id);

        let results = self.repository.results(poll_id).await?;
        self.apply_results(&results).await;
        Ok(results)
    }

    /// Fetches results for display without voting. A cached entry is
    /// returned as is.
    ///
    /// Never replaces an entry written while the fetch was in flight; that
    /// entry comes from a vote and is newer.
    pub async fn load_results(&self, poll_id: i64) -> AppResult<PollResults> {
        if let Some(cached) = self.cached_results(poll_id) {
            return Ok(cached);
        }

        let results = self.repository.results(poll_id).await.map_err(|err| {
            log::warn!("Failed to load results for poll {}: {}", poll_id, err);
            err
        })?;
        let stored = self.results.entry(poll_id).or_insert(results);
        Ok(stored.value().clone())
    }

    async fn apply_results(&self, results: &PollResults) {
        self.results.insert(results.poll_id, results.clone());

        let mut polls = self.polls.write().await;
        if let Some(poll) = polls.iter_mut().find(|p| p.id == results.poll_id) {
            merge_results(poll, results);
        }
    }

    pub async fn view(&self, poll_id: i64) -> Option<PollView> {
        let poll = self.poll(poll_id).await?;
        let cached = self.cached_results(poll_id);
        Some(PollView::build(
            &poll,
            self.has_voted(poll_id),
            self.is_voting(poll_id),
            cached.as_ref(),
        ))
    }

    pub async fn views(&self) -> Vec<PollView> {
        let polls = self.polls().await;
        polls
            .iter()
            .map(|poll| {
                let cached = self.cached_results(poll.id);
                PollView::build(
                    poll,
                    self.has_voted(poll.id),
                    self.is_voting(poll.id),
                    cached.as_ref(),
                )
            })
            .collect()
    }
}
