use std::sync::Arc;

use tokio::sync::RwLock;
use url::Url;

use crate::{
    config::FreeTextPolicy,
    errors::{AppError, AppResult},
    models::domain::TriviaSummary,
    repositories::TriviaRepository,
    services::{deep_link::DeepLinkResolver, trivia_session::TriviaSession},
};

/// What the trivia dialog currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriviaView {
    Closed,
    Loading { trivia_id: i64 },
    Failed { trivia_id: i64, error: AppError },
    Ready(TriviaSession),
}

impl TriviaView {
    pub fn trivia_id(&self) -> Option<i64> {
        match self {
            TriviaView::Closed => None,
            TriviaView::Loading { trivia_id } | TriviaView::Failed { trivia_id, .. } => {
                Some(*trivia_id)
            }
            TriviaView::Ready(session) => Some(session.trivia_id()),
        }
    }
}

struct ActiveTrivia {
    /// Bumped on every open and close; a response is only applied if the
    /// ticket it was issued under is still current.
    ticket: u64,
    view: TriviaView,
}

pub struct TriviaService {
    repository: Arc<dyn TriviaRepository>,
    resolver: DeepLinkResolver,
    policy: FreeTextPolicy,
    active: RwLock<ActiveTrivia>,
}

impl TriviaService {
    pub fn new(
        repository: Arc<dyn TriviaRepository>,
        resolver: DeepLinkResolver,
        policy: FreeTextPolicy,
    ) -> Self {
        Self {
            repository,
            resolver,
            policy,
            active: RwLock::new(ActiveTrivia {
                ticket: 0,
                view: TriviaView::Closed,
            }),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<TriviaSummary>> {
        self.repository.list_trivia().await
    }

    pub fn share_url(&self, trivia_id: i64) -> String {
        self.resolver.share_url(trivia_id)
    }

    /// Opens a trivia and starts a fresh play-through.
    ///
    /// Returns `Ok(false)` when another open or a close happened while this
    /// one was loading; its response is then dropped. A failure is kept in
    /// the view as `Failed` and returned.
    pub async fn open(&self, trivia_id: i64) -> AppResult<bool> {
        let ticket = {
            let mut active = self.active.write().await;
            active.ticket += 1;
            active.view = TriviaView::Loading { trivia_id };
            active.ticket
        };
        log::debug!("Opening trivia {} (ticket {})", trivia_id, ticket);

        let fetched = self.repository.find_by_id(trivia_id).await;

        let mut active = self.active.write().await;
        if active.ticket != ticket {
            log::warn!(
                "Discarding stale response for trivia {} (ticket {}, current {})",
                trivia_id,
                ticket,
                active.ticket
            );
            return Ok(false);
        }

        match fetched {
            Ok(trivia) if trivia.id == trivia_id => {
                log::info!(
                    "Opened trivia {} with {} questions",
                    trivia_id,
                    trivia.questions.len()
                );
                active.view = TriviaView::Ready(TriviaSession::new(trivia, self.policy));
                Ok(true)
            }
            Ok(trivia) => {
                let error = AppError::InvalidResponse(format!(
                    "Requested trivia {} but received {}",
                    trivia_id, trivia.id
                ));
                log::warn!("{}", error);
                active.view = TriviaView::Failed {
                    trivia_id,
                    error: error.clone(),
                };
                Err(error)
            }
            Err(error) => {
                log::warn!("Failed to open trivia {}: {}", trivia_id, error);
                active.view = TriviaView::Failed {
                    trivia_id,
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    /// Resolves a shared link and opens the trivia it names. Returns the
    /// opened id, or `None` when the address carried no usable link.
    pub async fn open_from_link(&self, location: &mut Url) -> AppResult<Option<i64>> {
        let Some(trivia_id) = self.resolver.resolve(location) else {
            return Ok(None);
        };
        let applied = self.open(trivia_id).await?;
        Ok(applied.then_some(trivia_id))
    }

    /// Closes the dialog and destroys the session. Pending opens are
    /// discarded when they land.
    pub async fn close(&self) {
        let mut active = self.active.write().await;
        active.ticket += 1;
        active.view = TriviaView::Closed;
    }

    pub async fn view(&self) -> TriviaView {
        self.active.read().await.view.clone()
    }

    pub async fn active_id(&self) -> Option<i64> {
        self.active.read().await.view.trivia_id()
    }

    /// Runs `f` against the open session.
    pub async fn with_session<R, F>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut TriviaSession) -> R,
    {
        let mut active = self.active.write().await;
        match &mut active.view {
            TriviaView::Ready(session) => Ok(f(session)),
            _ => Err(AppError::ValidationError("No trivia is open".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        repositories::trivia_repository::MockTriviaRepository,
        services::trivia_session::Outcome,
        test_utils::fixtures::*,
    };

    fn service(repo: MockTriviaRepository) -> TriviaService {
        TriviaService::new(
            Arc::new(repo),
            DeepLinkResolver::new("https://voice.example.org"),
            FreeTextPolicy::Excluded,
        )
    }

    #[tokio::test]
    async fn open_initializes_fresh_session() {
        let mut repo = MockTriviaRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(three_question_trivia()));
        let service = service(repo);

        assert!(service.open(1).await.unwrap());

        let TriviaView::Ready(session) = service.view().await else {
            panic!("expected ready view");
        };
        assert_eq!(session.index(), 0);
        assert_eq!(session.outcomes(), &[Outcome::Unanswered; 3]);
    }

    #[tokio::test]
    async fn not_found_is_kept_as_failed_view() {
        let mut repo = MockTriviaRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Trivia with id '{}' not found", id))));
        let service = service(repo);

        let result = service.open(5).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.view().await,
            TriviaView::Failed { trivia_id: 5, error: AppError::NotFound(_) }
        ));
        assert!(service.with_session(|s| s.score()).await.is_err());
    }

    #[tokio::test]
    async fn reopening_discards_previous_progress() {
        let mut repo = MockTriviaRepository::new();
        repo.expect_find_by_id()
            .times(2)
            .returning(|_| Ok(three_question_trivia()));
        let service = service(repo);

        service.open(1).await.unwrap();
        service
            .with_session(|s| s.select_option(101))
            .await
            .unwrap()
            .unwrap();
        service.open(1).await.unwrap();

        let score = service.with_session(|s| s.score()).await.unwrap();
        assert_eq!(score, 0);
    }

    #[tokio::test]
    async fn close_clears_the_session() {
        let mut repo = MockTriviaRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(three_question_trivia()));
        let service = service(repo);

        service.open(1).await.unwrap();
        service.close().await;

        assert_eq!(service.view().await, TriviaView::Closed);
        assert_eq!(service.active_id().await, None);
    }

    #[tokio::test]
    async fn mismatched_response_id_fails_open() {
        let mut repo = MockTriviaRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(three_question_trivia()));
        let service = service(repo);

        let result = service.open(2).await;

        assert!(matches!(result, Err(AppError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn malformed_link_opens_nothing() {
        let mut repo = MockTriviaRepository::new();
        repo.expect_find_by_id().times(0);
        let service = service(repo);
        let mut location =
            Url::parse("https://voice.example.org/citizens-voice?trivia=abc").unwrap();

        assert_eq!(service.open_from_link(&mut location).await.unwrap(), None);
        assert_eq!(service.view().await, TriviaView::Closed);
    }

    #[tokio::test]
    async fn link_goes_through_open() {
        let mut repo = MockTriviaRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(three_question_trivia()));
        let service = service(repo);
        let mut location = Url::parse("https://voice.example.org/citizens-voice/trivia/1").unwrap();

        assert_eq!(service.open_from_link(&mut location).await.unwrap(), Some(1));
        assert_eq!(service.open_from_link(&mut location).await.unwrap(), None);
        assert_eq!(service.active_id().await, Some(1));
    }

    #[test]
    fn share_url_delegates_to_resolver() {
        let service = service(MockTriviaRepository::new());
        assert_eq!(
            service.share_url(3),
            "https://voice.example.org/citizens-voice/trivia/3"
        );
    }
}
