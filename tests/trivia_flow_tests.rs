use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{Notify, RwLock};
use url::Url;

use citizens_voice::{
    config::FreeTextPolicy,
    errors::{AppError, AppResult},
    models::domain::{Trivia, TriviaSummary},
    repositories::TriviaRepository,
    services::{
        deep_link::DeepLinkResolver,
        trivia_service::{TriviaService, TriviaView},
        trivia_session::{Outcome, Verdict},
    },
};

struct InMemoryTriviaRepository {
    trivia: Arc<RwLock<HashMap<i64, Trivia>>>,
    gates: Arc<RwLock<HashMap<i64, Arc<Notify>>>>,
}

impl InMemoryTriviaRepository {
    fn new(items: Vec<Trivia>) -> Self {
        Self {
            trivia: Arc::new(RwLock::new(items.into_iter().map(|t| (t.id, t)).collect())),
            gates: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Holds `find_by_id(id)` until the returned handle is notified.
    async fn gate(&self, id: i64) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.write().await.insert(id, gate.clone());
        gate
    }
}

#[async_trait]
impl TriviaRepository for InMemoryTriviaRepository {
    async fn list_trivia(&self) -> AppResult<Vec<TriviaSummary>> {
        let trivia = self.trivia.read().await;
        let mut items: Vec<_> = trivia
            .values()
            .map(|t| TriviaSummary {
                id: t.id,
                title: t.title.clone(),
                description: t.description.clone(),
                image: t.image.clone(),
                question_count: Some(t.questions.len()),
                questions: None,
            })
            .collect();
        items.sort_by_key(|t| t.id);
        Ok(items)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Trivia> {
        let gate = self.gates.read().await.get(&id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let trivia = self.trivia.read().await;
        trivia
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Trivia with id '{}' not found", id)))
    }
}

fn trivia(id: i64, correct: &[usize]) -> Trivia {
    let questions: Vec<_> = correct
        .iter()
        .enumerate()
        .map(|(q, correct_index)| {
            let q = q as i64 + 1;
            json!({
                "id": q,
                "question_text": format!("Question {}", q),
                "options": (0..3).map(|o| json!({
                    "id": q * 10 + o as i64,
                    "text": format!("Option {}", o),
                    "is_correct": o == *correct_index,
                })).collect::<Vec<_>>(),
            })
        })
        .collect();

    serde_json::from_value(json!({
        "id": id,
        "title": format!("Trivia {}", id),
        "description": null,
        "image": null,
        "questions": questions,
    }))
    .expect("fixture should deserialize")
}

fn service(repo: Arc<InMemoryTriviaRepository>) -> TriviaService {
    TriviaService::new(
        repo,
        DeepLinkResolver::new("https://voice.example.org"),
        FreeTextPolicy::Excluded,
    )
}

#[tokio::test]
async fn shared_link_play_through_scores_and_resets() {
    // correct options at indices 0, 1, 0 -> ids 10, 21, 30
    let repo = Arc::new(InMemoryTriviaRepository::new(vec![trivia(7, &[0, 1, 0])]));
    let service = service(repo);
    let mut location = Url::parse("https://voice.example.org/citizens-voice?trivia=7").unwrap();

    assert_eq!(service.open_from_link(&mut location).await.unwrap(), Some(7));
    assert_eq!(location.query(), None);

    let summary = service
        .with_session(|s| -> AppResult<_> {
            s.select_option(10)?;
            s.next();
            s.select_option(20)?;
            s.next();
            s.select_option(30)?;
            s.finish()
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(summary.score, 2);
    assert_eq!(
        summary.outcomes,
        vec![Outcome::Correct, Outcome::Incorrect, Outcome::Correct]
    );
    assert_eq!(summary.verdict, Verdict::GoodEffort);

    service.with_session(|s| s.reset()).await.unwrap();
    let (index, outcomes, showing) = service
        .with_session(|s| (s.index(), s.outcomes().to_vec(), s.showing_results()))
        .await
        .unwrap();
    assert_eq!(index, 0);
    assert_eq!(outcomes, vec![Outcome::Unanswered; 3]);
    assert!(!showing);
}

#[tokio::test]
async fn repeated_selection_never_overwrites_slot() {
    let repo = Arc::new(InMemoryTriviaRepository::new(vec![trivia(7, &[0, 1, 0])]));
    let service = service(repo);
    service.open(7).await.unwrap();

    let results = service
        .with_session(|s| {
            let first = s.select_option(11);
            let second = s.select_option(10);
            s.go_to(2);
            s.go_to(0);
            let third = s.select_option(12);
            (first, second, third, s.outcome(0), s.selected_option())
        })
        .await
        .unwrap();

    assert_eq!(results.0, Ok(Outcome::Incorrect));
    assert!(results.1.is_err());
    assert!(results.2.is_err());
    assert_eq!(results.3, Some(Outcome::Incorrect));
    assert_eq!(results.4, Some(11));
}

#[tokio::test]
async fn late_response_for_abandoned_open_is_discarded() {
    let repo = Arc::new(InMemoryTriviaRepository::new(vec![
        trivia(1, &[0]),
        trivia(2, &[1, 1]),
    ]));
    let gate = repo.gate(1).await;
    let service = service(repo);

    let first = service.open(1);
    let second = async {
        let opened = service.open(2).await;
        gate.notify_one();
        opened
    };
    let (first, second) = tokio::join!(first, second);

    assert_eq!(first, Ok(false));
    assert_eq!(second, Ok(true));
    assert_eq!(service.active_id().await, Some(2));
    let count = service.with_session(|s| s.question_count()).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn close_while_loading_discards_response() {
    let repo = Arc::new(InMemoryTriviaRepository::new(vec![trivia(1, &[0])]));
    let gate = repo.gate(1).await;
    let service = service(repo);

    let open = service.open(1);
    let close = async {
        service.close().await;
        gate.notify_one();
    };
    let (opened, _) = tokio::join!(open, close);

    assert_eq!(opened, Ok(false));
    assert_eq!(service.view().await, TriviaView::Closed);
}

#[tokio::test]
async fn missing_trivia_can_be_retried() {
    let repo = Arc::new(InMemoryTriviaRepository::new(vec![trivia(1, &[0])]));
    let service = service(repo.clone());

    assert!(matches!(service.open(9).await, Err(AppError::NotFound(_))));
    assert!(matches!(service.view().await, TriviaView::Failed { trivia_id: 9, .. }));

    repo.trivia.write().await.insert(9, trivia(9, &[2]));
    assert_eq!(service.open(9).await, Ok(true));
    assert_eq!(service.active_id().await, Some(9));
}

#[tokio::test]
async fn malformed_link_is_silent() {
    let repo = Arc::new(InMemoryTriviaRepository::new(vec![trivia(1, &[0])]));
    let service = service(repo);

    for raw in [
        "https://voice.example.org/citizens-voice?trivia=abc",
        "https://voice.example.org/citizens-voice/trivia/abc",
        "https://voice.example.org/citizens-voice?trivia=",
    ] {
        let mut location = Url::parse(raw).unwrap();
        assert_eq!(service.open_from_link(&mut location).await, Ok(None));
    }
    assert_eq!(service.view().await, TriviaView::Closed);
}

#[tokio::test]
async fn listing_reports_question_counts() {
    let repo = Arc::new(InMemoryTriviaRepository::new(vec![
        trivia(1, &[0]),
        trivia(2, &[1, 1]),
    ]));
    let service = service(repo);

    let listing = service.list().await.unwrap();

    assert_eq!(listing.len(), 2);
    assert_eq!(listing[1].total_questions(), 2);
    assert_eq!(
        service.share_url(listing[0].id),
        "https://voice.example.org/citizens-voice/trivia/1"
    );
}
