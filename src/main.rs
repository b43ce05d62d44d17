use citizens_voice::{
    app_state::AppState,
    config::Config,
    errors::AppResult,
    services::trivia_service::TriviaView,
};
use url::Url;

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!("Using backend at {}", config.api_base_url);
    let state = AppState::new(config)?;

    let (poll_count, trivia) = futures::try_join!(
        state.poll_service.load_all(),
        state.trivia_service.list()
    )?;
    log::info!(
        "{} polls ({} active, {} featured), {} trivia sets",
        poll_count,
        state.poll_service.active().await.len(),
        state.poll_service.featured().await.len(),
        trivia.len()
    );
    for summary in &trivia {
        log::info!(
            "  [{}] {} ({}) {}",
            summary.id,
            summary.title,
            summary.play_label(),
            state.trivia_service.share_url(summary.id)
        );
    }

    if let Some(link) = std::env::args().nth(1) {
        let mut location = Url::parse(&link)?;
        match state.trivia_service.open_from_link(&mut location).await? {
            Some(id) => {
                if let TriviaView::Ready(session) = state.trivia_service.view().await {
                    log::info!("Opened trivia {}: {}", id, session.trivia().title);
                    if let Some(question) = session.current_question() {
                        log::info!("{}: {}", session.position_label(), question.question_text);
                        for option in &question.options {
                            log::info!("  - {}", option.text);
                        }
                    }
                }
            }
            None => log::info!("No trivia link in {}", link),
        }
        log::info!("Address after resolving: {}", location);
    }

    Ok(())
}
