use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::AppResult,
    models::{domain::FeedbackLinks, dto::request::FeedbackSubmission},
    repositories::FeedbackRepository,
};

pub const FEEDBACK_THANKS: &str = "Thank you for your feedback! We appreciate your input.";

pub struct FeedbackService {
    repository: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    pub fn new(repository: Arc<dyn FeedbackRepository>) -> Self {
        Self { repository }
    }

    pub async fn links(&self) -> AppResult<FeedbackLinks> {
        self.repository.links().await
    }

    /// Validates the trimmed form and sends it.
    pub async fn submit(&self, form: &FeedbackSubmission) -> AppResult<()> {
        let form = form.trimmed();
        form.validate()?;
        self.repository.submit(form).await?;
        log::info!("Feedback submitted");
        Ok(())
    }
}
