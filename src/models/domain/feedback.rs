use serde::{Deserialize, Serialize};

/// External form links shown on the engagement cards. Each is optional; an
/// unset link renders as "Link not configured".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeedbackLinks {
    #[serde(default)]
    pub ask_mp_form_url: Option<String>,
    #[serde(default)]
    pub comment_bill_form_url: Option<String>,
    #[serde(default)]
    pub feedback_law_form_url: Option<String>,
}

impl FeedbackLinks {
    pub fn configured(url: &Option<String>) -> Option<&str> {
        url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}
