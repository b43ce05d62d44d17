use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Query parameter carrying a shared trivia id.
pub const TRIVIA_PARAM: &str = "trivia";

static SHARE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<page>.*/citizens-voice)/trivia/(?P<id>[^/]+)/?$")
        .expect("SHARE_PATH is a valid regex pattern")
});

/// Turns shared trivia links into trivia ids and builds them.
///
/// Two shapes are understood: `?trivia={id}` on any page and the share path
/// `/citizens-voice/trivia/{id}`. A consumed link is scrubbed from the
/// address so resolving it again does nothing. Malformed ids are ignored
/// without touching the address.
#[derive(Clone, Debug)]
pub struct DeepLinkResolver {
    site_origin: String,
}

impl DeepLinkResolver {
    pub fn new(site_origin: &str) -> Self {
        Self {
            site_origin: site_origin.trim_end_matches('/').to_string(),
        }
    }

    pub fn share_url(&self, trivia_id: i64) -> String {
        format!("{}/citizens-voice/trivia/{}", self.site_origin, trivia_id)
    }

    /// Positive decimal ids only.
    pub fn parse_id(raw: &str) -> Option<i64> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse::<i64>().ok().filter(|id| *id > 0)
    }

    pub fn resolve(&self, location: &mut Url) -> Option<i64> {
        let param = location
            .query_pairs()
            .find(|(key, _)| key == TRIVIA_PARAM)
            .map(|(_, value)| value.into_owned());

        if let Some(raw) = param {
            let Some(id) = Self::parse_id(&raw) else {
                log::debug!("Ignoring malformed trivia link parameter '{}'", raw);
                return None;
            };
            remove_query_param(location, TRIVIA_PARAM);
            return Some(id);
        }

        let (page, raw) = {
            let caps = SHARE_PATH.captures(location.path())?;
            (caps["page"].to_string(), caps["id"].to_string())
        };
        let Some(id) = Self::parse_id(&raw) else {
            log::debug!("Ignoring malformed trivia share path '{}'", location.path());
            return None;
        };
        location.set_path(&page);
        Some(id)
    }
}

fn remove_query_param(location: &mut Url, name: &str) {
    let kept: Vec<(String, String)> = location
        .query_pairs()
        .filter(|(key, _)| key != name)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        location.set_query(None);
    } else {
        location.query_pairs_mut().clear().extend_pairs(kept);
    }
}
