//! SERP adapter: organic and local-pack task payloads, plus the pure
//! classification helpers used downstream (local intent, content type,
//! keyword difficulty proxy).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{DEFAULT_LANGUAGE_CODE, DEFAULT_LOCATION_CODE};

/// A SERP task request in domain terms.
#[derive(Debug, Clone)]
pub struct SerpTaskRequest {
    pub keyword: String,
    pub location_code: Option<u32>,
    pub language_code: Option<String>,
    pub depth: Option<u32>,
}

impl SerpTaskRequest {
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            location_code: None,
            language_code: None,
            depth: None,
        }
    }
}

/// Build the provider payload for an organic SERP task.
#[must_use]
pub fn organic_payload(request: &SerpTaskRequest) -> Value {
    json!({
        "keyword": request.keyword,
        "location_code": request.location_code.unwrap_or(DEFAULT_LOCATION_CODE),
        "language_code": request
            .language_code
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE_CODE),
        "depth": request.depth.unwrap_or(20),
    })
}

/// Build the provider payload for a local-pack (maps) task.
///
/// Submitted in addition to the organic task when
/// [`is_local_intent`] fires for the keyword.
#[must_use]
pub fn local_pack_payload(request: &SerpTaskRequest) -> Value {
    json!({
        "keyword": request.keyword,
        "location_code": request.location_code.unwrap_or(DEFAULT_LOCATION_CODE),
        "language_code": request
            .language_code
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE_CODE),
    })
}

/// One organic result item, normalized from the provider's result array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganicItem {
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
}

/// Locality cues. A keyword containing any of these is treated as having
/// local intent and additionally gets a local-pack task.
const LOCAL_CUES: &[&str] = &[
    "near me",
    "nearby",
    "closest",
    "hours",
    "directions",
    "open now",
    "in my area",
    "restaurant",
    "dentist",
    "plumber",
    "electrician",
    "salon",
    "barber",
    "gym",
    "cafe",
    "pharmacy",
    "clinic",
    "lawyer",
    "locksmith",
    "repair shop",
];

/// `true` if the keyword contains any fixed locality cue.
#[must_use]
pub fn is_local_intent(keyword: &str) -> bool {
    let lower = keyword.to_lowercase();
    LOCAL_CUES.iter().any(|cue| lower.contains(cue))
}

/// Content bucket for one organic result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Video,
    Image,
    Product,
    HowTo,
    List,
    Article,
}

impl ContentType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Image => "image",
            ContentType::Product => "product",
            ContentType::HowTo => "howto",
            ContentType::List => "list",
            ContentType::Article => "article",
        }
    }
}

/// Per-bucket keyword sets, checked in order. The first bucket with a
/// matching cue wins; anything unmatched is an article.
const CONTENT_RULES: &[(ContentType, &[&str])] = &[
    (ContentType::Video, &["video", "watch", "youtube", "webinar"]),
    (
        ContentType::Image,
        &["image", "photo", "picture", "infographic", "gallery"],
    ),
    (
        ContentType::Product,
        &["buy", "price", "shop", "sale", "deal", "order", "discount"],
    ),
    (
        ContentType::HowTo,
        &["how to", "guide", "tutorial", "step by step", "diy"],
    ),
    (
        ContentType::List,
        &["best", "top 10", "top ten", "list of", "ranked", "compared"],
    ),
];

/// Bucket an organic result by substring matching on title + description.
#[must_use]
pub fn classify_content(title: &str, description: &str) -> ContentType {
    let haystack = format!("{} {}", title.to_lowercase(), description.to_lowercase());
    for (bucket, cues) in CONTENT_RULES {
        if cues.iter().any(|cue| haystack.contains(cue)) {
            return *bucket;
        }
    }
    ContentType::Article
}

/// Domains whose presence on a SERP signals strong competition.
const HIGH_AUTHORITY_DOMAINS: &[&str] = &[
    "wikipedia.org",
    "youtube.com",
    "amazon.com",
    "facebook.com",
    "reddit.com",
    "pinterest.com",
    "linkedin.com",
    "instagram.com",
    "quora.com",
    "nytimes.com",
];

/// Keyword difficulty proxy over a page of organic results.
///
/// Starts at 0; each item adds +15 for a high-authority domain, +10 for a
/// `.gov`/`.edu` domain, and +5 when its URL path depth is at most 1
/// (root-level pages rank on strength, not luck). Clamped to `[0, 100]`.
#[must_use]
pub fn difficulty_proxy(items: &[OrganicItem]) -> u32 {
    let mut score: u32 = 0;
    for item in items {
        let domain = item.domain.to_lowercase();
        if HIGH_AUTHORITY_DOMAINS
            .iter()
            .any(|d| domain == *d || domain.ends_with(&format!(".{d}")))
        {
            score += 15;
        }
        if domain.ends_with(".gov") || domain.ends_with(".edu") {
            score += 10;
        }
        if url_path_depth(&item.url) <= 1 {
            score += 5;
        }
    }
    score.min(100)
}

/// Number of non-empty path segments after the host.
fn url_path_depth(url: &str) -> usize {
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = after_scheme.split_once('/').map_or("", |(_, rest)| rest);
    let path = path
        .split_once('?')
        .map_or(path, |(before, _)| before)
        .trim_end_matches('/');
    path.split('/').filter(|s| !s.is_empty()).count()
}
