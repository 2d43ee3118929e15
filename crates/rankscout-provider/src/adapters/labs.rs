//! Labs adapter: keyword-ideas and ranked-keywords task payloads for the
//! provider's analytics endpoints, plus their normalized result items.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{DEFAULT_LANGUAGE_CODE, DEFAULT_LOCATION_CODE};

/// Request for keyword ideas derived from a set of seed keywords.
#[derive(Debug, Clone)]
pub struct KeywordIdeasRequest {
    pub seed_keywords: Vec<String>,
    pub limit: Option<u32>,
    pub location_code: Option<u32>,
    pub language_code: Option<String>,
}

impl KeywordIdeasRequest {
    #[must_use]
    pub fn new(seed_keywords: Vec<String>) -> Self {
        Self {
            seed_keywords,
            limit: None,
            location_code: None,
            language_code: None,
        }
    }
}

/// Build the provider payload for a keyword-ideas task.
#[must_use]
pub fn keyword_ideas_payload(request: &KeywordIdeasRequest) -> Value {
    json!({
        "keywords": request.seed_keywords,
        "limit": request.limit.unwrap_or(100),
        "location_code": request.location_code.unwrap_or(DEFAULT_LOCATION_CODE),
        "language_code": request
            .language_code
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE_CODE),
        "include_serp_info": false,
    })
}

/// Request for the keywords a domain ranks for.
#[derive(Debug, Clone)]
pub struct RankedKeywordsRequest {
    pub target: String,
    pub limit: Option<u32>,
    pub location_code: Option<u32>,
    pub language_code: Option<String>,
}

impl RankedKeywordsRequest {
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            limit: None,
            location_code: None,
            language_code: None,
        }
    }
}

/// Build the provider payload for a ranked-keywords task.
#[must_use]
pub fn ranked_keywords_payload(request: &RankedKeywordsRequest) -> Value {
    json!({
        "target": request.target,
        "limit": request.limit.unwrap_or(500),
        "location_code": request.location_code.unwrap_or(DEFAULT_LOCATION_CODE),
        "language_code": request
            .language_code
            .as_deref()
            .unwrap_or(DEFAULT_LANGUAGE_CODE),
    })
}

/// One keyword idea, normalized from the keyword-ideas result array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordIdeaItem {
    pub keyword: String,
    #[serde(default)]
    pub search_volume: i64,
    /// Provider competition bucket: `LOW`, `MEDIUM`, or `HIGH`.
    #[serde(default)]
    pub competition: Option<String>,
    /// Provider intent label: `transactional`, `commercial`,
    /// `informational`, or `navigational`.
    #[serde(default)]
    pub search_intent: Option<String>,
}

/// One ranked keyword for a domain, normalized from the ranked-keywords
/// result array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedKeywordItem {
    pub keyword: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub search_volume: i64,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ideas_payload_defaults_limit_and_locale() {
        let payload = keyword_ideas_payload(&KeywordIdeasRequest::new(vec![
            "running shoes".to_owned()
        ]));
        assert_eq!(payload["limit"], 100);
        assert_eq!(payload["location_code"], 2840);
        assert_eq!(payload["language_code"], "en");
    }

    #[test]
    fn ranked_payload_carries_target() {
        let mut request = RankedKeywordsRequest::new("competitor.com");
        request.limit = Some(50);
        let payload = ranked_keywords_payload(&request);
        assert_eq!(payload["target"], "competitor.com");
        assert_eq!(payload["limit"], 50);
    }

    #[test]
    fn ranked_item_tolerates_missing_optionals() {
        let raw = serde_json::json!({ "keyword": "trail shoes", "position": 7 });
        let item: RankedKeywordItem = serde_json::from_value(raw).expect("should deserialize");
        assert_eq!(item.position, 7);
        assert_eq!(item.search_volume, 0);
        assert!(item.url.is_none());
    }
}
