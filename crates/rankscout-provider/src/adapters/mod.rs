//! Per-domain adapters for the provider's endpoint families.
//!
//! Each adapter builds the provider-specific payload for one kind of task
//! and normalizes that endpoint's result items. [`TaskKind`] tags every
//! submission with its originating adapter so result lookup dispatches to
//! exactly one endpoint instead of probing them all.

pub mod keywords;
pub mod labs;
pub mod serp;

use serde::{Deserialize, Serialize};

/// Default location code when a request does not specify one (United States).
pub const DEFAULT_LOCATION_CODE: u32 = 2840;

/// Default language code when a request does not specify one.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

/// The endpoint family a task was submitted to.
///
/// Recorded at submission time and stored with the task, so `task_get`
/// dispatch is an exhaustive match on the kind rather than a sequential
/// probe of every known endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    SerpOrganic,
    SerpLocalPack,
    KeywordVolume,
    KeywordIdeas,
    RankedKeywords,
}

impl TaskKind {
    /// The endpoint prefix for this kind; `task_post`, `tasks_ready`, and
    /// `task_get/{id}` are appended by the client.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            TaskKind::SerpOrganic => "serp/google/organic",
            TaskKind::SerpLocalPack => "serp/google/maps",
            TaskKind::KeywordVolume => "keywords_data/google_ads/search_volume",
            TaskKind::KeywordIdeas => "dataforseo_labs/google/keyword_ideas",
            TaskKind::RankedKeywords => "dataforseo_labs/google/ranked_keywords",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::SerpOrganic => "serp_organic",
            TaskKind::SerpLocalPack => "serp_local_pack",
            TaskKind::KeywordVolume => "keyword_volume",
            TaskKind::KeywordIdeas => "keyword_ideas",
            TaskKind::RankedKeywords => "ranked_keywords",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "serp_organic" => Some(TaskKind::SerpOrganic),
            "serp_local_pack" => Some(TaskKind::SerpLocalPack),
            "keyword_volume" => Some(TaskKind::KeywordVolume),
            "keyword_ideas" => Some(TaskKind::KeywordIdeas),
            "ranked_keywords" => Some(TaskKind::RankedKeywords),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_str() {
        for kind in [
            TaskKind::SerpOrganic,
            TaskKind::SerpLocalPack,
            TaskKind::KeywordVolume,
            TaskKind::KeywordIdeas,
            TaskKind::RankedKeywords,
        ] {
            assert_eq!(TaskKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn endpoints_are_distinct() {
        let kinds = [
            TaskKind::SerpOrganic,
            TaskKind::SerpLocalPack,
            TaskKind::KeywordVolume,
            TaskKind::KeywordIdeas,
            TaskKind::RankedKeywords,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a.endpoint(), b.endpoint());
            }
        }
    }
}
