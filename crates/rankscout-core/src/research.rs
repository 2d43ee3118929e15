//! Shared research domain enums.
//!
//! These map one-to-one onto the `query_type` / `status` text columns in the
//! store; `as_str` values are the canonical wire and column spellings.

use serde::{Deserialize, Serialize};

/// The kind of research a caller requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    KeywordDiscovery,
    SerpAnalysis,
    CompetitorResearch,
}

impl QueryType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QueryType::KeywordDiscovery => "keyword_discovery",
            QueryType::SerpAnalysis => "serp_analysis",
            QueryType::CompetitorResearch => "competitor_research",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "keyword_discovery" => Some(QueryType::KeywordDiscovery),
            "serp_analysis" => Some(QueryType::SerpAnalysis),
            "competitor_research" => Some(QueryType::CompetitorResearch),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a query or of one of its provider tasks.
///
/// `Completed` and `Failed` are terminal; a failed query is never resumed,
/// the caller starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl QueryStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QueryStatus::Pending => "pending",
            QueryStatus::InProgress => "in_progress",
            QueryStatus::Completed => "completed",
            QueryStatus::Failed => "failed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(QueryStatus::Pending),
            "in_progress" => Some(QueryStatus::InProgress),
            "completed" => Some(QueryStatus::Completed),
            "failed" => Some(QueryStatus::Failed),
            _ => None,
        }
    }

    /// `true` for `Completed` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, QueryStatus::Completed | QueryStatus::Failed)
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much work a workflow should do. `Deep` additionally runs the
/// AI summarization stage and persists an insight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchDepth {
    #[default]
    Standard,
    Deep,
}

impl ResearchDepth {
    #[must_use]
    pub fn wants_summary(self) -> bool {
        matches!(self, ResearchDepth::Deep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_type_round_trips_through_str() {
        for t in [
            QueryType::KeywordDiscovery,
            QueryType::SerpAnalysis,
            QueryType::CompetitorResearch,
        ] {
            assert_eq!(QueryType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for s in [
            QueryStatus::Pending,
            QueryStatus::InProgress,
            QueryStatus::Completed,
            QueryStatus::Failed,
        ] {
            assert_eq!(QueryStatus::parse(s.as_str()), Some(s));
        }
    }

    #[test]
    fn unknown_status_is_none() {
        assert_eq!(QueryStatus::parse("queued"), None);
    }

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(!QueryStatus::Pending.is_terminal());
        assert!(!QueryStatus::InProgress.is_terminal());
        assert!(QueryStatus::Completed.is_terminal());
        assert!(QueryStatus::Failed.is_terminal());
    }

    #[test]
    fn deep_depth_wants_summary() {
        assert!(ResearchDepth::Deep.wants_summary());
        assert!(!ResearchDepth::Standard.wants_summary());
    }
}
