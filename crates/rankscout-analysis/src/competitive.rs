//! Competitive strength labelling and keyword gap classification.

use serde::{Deserialize, Serialize};

/// Overall competitive strength of a domain, from its estimated traffic,
/// average ranking position, and ranked-keyword count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StrengthLabel::VeryStrong => "Very Strong",
            StrengthLabel::Strong => "Strong",
            StrengthLabel::Moderate => "Moderate",
            StrengthLabel::Weak => "Weak",
        };
        f.write_str(s)
    }
}

/// Label a domain's competitive strength, most-specific tier first.
///
/// Very Strong requires traffic above 100k, average position under 15, and
/// more than 1000 ranked keywords; each lower tier relaxes all three
/// thresholds, falling through to Weak.
#[must_use]
pub fn strength_label(traffic: i64, avg_position: f64, keyword_count: usize) -> StrengthLabel {
    if traffic > 100_000 && avg_position < 15.0 && keyword_count > 1000 {
        StrengthLabel::VeryStrong
    } else if traffic > 10_000 && avg_position < 30.0 && keyword_count > 100 {
        StrengthLabel::Strong
    } else if traffic > 1_000 && keyword_count > 10 {
        StrengthLabel::Moderate
    } else {
        StrengthLabel::Weak
    }
}

/// Opportunity level of a keyword gap (a keyword competitors rank for but
/// the target does not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for GapLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GapLevel::High => "High",
            GapLevel::Medium => "Medium",
            GapLevel::Low => "Low",
        };
        f.write_str(s)
    }
}

/// Classify one competitor-only keyword.
///
/// `would_be_position` is the best position any competitor holds for the
/// keyword — a proxy for where the target could realistically land.
#[must_use]
pub fn classify_gap(would_be_position: u32, competitors_ranking: usize, volume: i64) -> GapLevel {
    if would_be_position <= 10 && competitors_ranking >= 2 && volume >= 1_000 {
        GapLevel::High
    } else if would_be_position <= 20 && competitors_ranking >= 1 && volume >= 500 {
        GapLevel::Medium
    } else {
        GapLevel::Low
    }
}
