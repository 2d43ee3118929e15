//! Composite opportunity scoring for a keyword.
//!
//! Four independent tiers contribute to a 0–100 score: search volume (up to
//! 40), competition (up to 30), search intent (up to 20), and trend
//! direction (up to 10).

use serde::{Deserialize, Serialize};

use crate::seasonality::TrendDirection;

/// Provider competition bucket for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl CompetitionLevel {
    /// Parse the provider's uppercase bucket labels.
    #[must_use]
    pub fn from_provider(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Some(CompetitionLevel::Low),
            "MEDIUM" => Some(CompetitionLevel::Medium),
            "HIGH" => Some(CompetitionLevel::High),
            _ => None,
        }
    }
}

/// Search intent bucket for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchIntent {
    Transactional,
    Commercial,
    Informational,
    Navigational,
}

impl SearchIntent {
    #[must_use]
    pub fn from_provider(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "transactional" => Some(SearchIntent::Transactional),
            "commercial" => Some(SearchIntent::Commercial),
            "informational" => Some(SearchIntent::Informational),
            "navigational" => Some(SearchIntent::Navigational),
            _ => None,
        }
    }
}

/// Composite opportunity score in `[0, 100]`.
///
/// Tier contributions:
/// - volume: ≥10000 → 40, ≥5000 → 30, ≥1000 → 20, ≥100 → 10, else 0
/// - competition: Low → 30, Medium → 15, High → 5
/// - intent: transactional → 20, commercial → 15, informational → 10,
///   navigational → 0
/// - trend: increasing → 10, stable → 5, decreasing → 0
#[must_use]
pub fn opportunity_score(
    volume: i64,
    competition: CompetitionLevel,
    intent: SearchIntent,
    trend: TrendDirection,
) -> u32 {
    let volume_points = if volume >= 10_000 {
        40
    } else if volume >= 5_000 {
        30
    } else if volume >= 1_000 {
        20
    } else if volume >= 100 {
        10
    } else {
        0
    };

    let competition_points = match competition {
        CompetitionLevel::Low => 30,
        CompetitionLevel::Medium => 15,
        CompetitionLevel::High => 5,
    };

    let intent_points = match intent {
        SearchIntent::Transactional => 20,
        SearchIntent::Commercial => 15,
        SearchIntent::Informational => 10,
        SearchIntent::Navigational => 0,
    };

    let trend_points = match trend {
        TrendDirection::Increasing => 10,
        TrendDirection::Stable => 5,
        TrendDirection::Decreasing => 0,
    };

    (volume_points + competition_points + intent_points + trend_points).min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_case_scores_exactly_100() {
        let score = opportunity_score(
            50_000,
            CompetitionLevel::Low,
            SearchIntent::Transactional,
            TrendDirection::Increasing,
        );
        assert_eq!(score, 100);
    }

    #[test]
    fn worst_case_scores_5() {
        // Zero volume + navigational + decreasing leaves only the
        // competition floor.
        let score = opportunity_score(
            0,
            CompetitionLevel::High,
            SearchIntent::Navigational,
            TrendDirection::Decreasing,
        );
        assert_eq!(score, 5);
    }

    #[test]
    fn all_combinations_stay_in_bounds() {
        let volumes = [0, 99, 100, 999, 1_000, 4_999, 5_000, 9_999, 10_000, 1_000_000];
        let competitions = [
            CompetitionLevel::Low,
            CompetitionLevel::Medium,
            CompetitionLevel::High,
        ];
        let intents = [
            SearchIntent::Transactional,
            SearchIntent::Commercial,
            SearchIntent::Informational,
            SearchIntent::Navigational,
        ];
        let trends = [
            TrendDirection::Increasing,
            TrendDirection::Stable,
            TrendDirection::Decreasing,
        ];
        for &v in &volumes {
            for &c in &competitions {
                for &i in &intents {
                    for &t in &trends {
                        let score = opportunity_score(v, c, i, t);
                        assert!(score <= 100, "score {score} out of range for v={v}");
                    }
                }
            }
        }
    }

    #[test]
    fn volume_tier_boundaries() {
        let base = |v| {
            opportunity_score(
                v,
                CompetitionLevel::High,
                SearchIntent::Navigational,
                TrendDirection::Decreasing,
            )
        };
        assert_eq!(base(99), 5);
        assert_eq!(base(100), 15);
        assert_eq!(base(1_000), 25);
        assert_eq!(base(5_000), 35);
        assert_eq!(base(10_000), 45);
    }

    #[test]
    fn competition_parse_accepts_provider_casing() {
        assert_eq!(
            CompetitionLevel::from_provider("LOW"),
            Some(CompetitionLevel::Low)
        );
        assert_eq!(
            CompetitionLevel::from_provider("medium"),
            Some(CompetitionLevel::Medium)
        );
        assert_eq!(CompetitionLevel::from_provider("fierce"), None);
    }

    #[test]
    fn intent_parse_accepts_provider_labels() {
        assert_eq!(
            SearchIntent::from_provider("transactional"),
            Some(SearchIntent::Transactional)
        );
        assert_eq!(SearchIntent::from_provider("browsing"), None);
    }
}
