//! Seasonality analysis over monthly search volumes.

use serde::{Deserialize, Serialize};

/// Variability of monthly volume, bucketed by coefficient of variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalityLevel {
    High,
    Medium,
    Low,
}

/// Direction of the recent volume trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Stable,
    Decreasing,
}

/// Seasonality profile of one keyword's monthly volumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seasonality {
    pub level: SeasonalityLevel,
    pub coefficient_of_variation: f64,
    /// Zero-based indices of months whose volume exceeds 1.2 × mean.
    pub peak_months: Vec<usize>,
    pub trend: TrendDirection,
}

/// Analyze a year of monthly volumes (oldest first).
///
/// Coefficient of variation = population standard deviation / mean;
/// level is High above 0.5, Medium above 0.25, otherwise Low. Peak months
/// exceed 1.2 × mean. Trend compares the mean of the last three months to
/// the mean of the first three: a change beyond ±10 % is Increasing or
/// Decreasing, anything else Stable.
///
/// An empty or all-zero series is flat by definition: Low, no peaks, Stable.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn seasonality(monthly: &[i64]) -> Seasonality {
    if monthly.is_empty() {
        return Seasonality {
            level: SeasonalityLevel::Low,
            coefficient_of_variation: 0.0,
            peak_months: Vec::new(),
            trend: TrendDirection::Stable,
        };
    }

    let n = monthly.len() as f64;
    let mean = monthly.iter().sum::<i64>() as f64 / n;

    if mean == 0.0 {
        return Seasonality {
            level: SeasonalityLevel::Low,
            coefficient_of_variation: 0.0,
            peak_months: Vec::new(),
            trend: TrendDirection::Stable,
        };
    }

    let variance = monthly
        .iter()
        .map(|&v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let cv = variance.sqrt() / mean;

    let level = if cv > 0.5 {
        SeasonalityLevel::High
    } else if cv > 0.25 {
        SeasonalityLevel::Medium
    } else {
        SeasonalityLevel::Low
    };

    let peak_months = monthly
        .iter()
        .enumerate()
        .filter(|(_, &v)| v as f64 > 1.2 * mean)
        .map(|(i, _)| i)
        .collect();

    Seasonality {
        level,
        coefficient_of_variation: cv,
        peak_months,
        trend: trend_direction(monthly),
    }
}

/// Compare the last three months against the first three.
#[allow(clippy::cast_precision_loss)]
fn trend_direction(monthly: &[i64]) -> TrendDirection {
    let window = monthly.len().min(3);
    if window == 0 {
        return TrendDirection::Stable;
    }

    let first = monthly[..window].iter().sum::<i64>() as f64 / window as f64;
    let last = monthly[monthly.len() - window..].iter().sum::<i64>() as f64 / window as f64;

    if first == 0.0 {
        return if last > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Stable
        };
    }

    let change = (last - first) / first;
    if change > 0.10 {
        TrendDirection::Increasing
    } else if change < -0.10 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_december_spike_is_high_seasonality() {
        let volumes = [100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 100, 1000];
        let s = seasonality(&volumes);
        assert_eq!(s.level, SeasonalityLevel::High);
        assert!(
            s.coefficient_of_variation > 0.5,
            "cv = {}",
            s.coefficient_of_variation
        );
        assert_eq!(s.peak_months, vec![11]);
        assert_eq!(s.trend, TrendDirection::Increasing);
    }

    #[test]
    fn flat_series_is_low_and_stable() {
        let volumes = [500; 12];
        let s = seasonality(&volumes);
        assert_eq!(s.level, SeasonalityLevel::Low);
        assert!(s.coefficient_of_variation.abs() < f64::EPSILON);
        assert!(s.peak_months.is_empty());
        assert_eq!(s.trend, TrendDirection::Stable);
    }

    #[test]
    fn moderate_swing_is_medium() {
        // Alternating 100/200: mean 150, stddev 50, cv ≈ 0.33.
        let volumes = [100, 200, 100, 200, 100, 200, 100, 200, 100, 200, 100, 200];
        let s = seasonality(&volumes);
        assert_eq!(s.level, SeasonalityLevel::Medium);
    }

    #[test]
    fn declining_series_trends_decreasing() {
        let volumes = [1000, 950, 900, 850, 800, 750, 700, 650, 600, 550, 500, 450];
        let s = seasonality(&volumes);
        assert_eq!(s.trend, TrendDirection::Decreasing);
    }

    #[test]
    fn ten_percent_drift_is_still_stable() {
        // First three mean 100, last three mean 108: +8 % stays Stable.
        let volumes = [100, 100, 100, 104, 104, 104, 106, 106, 106, 108, 108, 108];
        let s = seasonality(&volumes);
        assert_eq!(s.trend, TrendDirection::Stable);
    }

    #[test]
    fn empty_series_is_flat() {
        let s = seasonality(&[]);
        assert_eq!(s.level, SeasonalityLevel::Low);
        assert!(s.peak_months.is_empty());
        assert_eq!(s.trend, TrendDirection::Stable);
    }

    #[test]
    fn all_zero_series_does_not_divide_by_zero() {
        let s = seasonality(&[0; 12]);
        assert_eq!(s.level, SeasonalityLevel::Low);
        assert!(s.coefficient_of_variation.abs() < f64::EPSILON);
    }
}
