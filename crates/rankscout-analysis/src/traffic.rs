//! Click-through-rate model and traffic estimation.

/// Observed CTR by organic position for positions 1–10.
const CTR_TABLE: [f64; 10] = [0.28, 0.15, 0.11, 0.08, 0.07, 0.05, 0.04, 0.03, 0.03, 0.02];

/// CTR for a 1-based SERP position.
///
/// Positions 1–10 use the fixed lookup table, 11–20 fall back to 1 %, and
/// anything beyond page two gets 0.5 %. Position 0 (unranked) is 0.
#[must_use]
pub fn ctr_for_position(position: u32) -> f64 {
    match position {
        0 => 0.0,
        1..=10 => CTR_TABLE[(position - 1) as usize],
        11..=20 => 0.01,
        _ => 0.005,
    }
}

/// Estimated monthly visits: `round(volume × ctr(position))`.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn estimate_traffic(volume: i64, position: u32) -> i64 {
    (volume as f64 * ctr_for_position(position)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_one_gets_28_percent() {
        assert!((ctr_for_position(1) - 0.28).abs() < f64::EPSILON);
    }

    #[test]
    fn ctr_is_monotonically_non_increasing() {
        let mut previous = ctr_for_position(1);
        for position in 2..30 {
            let current = ctr_for_position(position);
            assert!(
                current <= previous,
                "ctr increased at position {position}: {current} > {previous}"
            );
            previous = current;
        }
    }

    #[test]
    fn second_page_positions_fall_back_to_one_percent() {
        assert!((ctr_for_position(11) - 0.01).abs() < f64::EPSILON);
        assert!((ctr_for_position(20) - 0.01).abs() < f64::EPSILON);
        assert!((ctr_for_position(21) - 0.005).abs() < f64::EPSILON);
    }

    #[test]
    fn traffic_estimate_rounds() {
        assert_eq!(estimate_traffic(1000, 1), 280);
        assert_eq!(estimate_traffic(3000, 5), 210);
        // 150 × 0.03 = 4.5 rounds up.
        assert_eq!(estimate_traffic(150, 8), 5);
    }

    #[test]
    fn unranked_position_estimates_zero() {
        assert_eq!(estimate_traffic(100_000, 0), 0);
    }
}
