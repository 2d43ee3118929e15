//! Pure, deterministic analytics over normalized provider results.
//!
//! Nothing in this crate performs I/O; every function maps inputs to
//! outputs so the scoring rules can be tested exhaustively in isolation.

mod competitive;
mod opportunity;
mod seasonality;
mod traffic;

pub use competitive::{classify_gap, strength_label, GapLevel, StrengthLabel};
pub use opportunity::{opportunity_score, CompetitionLevel, SearchIntent};
pub use seasonality::{seasonality, Seasonality, SeasonalityLevel, TrendDirection};
pub use traffic::{ctr_for_position, estimate_traffic};
