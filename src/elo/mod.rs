pub mod score_sheet;
pub mod scoring;

pub use score_sheet::{summarize, ScoreSummary, Side, VALID_BEST_OF};
pub use scoring::{expected_score, match_deltas, rating_delta};
