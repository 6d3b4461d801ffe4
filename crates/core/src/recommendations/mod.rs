//! Product Recommendation Engine
//!
//! Scores catalog products against user-selected preferences and features,
//! drops non-matches, ranks by score then newest id, and optionally collapses
//! the result to the single best match.

mod engine;
mod scoring;
mod types;

pub use engine::{compare_ranked, get_recommendations, resolve_mode, RecommendationEngine};
pub use scoring::{normalize, MatchBreakdown, NormalizedSelection, ScoreCalculator};
pub use types::*;
