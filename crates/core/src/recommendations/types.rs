//! Types for the recommendation engine

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// How a selected string is compared against a product's own entries.
///
/// Both sides are trimmed and lower-cased before comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Either string contains the other.
    #[default]
    Containment,
    /// Strings are equal.
    Exact,
}

/// A catalog product with the score it earned in one engine call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Matched preferences plus matched features.
    pub score: u32,
    /// Product preferences that matched at least one selection, in product order.
    pub matched_preferences: Vec<String>,
    /// Product features that matched at least one selection, in product order.
    pub matched_features: Vec<String>,
}

impl ScoredProduct {
    pub fn is_match(&self) -> bool {
        self.score > 0
    }
}
