use std::collections::HashSet;

use serde::Serialize;

use crate::recommendations::ScoredProduct;

/// Summary figures shown next to a recommendation list.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RecommendationStats {
    pub total_recommendations: usize,
    pub unique_categories: usize,
    pub categories: Vec<String>,
    /// Rounded to two decimals; zero for an empty list.
    pub average_score: f64,
}

impl RecommendationStats {
    pub fn from_results(results: &[ScoredProduct]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let mut seen = HashSet::new();
        let categories: Vec<String> = results
            .iter()
            .map(|scored| scored.product.category.as_str())
            .filter(|category| seen.insert(*category))
            .map(str::to_string)
            .collect();

        let total_score: u64 = results.iter().map(|scored| u64::from(scored.score)).sum();
        let average = total_score as f64 / results.len() as f64;

        Self {
            total_recommendations: results.len(),
            unique_categories: categories.len(),
            categories,
            average_score: (average * 100.0).round() / 100.0,
        }
    }
}
