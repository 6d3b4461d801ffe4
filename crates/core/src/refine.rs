//! Post-ranking refinement of recommendation lists: text search, category and
//! minimum-score filters, and re-sorting for display.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::recommendations::{normalize, ScoredProduct};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Engine order.
    #[default]
    Ranking,
    Score,
    Name,
    Category,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported {kind} `{value}` (expected {expected})")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for SortKey {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ranking" => Ok(Self::Ranking),
            "score" => Ok(Self::Score),
            "name" => Ok(Self::Name),
            "category" => Ok(Self::Category),
            other => Err(UnknownOption {
                kind: "sort key",
                value: other.to_string(),
                expected: "ranking|score|name|category",
            }),
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownOption;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(UnknownOption {
                kind: "sort order",
                value: other.to_string(),
                expected: "asc|desc",
            }),
        }
    }
}

/// A recommendation with its 1-based position in engine order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RankedRecommendation {
    pub ranking: usize,
    #[serde(flatten)]
    pub scored: ScoredProduct,
}

impl RankedRecommendation {
    fn matches_search(&self, term: &str) -> bool {
        let product = &self.scored.product;
        product.name.to_lowercase().contains(term)
            || product
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(term))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultFilters {
    /// Case-insensitive substring over name and description. Blank disables it.
    pub search: Option<String>,
    /// Exact category. Blank disables it.
    pub category: Option<String>,
    /// Zero disables it.
    pub min_score: u32,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

impl ResultFilters {
    pub fn is_active(&self) -> bool {
        self.search_term().is_some() || self.category_filter().is_some() || self.min_score > 0
    }

    pub fn apply(&self, results: &[ScoredProduct]) -> Vec<RankedRecommendation> {
        let search = self.search_term();
        let category = self.category_filter();

        let mut refined: Vec<RankedRecommendation> = results
            .iter()
            .enumerate()
            .map(|(index, scored)| RankedRecommendation { ranking: index + 1, scored: scored.clone() })
            .filter(|item| search.as_deref().map_or(true, |term| item.matches_search(term)))
            .filter(|item| category.map_or(true, |category| item.scored.product.category == category))
            .filter(|item| self.min_score == 0 || item.scored.score >= self.min_score)
            .collect();

        refined.sort_by(|left, right| {
            let primary = self.compare(left, right);
            let primary = match self.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            primary.then_with(|| left.ranking.cmp(&right.ranking))
        });
        refined
    }

    fn compare(&self, left: &RankedRecommendation, right: &RankedRecommendation) -> Ordering {
        let (left_product, right_product) = (&left.scored.product, &right.scored.product);
        match self.sort_by {
            SortKey::Ranking => left.ranking.cmp(&right.ranking),
            SortKey::Score => left.scored.score.cmp(&right.scored.score),
            SortKey::Name => left_product.name.cmp(&right_product.name),
            SortKey::Category => left_product.category.cmp(&right_product.category),
        }
    }

    fn search_term(&self) -> Option<String> {
        self.search.as_deref().map(normalize).filter(|term| !term.is_empty())
    }

    fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|category| !category.is_empty())
    }
}
