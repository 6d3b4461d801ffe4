//! Match counting between user selections and product entries

use super::types::MatchRule;
use crate::domain::criteria::SelectionCriteria;
use crate::domain::product::Product;

/// Lower-cased, trimmed selections. Blank entries are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedSelection {
    pub preferences: Vec<String>,
    pub features: Vec<String>,
}

impl NormalizedSelection {
    pub fn from_criteria(criteria: &SelectionCriteria) -> Self {
        Self {
            preferences: normalize_all(&criteria.selected_preferences),
            features: normalize_all(&criteria.selected_features),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty() && self.features.is_empty()
    }
}

/// Per-product result of a scoring pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchBreakdown {
    pub matched_preferences: Vec<String>,
    pub matched_features: Vec<String>,
}

impl MatchBreakdown {
    pub fn score(&self) -> u32 {
        let total = self.matched_preferences.len() + self.matched_features.len();
        u32::try_from(total).unwrap_or(u32::MAX)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreCalculator {
    rule: MatchRule,
    ignore_blank_entries: bool,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(rule: MatchRule) -> Self {
        Self { rule, ignore_blank_entries: false }
    }

    /// When set, blank selections and blank product entries never match.
    /// Under plain containment an empty string is contained in everything.
    pub fn ignoring_blank_entries(mut self, ignore: bool) -> Self {
        self.ignore_blank_entries = ignore;
        self
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    pub fn ignores_blank_entries(&self) -> bool {
        self.ignore_blank_entries
    }

    /// Each product entry counts once, however many selections hit it.
    pub fn breakdown(&self, product: &Product, selection: &NormalizedSelection) -> MatchBreakdown {
        MatchBreakdown {
            matched_preferences: self.matched_entries(&product.preferences, &selection.preferences),
            matched_features: self.matched_entries(&product.features, &selection.features),
        }
    }

    pub fn matched_entries(&self, product_entries: &[String], selected: &[String]) -> Vec<String> {
        let usable = |value: &str| !(self.ignore_blank_entries && value.is_empty());
        if !selected.iter().any(|choice| usable(choice)) {
            return Vec::new();
        }

        product_entries
            .iter()
            .filter(|entry| {
                let entry = normalize(entry);
                usable(&entry)
                    && selected
                        .iter()
                        .any(|choice| usable(choice) && self.matches(&entry, choice))
            })
            .cloned()
            .collect()
    }

    /// Both arguments must already be normalized.
    pub fn matches(&self, product_entry: &str, selected: &str) -> bool {
        match self.rule {
            MatchRule::Containment => {
                product_entry.contains(selected) || selected.contains(product_entry)
            }
            MatchRule::Exact => product_entry == selected,
        }
    }
}

pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn normalize_all(values: &[String]) -> Vec<String> {
    values.iter().map(|value| normalize(value)).collect()
}
