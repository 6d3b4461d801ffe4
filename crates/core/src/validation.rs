//! Form-level checks run before a recommendation request. The engine accepts
//! anything; these rules are for callers that want to reject thin input.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::criteria::SelectionCriteria;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    pub min_preferences: usize,
    pub min_features: usize,
    pub require_recommendation_type: bool,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self { min_preferences: 1, min_features: 1, require_recommendation_type: true }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Field name to message.
    pub errors: BTreeMap<&'static str, String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn summary(&self) -> String {
        self.errors.iter().map(|(field, message)| format!("{field}: {message}")).collect::<Vec<_>>().join("; ")
    }
}

pub fn validate_criteria(criteria: &SelectionCriteria, rules: &ValidationRules) -> ValidationReport {
    let mut errors = BTreeMap::new();

    if count_filled(&criteria.selected_preferences) < rules.min_preferences {
        errors.insert(
            "preferences",
            format!("select at least {} preference(s)", rules.min_preferences),
        );
    }

    if count_filled(&criteria.selected_features) < rules.min_features {
        errors.insert("features", format!("select at least {} feature(s)", rules.min_features));
    }

    if rules.require_recommendation_type && criteria.recommendation_type.trim().is_empty() {
        errors.insert("recommendationType", "this field is required".to_string());
    }

    ValidationReport { errors }
}

fn count_filled(values: &[String]) -> usize {
    values.iter().filter(|value| !value.trim().is_empty()).count()
}
