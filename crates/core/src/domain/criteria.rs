use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_RECOMMENDATION_TYPE: &str = "SingleProduct";

/// Normalized type strings that select single-product output.
pub const SINGLE_PRODUCT_TYPES: [&str; 3] = ["singleproduct", "produto único", "produto unico"];

/// Normalized type strings that select multi-product output. Anything outside
/// this list falls back to single mode.
pub const MULTIPLE_PRODUCT_TYPES: [&str; 4] =
    ["multipleproducts", "múltiplos produtos", "multiplos produtos", "multiple"];

/// User selections collected from the recommendation form.
///
/// Every field is optional on the wire. Missing or `null` values become empty
/// selections and the default single-product type. The form's
/// `selectedRecommendationType` key is read when `recommendationType` is
/// absent; if both are present `recommendationType` wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CriteriaFields")]
pub struct SelectionCriteria {
    pub selected_preferences: Vec<String>,
    pub selected_features: Vec<String>,
    pub recommendation_type: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CriteriaFields {
    #[serde(default, deserialize_with = "null_as_default")]
    selected_preferences: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    selected_features: Vec<String>,
    #[serde(default)]
    recommendation_type: Option<String>,
    #[serde(default)]
    selected_recommendation_type: Option<String>,
}

impl From<CriteriaFields> for SelectionCriteria {
    fn from(fields: CriteriaFields) -> Self {
        Self {
            selected_preferences: fields.selected_preferences,
            selected_features: fields.selected_features,
            recommendation_type: fields
                .recommendation_type
                .or(fields.selected_recommendation_type)
                .unwrap_or_else(default_recommendation_type),
        }
    }
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            selected_preferences: Vec::new(),
            selected_features: Vec::new(),
            recommendation_type: default_recommendation_type(),
        }
    }
}

impl SelectionCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_preferences = preferences.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_recommendation_type(mut self, recommendation_type: impl Into<String>) -> Self {
        self.recommendation_type = recommendation_type.into();
        self
    }

    pub fn mode(&self) -> RecommendationMode {
        RecommendationMode::from_type(&self.recommendation_type)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_preferences.is_empty() && self.selected_features.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationMode {
    /// At most one top-ranked product.
    Single,
    /// Every product with a nonzero score.
    Multiple,
}

impl RecommendationMode {
    pub fn from_type(recommendation_type: &str) -> Self {
        let normalized = recommendation_type.trim().to_lowercase();
        if MULTIPLE_PRODUCT_TYPES.contains(&normalized.as_str()) {
            Self::Multiple
        } else {
            Self::Single
        }
    }

    pub fn is_single(self) -> bool {
        matches!(self, Self::Single)
    }
}

fn default_recommendation_type() -> String {
    DEFAULT_RECOMMENDATION_TYPE.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{RecommendationMode, SelectionCriteria, SINGLE_PRODUCT_TYPES};

    #[test]
    fn single_mode_accepts_documented_spellings() {
        for raw in ["SingleProduct", "  singleproduct ", "Produto Único", "PRODUTO UNICO"] {
            assert_eq!(RecommendationMode::from_type(raw), RecommendationMode::Single, "{raw}");
        }
        for normalized in SINGLE_PRODUCT_TYPES {
            assert!(RecommendationMode::from_type(normalized).is_single());
        }
    }

    #[test]
    fn multiple_mode_requires_a_recognized_value() {
        assert_eq!(RecommendationMode::from_type("MultipleProducts"), RecommendationMode::Multiple);
        assert_eq!(
            RecommendationMode::from_type(" Múltiplos Produtos "),
            RecommendationMode::Multiple
        );
        assert_eq!(RecommendationMode::from_type(""), RecommendationMode::Single);
        assert_eq!(RecommendationMode::from_type("everything"), RecommendationMode::Single);
    }

    #[test]
    fn empty_json_object_yields_defaults() {
        let criteria: SelectionCriteria = serde_json::from_str("{}").expect("criteria should parse");
        assert_eq!(criteria, SelectionCriteria::default());
        assert_eq!(criteria.recommendation_type, "SingleProduct");
    }

    #[test]
    fn null_fields_and_form_alias_are_tolerated() {
        let criteria: SelectionCriteria = serde_json::from_str(
            r#"{
                "selectedPreferences": null,
                "selectedFeatures": ["Chat ao vivo e mensagens automatizadas"],
                "selectedRecommendationType": "MultipleProducts"
            }"#,
        )
        .expect("criteria should parse");

        assert!(criteria.selected_preferences.is_empty());
        assert_eq!(criteria.selected_features.len(), 1);
        assert_eq!(criteria.mode(), RecommendationMode::Multiple);
    }

    #[test]
    fn both_type_keys_resolve_to_the_canonical_one() {
        let criteria: SelectionCriteria = serde_json::from_str(
            r#"{
                "recommendationType": "SingleProduct",
                "selectedRecommendationType": "MultipleProducts"
            }"#,
        )
        .expect("both type keys should be accepted");
        assert_eq!(criteria.recommendation_type, "SingleProduct");

        let criteria: SelectionCriteria = serde_json::from_str(
            r#"{"recommendationType": null, "selectedRecommendationType": "MultipleProducts"}"#,
        )
        .expect("null canonical key falls back to the form key");
        assert_eq!(criteria.mode(), RecommendationMode::Multiple);
    }

    #[test]
    fn serialization_uses_canonical_field_names() {
        let json = serde_json::to_value(SelectionCriteria::new().with_preferences(["Chat"]))
            .expect("criteria should serialize");

        assert_eq!(json["selectedPreferences"][0], "Chat");
        assert_eq!(json["recommendationType"], "SingleProduct");
        assert!(json.get("selectedRecommendationType").is_none());
    }
}
