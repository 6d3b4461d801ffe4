use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable catalog identifier. Higher ids are newer products.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: ProductId(id),
            name: name.into(),
            category: category.into(),
            preferences: Vec::new(),
            features: Vec::new(),
            description: None,
        }
    }

    pub fn with_preferences<I, S>(mut self, preferences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferences = preferences.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Product fields supplied when adding to a catalog; the catalog assigns the id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProduct {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            preferences: self.preferences,
            features: self.features,
            description: self.description,
        }
    }
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub preferences: Option<Vec<String>>,
    pub features: Option<Vec<String>>,
    pub description: Option<String>,
}

impl ProductPatch {
    pub fn apply_to(self, product: &Product) -> Product {
        Product {
            id: product.id,
            name: self.name.unwrap_or_else(|| product.name.clone()),
            category: self.category.unwrap_or_else(|| product.category.clone()),
            preferences: self.preferences.unwrap_or_else(|| product.preferences.clone()),
            features: self.features.unwrap_or_else(|| product.features.clone()),
            description: self.description.or_else(|| product.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Product, ProductId, ProductPatch};

    #[test]
    fn deserializes_with_missing_lists_as_empty() {
        let product: Product =
            serde_json::from_str(r#"{"id": 7, "name": "Bare"}"#).expect("product should parse");

        assert_eq!(product.id, ProductId(7));
        assert!(product.preferences.is_empty());
        assert!(product.features.is_empty());
        assert_eq!(product.category, "");
        assert_eq!(product.description, None);
    }

    #[test]
    fn description_is_serialized_only_when_present() {
        let product = Product::new(1, "RD Station CRM", "Vendas");
        let json = serde_json::to_value(&product).expect("product should serialize");

        assert_eq!(json["id"], 1);
        assert!(json.get("description").is_none());

        let described = product.with_description("CRM de vendas");
        let json = serde_json::to_value(&described).expect("product should serialize");
        assert_eq!(json["description"], "CRM de vendas");
    }

    #[test]
    fn patch_keeps_fields_it_does_not_mention() {
        let product = Product::new(2, "RD Station Marketing", "Marketing")
            .with_preferences(["Automação de marketing"]);
        let patched = ProductPatch {
            category: Some("Growth".to_string()),
            ..ProductPatch::default()
        }
        .apply_to(&product);

        assert_eq!(patched.id, ProductId(2));
        assert_eq!(patched.name, "RD Station Marketing");
        assert_eq!(patched.category, "Growth");
        assert_eq!(patched.preferences, vec!["Automação de marketing".to_string()]);
    }
}
