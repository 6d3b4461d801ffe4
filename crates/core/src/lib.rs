pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommendations;
pub mod refine;
pub mod stats;
pub mod validation;

pub use catalog::Catalog;
pub use domain::criteria::{RecommendationMode, SelectionCriteria};
pub use domain::product::{NewProduct, Product, ProductId, ProductPatch};
pub use errors::{ApplicationError, CatalogError, DomainError, InterfaceError};
pub use recommendations::{
    get_recommendations, MatchRule, RecommendationEngine, ScoreCalculator, ScoredProduct,
};
pub use refine::{RankedRecommendation, ResultFilters, SortKey, SortOrder};
pub use stats::RecommendationStats;
pub use validation::{validate_criteria, ValidationReport, ValidationRules};
