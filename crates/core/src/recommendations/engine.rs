//! Recommendation Engine - scores, filters, ranks and truncates candidates

use std::cmp::Ordering;

use tracing::debug;

use super::scoring::{NormalizedSelection, ScoreCalculator};
use super::types::{MatchRule, ScoredProduct};
use crate::config::EngineConfig;
use crate::domain::criteria::{RecommendationMode, SelectionCriteria};
use crate::domain::product::Product;

/// Matches selection criteria against a catalog.
///
/// The engine is total: empty criteria or an empty catalog produce an empty
/// list, never an error. Inputs are only borrowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct RecommendationEngine {
    calculator: ScoreCalculator,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_rule(rule: MatchRule) -> Self {
        Self { calculator: ScoreCalculator::with_rule(rule) }
    }

    /// Engine set up from the `[engine]` config section.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_match_rule(config.match_rule).ignoring_blank_entries(config.ignore_blank_entries)
    }

    pub fn ignoring_blank_entries(self, ignore: bool) -> Self {
        Self { calculator: self.calculator.ignoring_blank_entries(ignore) }
    }

    pub fn match_rule(&self) -> MatchRule {
        self.calculator.rule()
    }

    /// Products with a nonzero score, best first. Ties go to the higher id.
    /// Single mode keeps only the first entry.
    pub fn recommend(
        &self,
        criteria: &SelectionCriteria,
        products: &[Product],
    ) -> Vec<ScoredProduct> {
        let mode = criteria.mode();
        let mut ranked: Vec<ScoredProduct> = self
            .score_all(criteria, products)
            .into_iter()
            .filter(ScoredProduct::is_match)
            .collect();
        ranked.sort_by(compare_ranked);

        let matched_count = ranked.len();
        if mode.is_single() {
            ranked.truncate(1);
        }

        debug!(
            event_name = "recommendation.engine.ranked",
            match_rule = ?self.calculator.rule(),
            ignore_blank_entries = self.calculator.ignores_blank_entries(),
            mode = ?mode,
            candidate_count = products.len(),
            matched_count,
            returned_count = ranked.len(),
            "recommendations ranked"
        );
        ranked
    }

    /// Scores every product in catalog order, zero scores included.
    pub fn score_all(
        &self,
        criteria: &SelectionCriteria,
        products: &[Product],
    ) -> Vec<ScoredProduct> {
        let selection = NormalizedSelection::from_criteria(criteria);
        products
            .iter()
            .map(|product| {
                let breakdown = self.calculator.breakdown(product, &selection);
                ScoredProduct {
                    product: product.clone(),
                    score: breakdown.score(),
                    matched_preferences: breakdown.matched_preferences,
                    matched_features: breakdown.matched_features,
                }
            })
            .collect()
    }
}

/// Score descending, then id descending.
pub fn compare_ranked(left: &ScoredProduct, right: &ScoredProduct) -> Ordering {
    right.score.cmp(&left.score).then_with(|| right.product.id.cmp(&left.product.id))
}

/// Runs the default engine with the documented fallbacks: omitted criteria
/// mean no selections in single mode, an omitted catalog means no candidates.
pub fn get_recommendations(
    criteria: Option<&SelectionCriteria>,
    catalog: Option<&[Product]>,
) -> Vec<ScoredProduct> {
    let default_criteria;
    let criteria = match criteria {
        Some(criteria) => criteria,
        None => {
            default_criteria = SelectionCriteria::default();
            &default_criteria
        }
    };

    RecommendationEngine::new().recommend(criteria, catalog.unwrap_or_default())
}

/// Mode the engine will apply for the given criteria.
pub fn resolve_mode(criteria: &SelectionCriteria) -> RecommendationMode {
    criteria.mode()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalog::Catalog;
    use crate::domain::product::ProductId;

    fn two_product_catalog() -> Vec<Product> {
        vec![
            Product::new(1, "RD Station CRM", "Vendas")
                .with_preferences(["Integração fácil com ferramentas de e-mail"])
                .with_features(["Gestão de leads e oportunidades"]),
            Product::new(3, "RD Conversas", "Omnichannel")
                .with_preferences(["Integração com chatbots"])
                .with_features(["Chat ao vivo e mensagens automatizadas"]),
        ]
    }

    fn ids(results: &[ScoredProduct]) -> Vec<u64> {
        results.iter().map(|scored| scored.product.id.0).collect()
    }

    #[test]
    fn single_product_example_returns_best_match_with_score() {
        let criteria = SelectionCriteria::new()
            .with_preferences(["Integração com chatbots"])
            .with_features(["Chat ao vivo e mensagens automatizadas"])
            .with_recommendation_type("SingleProduct");

        let results = get_recommendations(Some(&criteria), Some(&two_product_catalog()));

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.id, ProductId(3));
        assert_eq!(results[0].product.name, "RD Conversas");
        assert_eq!(results[0].score, 2);
        assert_eq!(results[0].matched_preferences, vec!["Integração com chatbots".to_string()]);
        assert_eq!(
            results[0].matched_features,
            vec!["Chat ao vivo e mensagens automatizadas".to_string()]
        );
    }

    #[test]
    fn multiple_products_example_orders_by_score_then_id() {
        let criteria = SelectionCriteria::new()
            .with_preferences([
                "Integração fácil com ferramentas de e-mail",
                "Integração com chatbots",
            ])
            .with_recommendation_type("MultipleProducts");

        let results = get_recommendations(Some(&criteria), Some(&two_product_catalog()));

        assert_eq!(ids(&results), vec![3, 1]);
        assert!(results.iter().all(|scored| scored.score == 1));
    }

    #[test]
    fn unknown_preference_yields_empty_result() {
        let criteria = SelectionCriteria::new()
            .with_preferences(["Preferência inexistente"])
            .with_features(["Feature inexistente"]);

        assert!(get_recommendations(Some(&criteria), Some(&two_product_catalog())).is_empty());
    }

    #[test]
    fn omitted_arguments_yield_empty_result() {
        assert!(get_recommendations(None, None).is_empty());
        assert!(get_recommendations(None, Some(Catalog::builtin().products())).is_empty());

        let criteria = SelectionCriteria::new()
            .with_preferences(["Automação de marketing"])
            .with_recommendation_type("MultipleProducts");
        assert!(get_recommendations(Some(&criteria), None).is_empty());
        assert!(get_recommendations(Some(&criteria), Some(&[])).is_empty());
    }

    #[test]
    fn higher_score_wins_single_mode() {
        let criteria = SelectionCriteria::new()
            .with_preferences(["Integração fácil com ferramentas de e-mail", "Automação de marketing"])
            .with_features(["Rastreamento de comportamento do usuário"]);

        let results = RecommendationEngine::new().recommend(&criteria, Catalog::builtin().products());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.name, "RD Station Marketing");
        assert_eq!(results[0].score, 2);
    }

    #[test]
    fn multiple_mode_lists_every_match_in_rank_order() {
        let criteria = SelectionCriteria::new()
            .with_preferences(["Integração fácil com ferramentas de e-mail", "Automação de marketing"])
            .with_features(["Rastreamento de comportamento do usuário"])
            .with_recommendation_type("MultipleProducts");

        let results = RecommendationEngine::new().recommend(&criteria, Catalog::builtin().products());

        assert_eq!(ids(&results), vec![2, 1]);
        assert_eq!(results.iter().map(|scored| scored.score).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn single_mode_tie_goes_to_newest_product() {
        let criteria = SelectionCriteria::new()
            .with_preferences(["Automação de marketing", "Integração com chatbots"])
            .with_recommendation_type("produto único");

        let results = RecommendationEngine::new().recommend(&criteria, Catalog::builtin().products());

        assert_eq!(ids(&results), vec![3]);
    }

    #[test]
    fn partial_selection_matches_by_containment() {
        let criteria = SelectionCriteria::new()
            .with_features(["Integração"])
            .with_recommendation_type("MultipleProducts");

        let results = RecommendationEngine::new().recommend(&criteria, Catalog::builtin().products());

        assert_eq!(ids(&results), vec![4, 3]);
    }

    #[test]
    fn exact_rule_ignores_partial_selection() {
        let criteria = SelectionCriteria::new()
            .with_features(["Integração"])
            .with_recommendation_type("MultipleProducts");

        let results = RecommendationEngine::with_match_rule(MatchRule::Exact)
            .recommend(&criteria, Catalog::builtin().products());

        assert!(results.is_empty());
    }

    #[test]
    fn blank_selection_matches_by_plain_containment() {
        let catalog = vec![Product::new(1, "RD Conversas", "Omnichannel")
            .with_preferences(["Integração com chatbots"])];
        let criteria = SelectionCriteria::new()
            .with_preferences(["   "])
            .with_recommendation_type("MultipleProducts");

        let results = get_recommendations(Some(&criteria), Some(&catalog));
        assert_eq!(
            results.iter().map(|scored| (scored.product.id.0, scored.score)).collect::<Vec<_>>(),
            vec![(1, 1)]
        );

        let strict = RecommendationEngine::new().ignoring_blank_entries(true);
        assert!(strict.recommend(&criteria, &catalog).is_empty());
    }

    #[test]
    fn selections_are_trimmed_and_case_insensitive() {
        let criteria = SelectionCriteria::new()
            .with_preferences(["  AUTOMAÇÃO DE MARKETING  "])
            .with_features(["  rastreamento de comportamento do usuário "]);

        let results = RecommendationEngine::new().recommend(&criteria, Catalog::builtin().products());

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.name, "RD Station Marketing");
        assert_eq!(results[0].score, 2);
    }

    #[test]
    fn features_alone_can_produce_a_match() {
        let criteria = SelectionCriteria::new()
            .with_features(["Análise de dados para insights estratégicos"])
            .with_recommendation_type("MultipleProducts");

        let results = RecommendationEngine::new().recommend(&criteria, Catalog::builtin().products());

        assert_eq!(ids(&results), vec![4]);
    }

    #[test]
    fn unrecognized_type_falls_back_to_single_mode() {
        let criteria = SelectionCriteria::new()
            .with_features(["Integração"])
            .with_recommendation_type("");

        assert_eq!(resolve_mode(&criteria), RecommendationMode::Single);
        let results = RecommendationEngine::new().recommend(&criteria, Catalog::builtin().products());
        assert_eq!(ids(&results), vec![4]);
    }

    #[test]
    fn inputs_are_left_untouched() {
        let catalog = Catalog::builtin();
        let products = catalog.products().to_vec();
        let criteria = SelectionCriteria::new()
            .with_preferences(["  Integração com chatbots "])
            .with_recommendation_type("MultipleProducts");
        let criteria_before = criteria.clone();

        let _ = RecommendationEngine::new().recommend(&criteria, &products);

        assert_eq!(products, catalog.products());
        assert_eq!(criteria, criteria_before);
    }

    #[test]
    fn score_serializes_next_to_product_fields() {
        let criteria = SelectionCriteria::new().with_preferences(["Integração com chatbots"]);
        let results = get_recommendations(Some(&criteria), Some(&two_product_catalog()));
        let json = serde_json::to_value(&results[0]).expect("scored product should serialize");

        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "RD Conversas");
        assert_eq!(json["score"], 1);
        assert_eq!(json["matchedPreferences"][0], "Integração com chatbots");
    }

    const VOCABULARY: [&str; 8] =
        ["chat", "chatbots", "e-mail", "leads", "marketing", "dados", "vendas", "integração"];

    fn term() -> impl Strategy<Value = String> {
        prop::sample::select(VOCABULARY.to_vec()).prop_map(|term| term.to_string())
    }

    fn terms() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(term(), 0..4)
    }

    fn products() -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec((terms(), terms()), 0..8).prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(index, (preferences, features))| {
                    Product::new(index as u64 + 1, format!("P{index}"), "cat")
                        .with_preferences(preferences)
                        .with_features(features)
                })
                .collect()
        })
    }

    fn criteria(recommendation_type: &'static str) -> impl Strategy<Value = SelectionCriteria> {
        (terms(), terms()).prop_map(move |(preferences, features)| {
            SelectionCriteria::new()
                .with_preferences(preferences)
                .with_features(features)
                .with_recommendation_type(recommendation_type)
        })
    }

    proptest! {
        #[test]
        fn single_mode_returns_at_most_one(products in products(), criteria in criteria("SingleProduct")) {
            let results = RecommendationEngine::new().recommend(&criteria, &products);
            prop_assert!(results.len() <= 1);
        }

        #[test]
        fn multiple_mode_is_filtered_and_sorted(
            products in products(),
            criteria in criteria("MultipleProducts"),
        ) {
            let results = RecommendationEngine::new().recommend(&criteria, &products);

            prop_assert!(results.len() <= products.len());
            prop_assert!(results.iter().all(|scored| scored.score > 0));
            for pair in results.windows(2) {
                prop_assert_eq!(compare_ranked(&pair[0], &pair[1]), Ordering::Less);
            }
        }

        #[test]
        fn single_mode_returns_head_of_multiple_mode(
            products in products(),
            criteria in criteria("MultipleProducts"),
        ) {
            let engine = RecommendationEngine::new();
            let multiple = engine.recommend(&criteria, &products);
            let single = engine.recommend(
                &criteria.clone().with_recommendation_type("SingleProduct"),
                &products,
            );

            prop_assert_eq!(single.first(), multiple.first());
        }

        #[test]
        fn repeated_calls_are_identical(products in products(), criteria in criteria("MultipleProducts")) {
            let engine = RecommendationEngine::new();
            prop_assert_eq!(engine.recommend(&criteria, &products), engine.recommend(&criteria, &products));
        }

        #[test]
        fn adding_a_selection_never_lowers_a_score(
            products in products(),
            criteria in criteria("MultipleProducts"),
            extra in term(),
        ) {
            let engine = RecommendationEngine::new();
            let before = engine.score_all(&criteria, &products);

            let mut widened = criteria.clone();
            widened.selected_preferences.push(extra.clone());
            widened.selected_features.push(extra);
            let after = engine.score_all(&widened, &products);

            for (old, new) in before.iter().zip(after.iter()) {
                prop_assert!(new.score >= old.score);
            }
        }

        #[test]
        fn empty_criteria_never_match(products in products()) {
            let criteria = SelectionCriteria::new().with_recommendation_type("MultipleProducts");
            prop_assert!(RecommendationEngine::new().recommend(&criteria, &products).is_empty());
        }
    }
}
