use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use recommender_core::{
    validate_criteria, RankedRecommendation, RecommendationEngine, RecommendationStats,
    ResultFilters, SelectionCriteria, SortKey, SortOrder, ValidationRules,
};
use serde::Serialize;
use tracing::info;

use crate::commands::{catalog_source, load_context, CommandResult, EXIT_VALIDATION};

const COMMAND: &str = "recommend";

#[derive(Debug, Clone, Default, Args)]
pub struct RecommendArgs {
    #[arg(long = "preference", short = 'p', help = "Selected preference (repeatable)")]
    pub preferences: Vec<String>,
    #[arg(long = "feature", short = 'f', help = "Selected feature (repeatable)")]
    pub features: Vec<String>,
    #[arg(
        long = "type",
        short = 't',
        help = "Recommendation type, e.g. SingleProduct or MultipleProducts (defaults to engine.default_recommendation_type)"
    )]
    pub recommendation_type: Option<String>,
    #[arg(long, help = "JSON file with selectedPreferences/selectedFeatures/recommendationType")]
    pub criteria: Option<PathBuf>,
    #[arg(long, help = "JSON product catalog to use instead of the configured one")]
    pub catalog: Option<PathBuf>,
    #[arg(long, help = "Keep results whose name or description contains this text")]
    pub search: Option<String>,
    #[arg(long, help = "Keep results in this category")]
    pub category: Option<String>,
    #[arg(long, default_value_t = 0, help = "Keep results scoring at least this much")]
    pub min_score: u32,
    #[arg(long, default_value = "ranking", help = "ranking|score|name|category")]
    pub sort_by: SortKey,
    #[arg(long, default_value = "asc", help = "asc|desc")]
    pub order: SortOrder,
    #[arg(long, help = "Reject forms without at least one preference, one feature and a type")]
    pub strict: bool,
    #[arg(long, help = "Emit machine-readable JSON output")]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RecommendationReport {
    mode: String,
    match_rule: String,
    catalog: String,
    criteria: SelectionCriteria,
    recommendations: Vec<RankedRecommendation>,
    stats: RecommendationStats,
}

pub fn run(args: &RecommendArgs) -> CommandResult {
    let (config, catalog) = match load_context(COMMAND, args.catalog.clone()) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let criteria = match build_criteria(args, &config.engine.default_recommendation_type) {
        Ok(criteria) => criteria,
        Err(failure) => return failure,
    };

    if args.strict {
        let report = validate_criteria(&criteria, &ValidationRules::default());
        if !report.is_valid() {
            return CommandResult::failure(
                COMMAND,
                "criteria_validation",
                report.summary(),
                EXIT_VALIDATION,
            );
        }
    }

    let engine = RecommendationEngine::from_config(&config.engine);
    let results = engine.recommend(&criteria, catalog.products());
    let filters = ResultFilters {
        search: args.search.clone(),
        category: args.category.clone(),
        min_score: args.min_score,
        sort_by: args.sort_by,
        order: args.order,
    };
    let refined = filters.apply(&results);
    let stats = RecommendationStats::from_results(&results);

    info!(
        event_name = "cli.recommend.completed",
        match_rule = ?engine.match_rule(),
        mode = ?criteria.mode(),
        matched_count = results.len(),
        shown_count = refined.len(),
        "recommendation request served"
    );

    let message = summary_message(results.len(), refined.len());
    if !args.json {
        return CommandResult::text(render_human(&message, &refined));
    }

    let report = RecommendationReport {
        mode: format!("{:?}", criteria.mode()).to_lowercase(),
        match_rule: format!("{:?}", engine.match_rule()).to_lowercase(),
        catalog: catalog_source(&config),
        criteria,
        recommendations: refined,
        stats,
    };
    match serde_json::to_value(&report) {
        Ok(data) => CommandResult::success_with_data(COMMAND, message, Some(data)),
        Err(error) => CommandResult::failure(COMMAND, "serialization", error.to_string(), 1),
    }
}

/// Flags extend whatever the criteria file selected; `--type` replaces its type.
fn build_criteria(
    args: &RecommendArgs,
    default_type: &str,
) -> Result<SelectionCriteria, CommandResult> {
    let mut criteria = match &args.criteria {
        Some(path) => read_criteria_file(path)?,
        None => SelectionCriteria::new().with_recommendation_type(default_type),
    };

    criteria.selected_preferences.extend(args.preferences.iter().cloned());
    criteria.selected_features.extend(args.features.iter().cloned());
    if let Some(recommendation_type) = &args.recommendation_type {
        criteria.recommendation_type = recommendation_type.clone();
    }

    Ok(criteria)
}

fn read_criteria_file(path: &Path) -> Result<SelectionCriteria, CommandResult> {
    let raw = fs::read_to_string(path).map_err(|error| {
        CommandResult::failure(
            COMMAND,
            "criteria_read",
            format!("could not read criteria file `{}`: {error}", path.display()),
            EXIT_VALIDATION,
        )
    })?;

    serde_json::from_str(&raw).map_err(|error| {
        CommandResult::failure(
            COMMAND,
            "criteria_parse",
            format!("could not parse criteria file `{}`: {error}", path.display()),
            EXIT_VALIDATION,
        )
    })
}

fn summary_message(matched: usize, shown: usize) -> String {
    match (matched, shown) {
        (0, _) => "no recommendations matched the selected criteria".to_string(),
        (matched, shown) if matched == shown => format!("{matched} recommendation(s) found"),
        (matched, shown) => format!("{shown} of {matched} recommendation(s) shown after filters"),
    }
}

fn render_human(message: &str, items: &[RankedRecommendation]) -> String {
    let mut lines = vec![message.to_string()];

    for item in items {
        let product = &item.scored.product;
        lines.push(format!(
            "{}. {} [{}] (id {}, score {})",
            item.ranking, product.name, product.category, product.id, item.scored.score
        ));
        if !item.scored.matched_preferences.is_empty() {
            lines.push(format!("   preferences: {}", item.scored.matched_preferences.join(", ")));
        }
        if !item.scored.matched_features.is_empty() {
            lines.push(format!("   features: {}", item.scored.matched_features.join(", ")));
        }
    }

    lines.join("\n")
}
