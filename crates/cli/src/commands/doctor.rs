use chrono::Utc;
use recommender_core::config::{AppConfig, LoadOptions};
use recommender_core::{Catalog, RecommendationEngine, SelectionCriteria};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
    checked_at: String,
}

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            match load_catalog(&config) {
                Ok(catalog) => {
                    checks.push(DoctorCheck {
                        name: "catalog_load",
                        status: CheckStatus::Pass,
                        details: format!("{} product(s) loaded", catalog.len()),
                    });
                    checks.push(check_catalog_matchable(&config, &catalog));
                }
                Err(details) => {
                    checks.push(DoctorCheck {
                        name: "catalog_load",
                        status: CheckStatus::Fail,
                        details,
                    });
                    checks.push(skipped("catalog_matchable", "catalog did not load"));
                }
            }
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(skipped("catalog_load", "configuration did not load"));
            checks.push(skipped("catalog_matchable", "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks, checked_at: Utc::now().to_rfc3339() }
}

fn load_catalog(config: &AppConfig) -> Result<Catalog, String> {
    match &config.catalog.path {
        Some(path) => Catalog::load(path).map_err(|error| error.to_string()),
        None => Ok(Catalog::builtin()),
    }
}

/// Every product must be reachable by selecting its own first preference.
fn check_catalog_matchable(config: &AppConfig, catalog: &Catalog) -> DoctorCheck {
    let engine = RecommendationEngine::from_config(&config.engine);
    let unreachable: Vec<String> = catalog
        .products()
        .iter()
        .filter(|product| {
            let criteria = SelectionCriteria::new()
                .with_preferences(product.preferences.iter().take(1).cloned())
                .with_features(product.features.iter().take(1).cloned())
                .with_recommendation_type("MultipleProducts");
            !engine
                .recommend(&criteria, catalog.products())
                .iter()
                .any(|scored| scored.product.id == product.id)
        })
        .map(|product| format!("{} ({})", product.name, product.id))
        .collect();

    if unreachable.is_empty() {
        DoctorCheck {
            name: "catalog_matchable",
            status: CheckStatus::Pass,
            details: "every product can be recommended".to_string(),
        }
    } else {
        DoctorCheck {
            name: "catalog_matchable",
            status: CheckStatus::Fail,
            details: format!("products without matchable entries: {}", unreachable.join(", ")),
        }
    }
}

fn skipped(name: &'static str, reason: &str) -> DoctorCheck {
    DoctorCheck { name, status: CheckStatus::Skipped, details: format!("skipped because {reason}") }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
