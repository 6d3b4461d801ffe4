use std::path::PathBuf;

use recommender_core::{ApplicationError, DomainError, Product, ProductId};

use crate::commands::{
    catalog_source, interface_failure, load_context, CommandResult, EXIT_NOT_FOUND,
};

pub fn list(catalog_path: Option<PathBuf>, json: bool) -> CommandResult {
    let (config, catalog) = match load_context("catalog.list", catalog_path) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let message = format!("{} product(s) from {}", catalog.len(), catalog_source(&config));
    if !json {
        let mut lines = vec![message];
        lines.extend(catalog.products().iter().map(render_summary));
        if !catalog.is_empty() {
            lines.push(format!("categories: {}", catalog.categories().join(", ")));
        }
        return CommandResult::text(lines.join("\n"));
    }

    match serde_json::to_value(catalog.products()) {
        Ok(data) => CommandResult::success_with_data("catalog.list", message, Some(data)),
        Err(error) => CommandResult::failure("catalog.list", "serialization", error.to_string(), 1),
    }
}

pub fn show(catalog_path: Option<PathBuf>, id: u64, json: bool) -> CommandResult {
    let (_, catalog) = match load_context("catalog.show", catalog_path) {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let Some(product) = catalog.find(ProductId(id)) else {
        let error = ApplicationError::from(DomainError::ProductNotFound(ProductId(id)));
        return interface_failure("catalog.show", "not_found", error, EXIT_NOT_FOUND);
    };

    if !json {
        return CommandResult::text(render_detail(product));
    }

    match serde_json::to_value(product) {
        Ok(data) => CommandResult::success_with_data("catalog.show", product.name.clone(), Some(data)),
        Err(error) => CommandResult::failure("catalog.show", "serialization", error.to_string(), 1),
    }
}

fn render_summary(product: &Product) -> String {
    format!("- {} {} [{}]", product.id, product.name, product.category)
}

fn render_detail(product: &Product) -> String {
    let mut lines = vec![format!("{} {} [{}]", product.id, product.name, product.category)];
    if let Some(description) = &product.description {
        lines.push(description.clone());
    }
    lines.push("preferences:".to_string());
    lines.extend(product.preferences.iter().map(|preference| format!("  - {preference}")));
    lines.push("features:".to_string());
    lines.extend(product.features.iter().map(|feature| format!("  - {feature}")));
    lines.join("\n")
}
