use std::collections::HashSet;

use serde_json::{Map, Value};

use super::{
    check_tool_standards, duplicate_entries, entry_label, is_filled_string, is_present,
    ValidationError, ValidationResult,
};
use crate::categories::CategoryRegistry;
use crate::standards::StandardRegistry;

pub const VALID_STATUSES: &[&str] = &["active", "maintenance", "deprecated"];

/// The two taxonomies a tool's metadata is resolved against.
#[derive(Debug, Clone, Copy)]
pub struct Taxonomies<'a> {
    pub categories: &'a CategoryRegistry,
    pub standards: &'a StandardRegistry,
}

impl<'a> Taxonomies<'a> {
    pub fn new(categories: &'a CategoryRegistry, standards: &'a StandardRegistry) -> Self {
        Self {
            categories,
            standards,
        }
    }
}

/// Validate the metadata block of one tool document.
///
/// Required fields, categories, status and standards are checked independently and
/// their findings concatenated in that order.
pub fn validate_tool(meta: &Map<String, Value>, taxonomies: Taxonomies<'_>) -> ValidationResult {
    let mut issues = Vec::new();
    issues.extend(check_required_fields(meta));
    issues.extend(check_categories(meta, taxonomies.categories));
    issues.extend(check_status(meta));
    issues.extend(check_tool_standards(meta, taxonomies.standards));
    ValidationResult::from_issues(issues)
}

fn check_required_fields(meta: &Map<String, Value>) -> Vec<ValidationError> {
    ["title", "description"]
        .into_iter()
        .filter(|field| !is_filled_string(meta.get(*field)))
        .map(|field| {
            ValidationError::error(
                field,
                format!("Missing or empty required field \"{field}\""),
            )
        })
        .collect()
}

fn check_categories(meta: &Map<String, Value>, registry: &CategoryRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(value) = meta.get("categories").filter(|v| is_present(Some(*v))) else {
        errors.push(ValidationError::error(
            "categories",
            "Missing required field \"categories\"",
        ));
        return errors;
    };

    let Value::Array(entries) = value else {
        errors.push(ValidationError::error(
            "categories",
            "Field \"categories\" must be an array",
        ));
        return errors;
    };

    if entries.is_empty() {
        errors.push(ValidationError::warning(
            "categories",
            "Categories array is empty - tool will not appear in any category",
        ));
        return errors;
    }

    let known: HashSet<&str> = registry.slugs().collect();
    let unknown: Vec<String> = entries
        .iter()
        .filter(|entry| !entry.as_str().is_some_and(|s| known.contains(s)))
        .map(entry_label)
        .collect();
    if !unknown.is_empty() {
        let valid: Vec<&str> = registry.slugs().collect();
        errors.push(ValidationError::error(
            "categories",
            format!(
                "Invalid categories: {}\n   Valid categories are: {}",
                unknown.join(", "),
                valid.join(", ")
            ),
        ));
    }

    let duplicates = duplicate_entries(entries);
    if !duplicates.is_empty() {
        errors.push(ValidationError::error(
            "categories",
            format!("Duplicate categories found: {}", duplicates.join(", ")),
        ));
    }

    errors
}

fn check_status(meta: &Map<String, Value>) -> Vec<ValidationError> {
    let valid = VALID_STATUSES.join(", ");
    match meta.get("status").filter(|v| is_present(Some(*v))) {
        Some(status) if status.as_str().is_some_and(|s| VALID_STATUSES.contains(&s)) => Vec::new(),
        Some(status) => vec![ValidationError::error(
            "status",
            format!("Invalid status \"{}\". Valid values: {valid}", entry_label(status)),
        )],
        None => vec![ValidationError::warning(
            "status",
            format!("Missing status field. Recommended values: {valid}"),
        )],
    }
}
