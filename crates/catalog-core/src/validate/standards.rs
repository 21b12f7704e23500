use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use super::{
    check_related_list, duplicate_entries, entry_label, is_filled_string, is_present,
    validate_slug, RelatedList, SlugKind, ValidationError, ValidationResult,
};
use crate::standards::StandardRegistry;

const REQUIRED_FIELDS: &[&str] = &[
    "title",
    "icon",
    "domain",
    "purpose",
    "format_technology",
    "maintainer_origin",
    "status",
];

/// Validate raw standard records keyed by slug. `description` is optional and never
/// checked.
pub fn validate_standards(entries: &BTreeMap<String, Value>) -> ValidationResult {
    let known: Vec<&str> = entries.keys().map(String::as_str).collect();

    let mut issues = Vec::new();
    for (slug, entry) in entries {
        issues.extend(validate_slug(slug, SlugKind::Standard));
        issues.extend(check_standard(slug, entry, &known));
    }
    ValidationResult::from_issues(issues)
}

fn check_standard(slug: &str, entry: &Value, known: &[&str]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if !is_filled_string(entry.get(*field)) {
            errors.push(ValidationError::error(
                *field,
                format!("Standard '{slug}' missing required '{field}' field in standards.yaml"),
            ));
        }
    }

    if let Some(related) = entry
        .get("related_standards")
        .filter(|v| is_present(Some(*v)))
    {
        let list = RelatedList {
            field: "related_standards",
            owner: slug,
            owner_slug: Some(slug),
            entity: "Standard",
            list_name: "related_standards",
            valid_name: "standards",
            slug_kind: SlugKind::Standard,
        };
        errors.extend(check_related_list(&list, related, known));
    }

    errors
}

/// Cross-check the `standards` list of a tool's metadata against the registry.
///
/// The field is optional: absence yields nothing, an empty list only a warning.
pub fn check_tool_standards(
    meta: &Map<String, Value>,
    registry: &StandardRegistry,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(value) = meta.get("standards").filter(|v| is_present(Some(*v))) else {
        return errors;
    };

    let Value::Array(entries) = value else {
        errors.push(ValidationError::error(
            "standards",
            "Field \"standards\" must be an array",
        ));
        return errors;
    };

    if entries.is_empty() {
        errors.push(ValidationError::warning(
            "standards",
            "Standards array is empty - tool will not appear in any standard page",
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
        let mut valid: Vec<&str> = known.into_iter().collect();
        valid.sort_unstable();
        errors.push(ValidationError::error(
            "standards",
            format!(
                "Unknown standards: {}\n   Valid standards are: {}\n   Add missing standards to standards.yaml",
                unknown.join(", "),
                valid.join(", ")
            ),
        ));
    }

    let duplicates = duplicate_entries(entries);
    if !duplicates.is_empty() {
        errors.push(ValidationError::error(
            "standards",
            format!("Duplicate standards found: {}", duplicates.join(", ")),
        ));
    }

    for slug in entries.iter().filter_map(Value::as_str) {
        errors.extend(validate_slug(slug, SlugKind::Standard));
    }

    errors
}
