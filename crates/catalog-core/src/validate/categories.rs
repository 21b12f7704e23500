use serde_json::Value;

use super::{
    check_related_list, is_filled_string, is_present, validate_slug, RelatedList, SlugKind,
    ValidationError, ValidationResult,
};

const REQUIRED_FIELDS: &[&str] = &["slug", "title", "icon", "description"];

/// Validate a list of raw category records as a whole taxonomy.
///
/// `related` entries are resolved against the slugs declared in the same list.
pub fn validate_categories(entries: &[Value]) -> ValidationResult {
    let known: Vec<&str> = entries
        .iter()
        .filter_map(|entry| entry.get("slug").and_then(Value::as_str))
        .collect();

    let mut issues = Vec::new();
    for entry in entries {
        let slug = entry.get("slug").and_then(Value::as_str);
        if let Some(slug) = slug {
            issues.extend(validate_slug(slug, SlugKind::Category));
        }
        issues.extend(check_category(entry, slug.unwrap_or_default(), &known));
    }
    ValidationResult::from_issues(issues)
}

fn check_category(entry: &Value, slug: &str, known: &[&str]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for field in REQUIRED_FIELDS {
        if !is_filled_string(entry.get(*field)) {
            errors.push(ValidationError::error(
                *field,
                format!("Category '{slug}' missing required '{field}' field"),
            ));
        }
    }

    if let Some(related) = entry.get("related").filter(|v| is_present(Some(*v))) {
        let list = RelatedList {
            field: "related",
            owner: slug,
            owner_slug: Some(slug),
            entity: "Category",
            list_name: "related categories",
            valid_name: "categories",
            slug_kind: SlugKind::Category,
        };
        errors.extend(check_related_list(&list, related, known));
    }

    errors
}
