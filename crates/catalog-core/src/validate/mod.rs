/// Metadata validation.
///
/// Every validator in this module is a pure function over loosely typed metadata
/// (`serde_json::Value`) and never fails: problems are collected as
/// `ValidationError`s and split into a `ValidationResult`. Escalating a result to a
/// build failure is the job of [`crate::report`].
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod categories;
pub mod slug;
pub mod standards;
pub mod tools;

pub use categories::validate_categories;
pub use slug::{validate_slug, SlugKind};
pub use standards::{check_tool_standards, validate_standards};
pub use tools::{validate_tool, Taxonomies, VALID_STATUSES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// Outcome of a validation pass. `valid` is true iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// A result with nothing to report.
    pub fn clean() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn from_issues(issues: Vec<ValidationError>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) = issues
            .into_iter()
            .partition(|issue| issue.severity == Severity::Error);
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

/// Truthiness of an optional metadata value: absent, `null`, `false`, `0` and `""`
/// count as missing.
pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// True when the value is a string with non-whitespace content.
pub(crate) fn is_filled_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.trim().is_empty())
}

pub(crate) fn entry_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Entries that occur more than once, each reported once, in order of their first
/// repeated occurrence.
pub(crate) fn duplicate_entries(entries: &[Value]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut reported: HashSet<String> = HashSet::new();
    let mut duplicates = Vec::new();
    for entry in entries {
        let label = entry_label(entry);
        if !seen.insert(label.clone()) && reported.insert(label.clone()) {
            duplicates.push(label);
        }
    }
    duplicates
}

/// Shape of a `related`-style cross-reference list inside a taxonomy entry.
pub(crate) struct RelatedList<'a> {
    pub field: &'static str,
    pub owner: &'a str,
    pub owner_slug: Option<&'a str>,
    pub entity: &'static str,
    pub list_name: &'static str,
    pub valid_name: &'static str,
    pub slug_kind: SlugKind,
}

/// Checks a `related` list against the set of known slugs: array shape, unknown
/// entries, self-reference, duplicates, and the slug format of every entry.
pub(crate) fn check_related_list(
    list: &RelatedList<'_>,
    value: &Value,
    known: &[&str],
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let owner = format!("{} '{}'", list.entity, list.owner);

    let Value::Array(entries) = value else {
        errors.push(ValidationError::error(
            list.field,
            format!("{owner} has invalid '{}' field - must be an array", list.field),
        ));
        return errors;
    };

    let known_set: HashSet<&str> = known.iter().copied().collect();
    let unknown: Vec<String> = entries
        .iter()
        .filter(|entry| !entry.as_str().is_some_and(|s| known_set.contains(s)))
        .map(entry_label)
        .collect();
    if !unknown.is_empty() {
        let mut valid: Vec<&str> = known.to_vec();
        valid.sort_unstable();
        errors.push(ValidationError::error(
            list.field,
            format!(
                "{owner} has invalid {}: {}\n   Valid {} are: {}",
                list.list_name,
                unknown.join(", "),
                list.valid_name,
                valid.join(", ")
            ),
        ));
    }

    if let Some(slug) = list.owner_slug {
        if entries.iter().any(|entry| entry.as_str() == Some(slug)) {
            errors.push(ValidationError::error(
                list.field,
                format!("{owner} cannot reference itself in {}", list.list_name),
            ));
        }
    }

    let duplicates = duplicate_entries(entries);
    if !duplicates.is_empty() {
        errors.push(ValidationError::error(
            list.field,
            format!("{owner} has duplicate {}: {}", list.list_name, duplicates.join(", ")),
        ));
    }

    for entry in entries.iter().filter_map(Value::as_str) {
        for err in validate_slug(entry, list.slug_kind) {
            errors.push(ValidationError {
                message: format!("{owner} {}: {}", list.field, err.message),
                ..err
            });
        }
    }

    errors
}
