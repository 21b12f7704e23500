use std::sync::LazyLock;

use regex::Regex;

use super::ValidationError;

static INVALID_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9-]").expect("valid regex"));

/// Which taxonomy a slug belongs to. Decides the reported field and message prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugKind {
    Category,
    Standard,
}

impl SlugKind {
    fn field(self) -> &'static str {
        match self {
            SlugKind::Category => "slug",
            SlugKind::Standard => "standards",
        }
    }

    fn label(self) -> &'static str {
        match self {
            SlugKind::Category => "Category",
            SlugKind::Standard => "Standard",
        }
    }
}

/// Check a taxonomy slug for lowercase kebab-case.
///
/// All four rules are evaluated independently, so one malformed slug can yield
/// several errors.
pub fn validate_slug(slug: &str, kind: SlugKind) -> Vec<ValidationError> {
    let field = kind.field();
    let label = kind.label();
    let mut errors = Vec::new();

    if slug != slug.to_lowercase() {
        errors.push(ValidationError::error(
            field,
            format!("{label} slug '{slug}' must be lowercase"),
        ));
    }

    if INVALID_SLUG_CHARS.is_match(slug) {
        errors.push(ValidationError::error(
            field,
            format!(
                "{label} slug '{slug}' contains invalid characters (only lowercase letters, numbers, and hyphens allowed)"
            ),
        ));
    }

    if slug.starts_with('-') || slug.ends_with('-') {
        errors.push(ValidationError::error(
            field,
            format!("{label} slug '{slug}' cannot start or end with a hyphen"),
        ));
    }

    if slug.contains("--") {
        errors.push(ValidationError::error(
            field,
            format!("{label} slug '{slug}' contains consecutive hyphens (use single hyphens)"),
        ));
    }

    errors
}
