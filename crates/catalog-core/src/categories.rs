/// Category taxonomy.
///
/// The slug is the only canonical identifier for a category: it is what tool
/// metadata lists under `categories`, what appears in `/categories/{slug}` URLs, and
/// the key of every per-category count. The order of the registry is the display
/// order of every category listing.
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;
use crate::validate::{self, ValidationResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub title: String,
    pub icon: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
}

impl Category {
    pub fn new(slug: &str, title: &str, icon: &str, description: &str) -> Self {
        Self {
            slug: slug.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
            description: description.to_string(),
            related: Vec::new(),
        }
    }

    pub fn with_related(mut self, related: &[&str]) -> Self {
        self.related = related.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Lenient conversion from an unchecked record. Missing or mistyped fields
    /// become empty; the validator is responsible for reporting them.
    fn from_raw(raw: &Value) -> Option<Self> {
        let text = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let slug = raw.get("slug").and_then(Value::as_str)?.to_string();
        let related = raw
            .get("related")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            slug,
            title: text("title"),
            icon: text("icon"),
            description: text("description"),
            related,
        })
    }
}

/// (slug, title, icon, description, related)
const BUILTIN: &[(&str, &str, &str, &str, &[&str])] = &[
    (
        "validators",
        "Validators",
        "✓",
        "Schema validation and business rule checking tools",
        &["data-quality", "testing"],
    ),
    (
        "converters",
        "Converters & Transformers",
        "⇄",
        "Format conversion and data transformation utilities",
        &["version-tools"],
    ),
    (
        "version-tools",
        "Version Upgrade Tools",
        "⬆",
        "Migration and compatibility utilities",
        &["converters"],
    ),
    (
        "sdks",
        "SDKs & Libraries",
        "📦",
        "Programming language bindings and libraries",
        &["development"],
    ),
    (
        "reference-implementations",
        "Reference Implementations",
        "🎯",
        "Working examples and demo applications",
        &["sdks"],
    ),
    (
        "development",
        "Development Tools",
        "🛠",
        "Browsers, editors, and generators",
        &[],
    ),
    (
        "data-quality",
        "Data Quality Tools",
        "📊",
        "Validation, enrichment, and cleaning",
        &["validators"],
    ),
    (
        "testing",
        "Testing Utilities",
        "🧪",
        "Test data generation and validation",
        &[],
    ),
    (
        "metadata",
        "Metadata Tools",
        "🏷",
        "Catalog generation and discovery",
        &[],
    ),
    (
        "route-planners",
        "Route Planners",
        "🗺️",
        "Intermodal travel information system",
        &[],
    ),
    (
        "references",
        "References",
        "📚",
        "Technical documentation, specifications, and implementation guides for mobility data standards and systems",
        &[],
    ),
];

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    source: Vec<Value>,
}

impl CategoryRegistry {
    /// The catalog's own category taxonomy.
    pub fn builtin() -> Self {
        Self::from_categories(
            BUILTIN
                .iter()
                .map(|(slug, title, icon, description, related)| {
                    Category::new(slug, title, icon, description).with_related(related)
                })
                .collect(),
        )
    }

    pub fn from_categories(categories: Vec<Category>) -> Self {
        let source = categories
            .iter()
            .filter_map(|c| serde_json::to_value(c).ok())
            .collect();
        Self { categories, source }
    }

    /// Parse a YAML sequence of category records. Records without a string `slug`
    /// are kept for validation but are not resolvable.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let source: Vec<Value> = if yaml.trim().is_empty() {
            Vec::new()
        } else {
            serde_yaml::from_str(yaml)?
        };
        let categories = source.iter().filter_map(Category::from_raw).collect();
        Ok(Self { categories, source })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_yaml_str(&content).map_err(|e| CatalogError::yaml(path, e))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    /// Slugs in display order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.slug.as_str())
    }

    pub fn get(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.get(slug).is_some()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The records as declared, before any typing.
    pub fn source(&self) -> &[Value] {
        &self.source
    }

    pub fn validate(&self) -> ValidationResult {
        validate::validate_categories(&self.source)
    }
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_taxonomy_is_valid() {
        let registry = CategoryRegistry::builtin();
        let result = registry.validate();
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(registry.len(), 11);
    }

    #[test]
    fn builtin_order_is_display_order() {
        let registry = CategoryRegistry::builtin();
        let slugs: Vec<_> = registry.slugs().take(3).collect();
        assert_eq!(slugs, vec!["validators", "converters", "version-tools"]);
    }

    #[test]
    fn builtin_never_relates_to_itself() {
        for category in CategoryRegistry::builtin().iter() {
            assert!(!category.related.contains(&category.slug), "{}", category.slug);
        }
    }

    #[test]
    fn lookup_by_slug() {
        let registry = CategoryRegistry::builtin();
        assert_eq!(registry.get("data-quality").map(|c| c.title.as_str()), Some("Data Quality Tools"));
        assert!(registry.get("Data-Quality").is_none());
        assert!(!registry.contains("unknown"));
    }

    #[test]
    fn yaml_records_keep_raw_shape_for_validation() {
        let yaml = r#"
- slug: validators
  title: Validators
  icon: "✓"
  description: Schema validation
  related: converters
- title: Orphan
"#;
        let registry = CategoryRegistry::from_yaml_str(yaml).expect("valid yaml");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.source().len(), 2);

        let result = registry.validate();
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "related" && e.message.contains("must be an array")));
        assert!(result.errors.iter().any(|e| e.field == "slug"));
    }

    #[test]
    fn empty_yaml_is_empty_registry() {
        let registry = CategoryRegistry::from_yaml_str("  \n").expect("empty is fine");
        assert!(registry.is_empty());
    }
}
