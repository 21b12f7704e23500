/// Standard taxonomy, loaded from a YAML map of `slug -> record`.
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CatalogError;
use crate::validate::{self, ValidationResult};

const DEFAULT_ICON: &str = "📄";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standard {
    pub title: String,
    #[serde(rename = "longTitle", default, skip_serializing_if = "Option::is_none")]
    pub long_title: Option<String>,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub domain: String,
    pub purpose: String,
    pub format_technology: String,
    pub maintainer_origin: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_standards: Vec<String>,
    #[serde(default)]
    pub endorsed: bool,
}

impl Standard {
    fn from_raw(raw: &Value) -> Self {
        let text = |key: &str| {
            raw.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let optional = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            title: text("title"),
            long_title: optional("longTitle"),
            icon: text("icon"),
            description: optional("description"),
            domain: text("domain"),
            purpose: text("purpose"),
            format_technology: text("format_technology"),
            maintainer_origin: text("maintainer_origin"),
            status: text("status"),
            link: optional("link"),
            related_standards: raw
                .get("related_standards")
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            endorsed: raw.get("endorsed").and_then(Value::as_bool).unwrap_or(false),
        }
    }
}

/// Display data for a standard slug, with a fallback for unregistered slugs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardMetadata {
    pub title: String,
    pub icon: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedStandard {
    pub slug: String,
    pub title: String,
}

/// Route data for one `/standards/{slug}` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardPage {
    pub slug: String,
    pub title: String,
    pub page_title: String,
    pub related: Vec<RelatedStandard>,
}

#[derive(Debug, Clone, Default)]
pub struct StandardRegistry {
    standards: BTreeMap<String, Standard>,
    source: BTreeMap<String, Value>,
}

impl StandardRegistry {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let source: BTreeMap<String, Value> = if yaml.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_yaml::from_str(yaml)?
        };
        let standards = source
            .iter()
            .map(|(slug, raw)| (slug.clone(), Standard::from_raw(raw)))
            .collect();
        Ok(Self { standards, source })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let registry = Self::from_yaml_str(&content).map_err(|e| CatalogError::yaml(path, e))?;
        tracing::debug!(path = %path.display(), standards = registry.len(), "standards loaded");
        Ok(registry)
    }

    pub fn get(&self, slug: &str) -> Option<&Standard> {
        self.standards.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.standards.contains_key(slug)
    }

    /// Slugs in ascending order.
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.standards.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Standard)> {
        self.standards.iter().map(|(slug, s)| (slug.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.standards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standards.is_empty()
    }

    pub fn source(&self) -> &BTreeMap<String, Value> {
        &self.source
    }

    pub fn validate(&self) -> ValidationResult {
        validate::validate_standards(&self.source)
    }

    pub fn metadata(&self, slug: &str) -> StandardMetadata {
        match self.get(slug) {
            Some(standard) => StandardMetadata {
                title: standard.title.clone(),
                icon: standard.icon.clone(),
                description: standard.description.clone(),
            },
            None => StandardMetadata {
                title: slug.to_string(),
                icon: DEFAULT_ICON.to_string(),
                description: None,
            },
        }
    }

    /// Title of a standard, or the slug itself when it is not registered or untitled.
    pub fn title_or_slug<'a>(&'a self, slug: &'a str) -> &'a str {
        self.get(slug)
            .map(|s| s.title.as_str())
            .filter(|title| !title.is_empty())
            .unwrap_or(slug)
    }

    pub fn pages(&self) -> Vec<StandardPage> {
        self.iter()
            .map(|(slug, standard)| {
                let title = self.title_or_slug(slug).to_string();
                StandardPage {
                    slug: slug.to_string(),
                    page_title: format!("Tools supporting {title}"),
                    title,
                    related: standard
                        .related_standards
                        .iter()
                        .map(|related| RelatedStandard {
                            slug: related.clone(),
                            title: self.title_or_slug(related).to_string(),
                        })
                        .collect(),
                }
            })
            .collect()
    }
}
