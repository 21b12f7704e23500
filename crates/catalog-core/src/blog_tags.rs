/// Free-text blog tag dictionary (`slug -> {title}`), the last resort of tag resolution.
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogTag {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct BlogTagDictionary {
    tags: BTreeMap<String, BlogTag>,
}

impl BlogTagDictionary {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let tags = serde_yaml::from_str(yaml)?;
        Ok(Self { tags })
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_yaml_str(&content).map_err(|e| CatalogError::yaml(path, e))
    }

    pub fn get(&self, slug: &str) -> Option<&BlogTag> {
        self.tags.get(slug)
    }

    /// Display title for a tag; the slug itself when the tag is unknown or untitled.
    pub fn title<'a>(&'a self, slug: &'a str) -> &'a str {
        self.get(slug)
            .map(|tag| tag.title.as_str())
            .filter(|title| !title.is_empty())
            .unwrap_or(slug)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl FromIterator<(String, BlogTag)> for BlogTagDictionary {
    fn from_iter<I: IntoIterator<Item = (String, BlogTag)>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tag_uses_title() {
        let tags = BlogTagDictionary::from_yaml_str("technical:\n  title: Technical\n").expect("yaml");
        assert_eq!(tags.title("technical"), "Technical");
    }

    #[test]
    fn unknown_or_untitled_tag_falls_back_to_slug() {
        let tags = BlogTagDictionary::from_yaml_str("release: {}\n").expect("yaml");
        assert_eq!(tags.title("release"), "release");
        assert_eq!(tags.title("unknown-tag"), "unknown-tag");
    }

    #[test]
    fn rejects_non_mapping_document() {
        assert!(BlogTagDictionary::from_yaml_str("- technical\n").is_err());
    }
}
