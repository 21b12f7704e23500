/// Tag resolution across the category taxonomy, the standard taxonomy and the blog
/// tag dictionary.
///
/// Priority is fixed: category, then standard, then blog tag. Matching is exact and
/// case-sensitive. The `ResolvedTag` shape is consumed by every tag listing and
/// cross-link, so its serialized form (`slug`, `title`, `type`, `url`) is stable.
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::blog_tags::BlogTagDictionary;
use crate::categories::CategoryRegistry;
use crate::standards::StandardRegistry;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKind {
    Category,
    Standard,
    BlogTag,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTag {
    pub slug: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TagKind,
    pub url: String,
}

#[derive(Debug, Clone, Copy)]
pub struct TagResolver<'a> {
    categories: &'a CategoryRegistry,
    standards: &'a StandardRegistry,
    blog_tags: &'a BlogTagDictionary,
}

impl<'a> TagResolver<'a> {
    pub fn new(
        categories: &'a CategoryRegistry,
        standards: &'a StandardRegistry,
        blog_tags: &'a BlogTagDictionary,
    ) -> Self {
        Self {
            categories,
            standards,
            blog_tags,
        }
    }

    pub fn resolve(&self, tag: &str) -> ResolvedTag {
        if let Some(category) = self.categories.get(tag) {
            return ResolvedTag {
                slug: tag.to_string(),
                title: category.title.clone(),
                kind: TagKind::Category,
                url: format!("/categories/{tag}"),
            };
        }

        if let Some(standard) = self.standards.get(tag) {
            return ResolvedTag {
                slug: tag.to_string(),
                title: standard.title.clone(),
                kind: TagKind::Standard,
                url: format!("/standards/{tag}"),
            };
        }

        ResolvedTag {
            slug: tag.to_string(),
            title: self.blog_tags.title(tag).to_string(),
            kind: TagKind::BlogTag,
            url: format!("/blog?tag={}", urlencoding::encode(tag)),
        }
    }

    /// Resolve each tag independently; order and duplicates are preserved.
    pub fn resolve_all<S: AsRef<str>>(&self, tags: &[S]) -> Vec<ResolvedTag> {
        tags.iter().map(|tag| self.resolve(tag.as_ref())).collect()
    }
}

/// Turn free text into a URL slug: `"DATEX II"` becomes `"datex-ii"`.
pub fn create_slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(lowered.trim(), "-");
    NON_SLUG_CHARS.replace_all(&hyphenated, "").into_owned()
}
