/// Tool documents to `Tool` records.
///
/// Every `*.md` file of the tools directory except `index.md` is a tool document.
/// A document becomes a `Tool` only when its metadata validates and carries both a
/// `title` and a non-empty `categories`; anything else is dropped after being
/// reported. There is no partial admission.
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::cache::ValidationCache;
use crate::error::CatalogError;
use crate::frontmatter;
use crate::model::{Tool, ToolStatus, ToolType};
use crate::report::Reporter;
use crate::validate::{is_present, Taxonomies};

const INDEX_FILE: &str = "index.md";

pub struct ToolLoader<'a> {
    taxonomies: Taxonomies<'a>,
    cache: &'a ValidationCache,
    reporter: Reporter,
}

impl<'a> ToolLoader<'a> {
    /// A loader backed by the process-wide validation cache.
    pub fn new(taxonomies: Taxonomies<'a>, reporter: Reporter) -> Self {
        Self::with_cache(taxonomies, ValidationCache::global(), reporter)
    }

    pub fn with_cache(
        taxonomies: Taxonomies<'a>,
        cache: &'a ValidationCache,
        reporter: Reporter,
    ) -> Self {
        Self {
            taxonomies,
            cache,
            reporter,
        }
    }

    /// Load every admissible tool document in `dir`, in file-name order.
    pub fn load_dir(&self, dir: &Path) -> Result<Vec<Tool>, CatalogError> {
        let files = tool_files(dir)?;
        let mut tools = Vec::with_capacity(files.len());

        for path in &files {
            let content =
                std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
            if let Some(tool) = self.load_document(path, &content)? {
                tools.push(tool);
            }
        }

        info!(
            dir = %dir.display(),
            documents = files.len(),
            admitted = tools.len(),
            "loaded tools"
        );
        Ok(tools)
    }

    /// Validate one document and build its `Tool` if it is admissible.
    ///
    /// Only a production-posture abort is an error; rejected documents are `Ok(None)`.
    pub fn load_document(&self, path: &Path, content: &str) -> Result<Option<Tool>, CatalogError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = frontmatter::parse_metadata(content, &file_name);

        let outcome =
            self.cache
                .validate_tool(&meta, &file_name, path, self.taxonomies, &self.reporter)?;

        if !outcome.admits() {
            if !outcome.is_cache_hit() {
                warn!(file = %file_name, "skipping tool due to validation errors");
            }
            return Ok(None);
        }

        if !is_present(meta.get("title")) || !has_categories(&meta) {
            debug!(file = %file_name, "skipping tool without title or categories");
            return Ok(None);
        }

        let slug = file_name
            .strip_suffix(".md")
            .unwrap_or(&file_name)
            .to_string();
        Ok(Some(tool_from_metadata(slug, &meta)))
    }
}

impl std::fmt::Debug for ToolLoader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolLoader")
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

fn tool_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CatalogError::io(dir, e))?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(".md") && name != INDEX_FILE && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `categories` must be truthy, and an empty list does not count.
fn has_categories(meta: &Map<String, Value>) -> bool {
    match meta.get("categories") {
        Some(Value::Array(entries)) => !entries.is_empty(),
        other => is_present(other),
    }
}

fn tool_from_metadata(slug: String, meta: &Map<String, Value>) -> Tool {
    let categories = match meta.get("categories") {
        Some(Value::Array(entries)) => entries.iter().filter_map(scalar_text).collect(),
        Some(value) => scalar_text(value).into_iter().collect(),
        None => Vec::new(),
    };

    let status = meta
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or(ToolStatus::Unknown, ToolStatus::parse);

    Tool {
        slug,
        title: text(meta, "title").unwrap_or_default(),
        description: text(meta, "description").unwrap_or_default(),
        categories,
        status,
        standards: text_list(meta, "standards"),
        tags: text_list(meta, "tags"),
        license: text(meta, "license"),
        repository: text(meta, "repository"),
        website: text(meta, "website"),
        documentation: text(meta, "documentation"),
        demo: text(meta, "demo"),
        developer: text(meta, "developer"),
        maintained_by: text(meta, "maintainedBy"),
        main_contributor: text(meta, "mainContributor"),
        technology: text(meta, "technology"),
        language: text(meta, "language"),
        tool_type: tool_type(meta.get("type")),
        first_release: text(meta, "firstRelease"),
        last_updated: text(meta, "lastUpdated"),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(meta: &Map<String, Value>, key: &str) -> Option<String> {
    meta.get(key).and_then(scalar_text)
}

fn text_list(meta: &Map<String, Value>, key: &str) -> Vec<String> {
    match meta.get(key) {
        Some(Value::Array(entries)) => entries.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}

fn tool_type(value: Option<&Value>) -> Option<ToolType> {
    match value? {
        Value::Array(entries) => Some(ToolType::Many(
            entries.iter().filter_map(scalar_text).collect(),
        )),
        other => scalar_text(other).map(ToolType::One),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::categories::{Category, CategoryRegistry};
    use crate::report::{MemorySink, Posture};
    use crate::standards::StandardRegistry;

    fn registries() -> (CategoryRegistry, StandardRegistry) {
        let categories = CategoryRegistry::from_categories(vec![
            Category::new("validators", "Validators", "✓", "d"),
            Category::new("converters", "Converters", "⇄", "d"),
        ]);
        let standards = StandardRegistry::from_yaml_str(
            "datex-ii:\n  title: DATEX II\n  icon: x\n  domain: d\n  purpose: p\n  format_technology: f\n  maintainer_origin: m\n  status: s\n",
        )
        .unwrap();
        (categories, standards)
    }

    fn load(content: &str) -> Option<Tool> {
        let (c, s) = registries();
        let cache = ValidationCache::new();
        let loader = ToolLoader::with_cache(
            Taxonomies::new(&c, &s),
            &cache,
            Reporter::new(Posture::Development, Arc::new(MemorySink::new())),
        );
        loader
            .load_document(Path::new("does-not-exist/tool.md"), content)
            .unwrap()
    }

    #[test]
    fn full_document_is_normalised() {
        let tool = load(
            "---\ntitle: DATEX II Browser\ndescription: Browse DATEX II\ncategories:\n  - validators\nstatus: active\nstandards: [datex-ii]\ntags: [web, 2024]\nmaintainedBy: NAP\ntype: [web, cli]\nfirstRelease: 2021\n---\nBody\n",
        )
        .expect("admitted");
        assert_eq!(tool.slug, "tool");
        assert_eq!(tool.categories, vec!["validators"]);
        assert_eq!(tool.status, ToolStatus::Active);
        assert_eq!(tool.standards, vec!["datex-ii"]);
        assert_eq!(tool.tags, vec!["web", "2024"]);
        assert_eq!(tool.maintained_by.as_deref(), Some("NAP"));
        assert_eq!(tool.first_release.as_deref(), Some("2021"));
        assert_eq!(
            tool.tool_type,
            Some(ToolType::Many(vec!["web".into(), "cli".into()]))
        );
    }

    #[test]
    fn missing_status_defaults_to_unknown() {
        let tool = load("---\ntitle: T\ndescription: D\ncategories: [converters]\n---\n")
            .expect("admitted");
        assert_eq!(tool.status, ToolStatus::Unknown);
        assert!(tool.standards.is_empty());
        assert!(tool.tags.is_empty());
    }

    #[test]
    fn scalar_category_is_rejected_by_validation() {
        assert!(load("---\ntitle: T\ndescription: D\ncategories: validators\n---\n").is_none());
    }

    #[test]
    fn scalar_category_normalises_to_list() {
        let meta = serde_json::json!({"title": "T", "categories": "validators"});
        let tool = tool_from_metadata("t".into(), meta.as_object().unwrap());
        assert_eq!(tool.categories, vec!["validators"]);
        assert_eq!(tool.tool_type, None);
    }

    #[test]
    fn empty_categories_are_excluded() {
        assert!(load("---\ntitle: X\ndescription: D\ncategories: []\n---\n").is_none());
    }

    #[test]
    fn unknown_category_is_excluded() {
        assert!(load("---\ntitle: T\ndescription: D\ncategories: [nope]\n---\n").is_none());
    }

    #[test]
    fn missing_metadata_is_excluded() {
        assert!(load("# Just prose\n").is_none());
    }
}
