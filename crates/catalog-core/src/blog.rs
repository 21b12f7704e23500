/// Blog posts: `*.md` documents with a metadata block, published newest first.
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::frontmatter;
use crate::tags::{ResolvedTag, TagResolver};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%B %-d, %Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub url: String,
    pub date: NaiveDate,
    /// `date` as shown to readers, e.g. `January 15, 2025`.
    pub date_label: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub excerpt: Option<String>,
    pub publish_date: Option<NaiveDate>,
}

impl BlogPost {
    pub fn resolved_tags(&self, resolver: &TagResolver<'_>) -> Vec<ResolvedTag> {
        resolver.resolve_all(&self.tags)
    }

    fn is_visible(&self, today: NaiveDate, preview: bool) -> bool {
        preview || self.publish_date.is_none_or(|publish| publish <= today)
    }
}

/// Load the visible posts of `dir`, newest first.
///
/// Posts with `published: false` are always dropped. Posts whose `publishDate` lies
/// after `today` are dropped unless `preview` is set.
pub fn load_blog_posts(
    dir: &Path,
    today: NaiveDate,
    preview: bool,
) -> Result<Vec<BlogPost>, CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CatalogError::io(dir, e))?.path();
        if path.extension().is_some_and(|ext| ext == "md") && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut posts = Vec::new();
    for path in paths {
        let content =
            std::fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(post) = parse_post(&stem, &content) else {
            continue;
        };
        if post.is_visible(today, preview) {
            posts.push(post);
        } else {
            debug!(post = %stem, "scheduled post hidden");
        }
    }

    posts.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(posts)
}

/// Build a post from one document. `None` for unpublished posts and for posts
/// without a usable title or date.
pub fn parse_post(stem: &str, content: &str) -> Option<BlogPost> {
    let source = format!("{stem}.md");
    let meta = frontmatter::parse_metadata(content, &source);

    if meta.get("published") == Some(&Value::Bool(false)) {
        debug!(post = stem, "unpublished post skipped");
        return None;
    }

    let Some(title) = text(&meta, "title").filter(|t| !t.trim().is_empty()) else {
        warn!(post = stem, "blog post has no title");
        return None;
    };
    let Some(date) = text(&meta, "date").as_deref().and_then(parse_date) else {
        warn!(post = stem, "blog post has no valid date");
        return None;
    };

    let publish_date = text(&meta, "publishDate").and_then(|raw| {
        parse_date(&raw).or_else(|| {
            warn!(post = stem, publish_date = %raw, "ignoring unparsable publishDate");
            None
        })
    });

    let description = text(&meta, "description").unwrap_or_default();
    let excerpt = frontmatter::split(content)
        .and_then(|split| excerpt(split.body))
        .or_else(|| Some(description.clone()).filter(|d| !d.is_empty()));

    Some(BlogPost {
        title,
        url: format!("/blog/posts/{stem}"),
        date,
        date_label: date.format(DISPLAY_FORMAT).to_string(),
        author: text(&meta, "author"),
        tags: meta
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(scalar_text).collect())
            .unwrap_or_default(),
        description,
        excerpt,
        publish_date,
    })
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

/// The body up to the first `---` line, when the body has one.
fn excerpt(body: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in body.lines() {
        if line.trim_end() == "---" {
            let text = lines.join("\n").trim().to_string();
            return Some(text).filter(|t| !t.is_empty());
        }
        lines.push(line);
    }
    None
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
