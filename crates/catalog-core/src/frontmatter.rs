/// Metadata blocks at the head of markdown documents.
///
/// A block is recognised only when the document opens with a `---` line and a
/// second `---` line closes the YAML, followed by the body. Anything else means the
/// document has no metadata.
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::error;

static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---\r?\n(.*)\z").expect("valid regex")
});

/// A document split into its raw metadata block and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    pub yaml: &'a str,
    pub body: &'a str,
}

pub fn split(content: &str) -> Option<Split<'_>> {
    let caps = FRONTMATTER.captures(content)?;
    Some(Split {
        yaml: caps.get(1)?.as_str(),
        body: caps.get(2)?.as_str(),
    })
}

/// Parse the metadata block of `content` into an untyped map.
///
/// Missing blocks, YAML that does not parse, and YAML that is not a mapping all
/// yield an empty map; the latter two are logged against `source`.
pub fn parse_metadata(content: &str, source: &str) -> Map<String, Value> {
    let Some(split) = split(content) else {
        return Map::new();
    };

    match serde_yaml::from_str::<Value>(split.yaml) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Map::new(),
        Ok(other) => {
            error!(source, kind = value_kind(&other), "metadata block is not a mapping");
            Map::new()
        }
        Err(e) => {
            error!(source, error = %e, "error parsing YAML front matter");
            Map::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn basic_block() {
        let input = "---\ntitle: DATEX II Browser\ncategories:\n  - development\n---\n# Heading\nBody";
        let meta = parse_metadata(input, "datex-browser.md");
        assert_eq!(meta["title"], json!("DATEX II Browser"));
        assert_eq!(meta["categories"], json!(["development"]));
        assert_eq!(split(input).map(|s| s.body), Some("# Heading\nBody"));
    }

    #[test]
    fn crlf_line_endings() {
        let input = "---\r\ntitle: X\r\n---\r\nBody";
        assert_eq!(parse_metadata(input, "x.md")["title"], json!("X"));
    }

    #[test]
    fn dates_stay_strings() {
        let input = "---\nlastUpdated: 2024-05-01\n---\n";
        assert_eq!(parse_metadata(input, "x.md")["lastUpdated"], json!("2024-05-01"));
    }

    #[test]
    fn no_block_is_empty() {
        assert!(parse_metadata("# Title\nBody", "x.md").is_empty());
    }

    #[test]
    fn block_must_open_the_document() {
        assert!(parse_metadata("\n---\ntitle: X\n---\n", "x.md").is_empty());
    }

    #[test]
    fn unterminated_block_is_empty() {
        assert!(parse_metadata("---\ntitle: X\n", "x.md").is_empty());
    }

    #[test]
    fn invalid_yaml_is_empty() {
        assert!(parse_metadata("---\ntitle: [unclosed\n---\n", "x.md").is_empty());
    }

    #[test]
    fn non_mapping_yaml_is_empty() {
        assert!(parse_metadata("---\n- a\n- b\n---\n", "x.md").is_empty());
    }

    #[test]
    fn blank_block_is_empty() {
        assert!(parse_metadata("---\n\n---\nBody", "x.md").is_empty());
    }
}
