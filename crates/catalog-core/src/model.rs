use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Active,
    Maintenance,
    Deprecated,
    /// Status absent from the metadata.
    Unknown,
}

impl ToolStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            "maintenance" => Self::Maintenance,
            "deprecated" => Self::Deprecated,
            _ => Self::Unknown,
        }
    }
}

/// `type` may be written as a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolType {
    One(String),
    Many(Vec<String>),
}

/// An admitted tool: one per valid tool document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// File name without the `.md` extension.
    pub slug: String,
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub status: ToolStatus,
    #[serde(default)]
    pub standards: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub license: Option<String>,
    pub repository: Option<String>,
    pub website: Option<String>,
    pub documentation: Option<String>,
    pub demo: Option<String>,
    pub developer: Option<String>,
    pub maintained_by: Option<String>,
    pub main_contributor: Option<String>,
    pub technology: Option<String>,
    pub language: Option<String>,
    #[serde(rename = "type")]
    pub tool_type: Option<ToolType>,
    pub first_release: Option<String>,
    pub last_updated: Option<String>,
}

impl Tool {
    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c == slug)
    }

    pub fn supports_standard(&self, slug: &str) -> bool {
        self.standards.iter().any(|s| s == slug)
    }
}
