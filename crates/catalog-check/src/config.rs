use std::path::PathBuf;

use catalog_core::report::Posture;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub tools_dir: PathBuf,
    pub standards_file: PathBuf,
    pub categories_file: Option<PathBuf>,
    pub blog_tags_file: Option<PathBuf>,
    pub blog_dir: Option<PathBuf>,
    pub posture: Posture,
    pub preview: bool,
}

impl Config {
    /// Required:
    /// - `CATALOG_TOOLS_DIR` (directory of tool documents)
    /// - `CATALOG_STANDARDS_FILE` (standards.yaml)
    ///
    /// Optional:
    /// - `CATALOG_CATEGORIES_FILE` (default: built-in category list)
    /// - `CATALOG_BLOG_TAGS_FILE`
    /// - `CATALOG_BLOG_DIR`
    /// - `CATALOG_ENV` (`production` aborts on the first invalid record)
    /// - `CATALOG_PREVIEW_MODE` (set to include scheduled blog posts)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let tools_dir = var("CATALOG_TOOLS_DIR").map(PathBuf::from).ok_or_else(|| {
            AppError::Config("CATALOG_TOOLS_DIR environment variable is required".to_string())
        })?;
        if !tools_dir.is_dir() {
            return Err(AppError::Config(format!(
                "tools directory not found: {}",
                tools_dir.display()
            )));
        }

        let standards_file = var("CATALOG_STANDARDS_FILE")
            .map(PathBuf::from)
            .ok_or_else(|| {
                AppError::Config(
                    "CATALOG_STANDARDS_FILE environment variable is required".to_string(),
                )
            })?;
        if !standards_file.is_file() {
            return Err(AppError::Config(format!(
                "standards file not found: {}",
                standards_file.display()
            )));
        }

        let path = |key: &str| var(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        Ok(Self {
            tools_dir,
            standards_file,
            categories_file: path("CATALOG_CATEGORIES_FILE"),
            blog_tags_file: path("CATALOG_BLOG_TAGS_FILE"),
            blog_dir: path("CATALOG_BLOG_DIR"),
            posture: var("CATALOG_ENV")
                .map(|env| Posture::parse(&env))
                .unwrap_or_default(),
            preview: var("CATALOG_PREVIEW_MODE").is_some(),
        })
    }
}
