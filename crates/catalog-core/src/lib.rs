pub mod blog;
pub mod blog_tags;
pub mod cache;
pub mod categories;
pub mod counts;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod model;
pub mod report;
pub mod standards;
pub mod tags;
pub mod validate;
