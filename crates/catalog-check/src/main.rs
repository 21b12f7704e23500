mod config;
mod error;

use catalog_core::blog::{self, BlogPost};
use catalog_core::blog_tags::BlogTagDictionary;
use catalog_core::categories::CategoryRegistry;
use catalog_core::counts::{self, CatalogStats, NavItem};
use catalog_core::loader::ToolLoader;
use catalog_core::report::Reporter;
use catalog_core::standards::{StandardPage, StandardRegistry};
use catalog_core::tags::{ResolvedTag, TagResolver};
use catalog_core::validate::Taxonomies;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::AppError;

/// What a successful check prints to stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogSummary {
    stats: CatalogStats,
    category_nav: Vec<NavItem>,
    standard_nav: Vec<NavItem>,
    standard_pages: Vec<StandardPage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    posts: Vec<PostSummary>,
}

#[derive(Debug, Serialize)]
struct PostSummary {
    #[serde(flatten)]
    post: BlogPost,
    resolved_tags: Vec<ResolvedTag>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting catalog check");

    let config = Config::from_env()?;
    info!(
        tools_dir = %config.tools_dir.display(),
        standards_file = %config.standards_file.display(),
        posture = ?config.posture,
        "configuration loaded"
    );

    let summary = run(&config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run(config: &Config) -> Result<CatalogSummary, AppError> {
    let reporter = Reporter::tracing(config.posture);

    let categories = match &config.categories_file {
        Some(path) => CategoryRegistry::load(path)?,
        None => CategoryRegistry::builtin(),
    };
    reporter.handle("categories", &categories.validate())?;

    let standards = StandardRegistry::load(&config.standards_file)?;
    reporter.handle("standards.yaml", &standards.validate())?;
    info!(
        categories = categories.len(),
        standards = standards.len(),
        "taxonomies loaded"
    );

    let loader = ToolLoader::new(Taxonomies::new(&categories, &standards), reporter);
    let tools = loader.load_dir(&config.tools_dir)?;

    let stats = counts::catalog_stats(&tools, &categories);
    info!(
        tools = stats.tools.total,
        active = stats.tools.active,
        categories_with_tools = stats.categories.with_tools,
        standards_referenced = stats.standards.total,
        "catalog loaded"
    );

    let blog_tags = match &config.blog_tags_file {
        Some(path) => BlogTagDictionary::load(path)?,
        None => BlogTagDictionary::default(),
    };
    let resolver = TagResolver::new(&categories, &standards, &blog_tags);

    let posts = match &config.blog_dir {
        Some(dir) => {
            let today = chrono::Local::now().date_naive();
            let posts = blog::load_blog_posts(dir, today, config.preview)?;
            info!(posts = posts.len(), preview = config.preview, "blog posts loaded");
            posts
                .into_iter()
                .map(|post| PostSummary {
                    resolved_tags: post.resolved_tags(&resolver),
                    post,
                })
                .collect()
        }
        None => Vec::new(),
    };

    Ok(CatalogSummary {
        category_nav: counts::category_nav(&tools, &categories),
        standard_nav: counts::standard_nav(&tools, &standards),
        standard_pages: standards.pages(),
        stats,
        posts,
    })
}
