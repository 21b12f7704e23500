/// Tool counts per taxonomy slug, the navigation items built from them, and the
/// catalog-wide statistics.
///
/// Counts are registry-driven: every registered slug is present, with `0` when no
/// tool references it. References to slugs outside the registry are not counted.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::categories::CategoryRegistry;
use crate::model::{Tool, ToolStatus};
use crate::standards::StandardRegistry;

pub fn category_counts(tools: &[Tool], categories: &CategoryRegistry) -> BTreeMap<String, usize> {
    count_by(categories.slugs(), tools, |tool| &tool.categories)
}

pub fn standard_counts(tools: &[Tool], standards: &StandardRegistry) -> BTreeMap<String, usize> {
    count_by(standards.slugs(), tools, |tool| &tool.standards)
}

fn count_by<'a>(
    slugs: impl Iterator<Item = &'a str>,
    tools: &[Tool],
    field: impl Fn(&Tool) -> &Vec<String>,
) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = slugs.map(|slug| (slug.to_string(), 0)).collect();
    for slug in tools.iter().flat_map(|tool| field(tool)) {
        if let Some(count) = counts.get_mut(slug) {
            *count += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub slug: String,
    pub title: String,
    pub link: String,
    pub count: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub endorsed: bool,
}

/// One item per category, in registry order.
pub fn category_nav(tools: &[Tool], categories: &CategoryRegistry) -> Vec<NavItem> {
    let counts = category_counts(tools, categories);
    categories
        .iter()
        .map(|category| NavItem {
            slug: category.slug.clone(),
            title: category.title.clone(),
            link: format!("/categories/{}", category.slug),
            count: counts.get(&category.slug).copied().unwrap_or_default(),
            endorsed: false,
        })
        .collect()
}

/// One item per standard: endorsed standards first, then by title ignoring case.
pub fn standard_nav(tools: &[Tool], standards: &StandardRegistry) -> Vec<NavItem> {
    let counts = standard_counts(tools, standards);
    let mut items: Vec<NavItem> = standards
        .iter()
        .map(|(slug, standard)| NavItem {
            slug: slug.to_string(),
            title: standards.title_or_slug(slug).to_string(),
            link: format!("/standards/{slug}"),
            count: counts.get(slug).copied().unwrap_or_default(),
            endorsed: standard.endorsed,
        })
        .collect();

    items.sort_by(|a, b| {
        b.endorsed
            .cmp(&a.endorsed)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            .then_with(|| a.slug.cmp(&b.slug))
    });
    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStats {
    pub total: usize,
    pub active: usize,
    pub maintenance: usize,
    pub deprecated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub total: usize,
    pub with_tools: usize,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandardStats {
    /// Distinct standards referenced by at least one tool.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub tools: ToolStats,
    pub categories: CategoryStats,
    pub standards: StandardStats,
}

pub fn catalog_stats(tools: &[Tool], categories: &CategoryRegistry) -> CatalogStats {
    let with_status = |status: ToolStatus| tools.iter().filter(|t| t.status == status).count();
    let counts = category_counts(tools, categories);
    let referenced: BTreeSet<&str> = tools
        .iter()
        .flat_map(|tool| tool.standards.iter().map(String::as_str))
        .collect();

    CatalogStats {
        tools: ToolStats {
            total: tools.len(),
            active: with_status(ToolStatus::Active),
            maintenance: with_status(ToolStatus::Maintenance),
            deprecated: with_status(ToolStatus::Deprecated),
        },
        categories: CategoryStats {
            total: categories.len(),
            with_tools: counts.values().filter(|count| **count > 0).count(),
            counts,
        },
        standards: StandardStats {
            total: referenced.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;

    fn tool(slug: &str, categories: &[&str], standards: &[&str], status: ToolStatus) -> Tool {
        Tool {
            slug: slug.into(),
            title: slug.to_uppercase(),
            description: String::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            status,
            standards: standards.iter().map(|s| s.to_string()).collect(),
            tags: Vec::new(),
            license: None,
            repository: None,
            website: None,
            documentation: None,
            demo: None,
            developer: None,
            maintained_by: None,
            main_contributor: None,
            technology: None,
            language: None,
            tool_type: None,
            first_release: None,
            last_updated: None,
        }
    }

    fn fixtures() -> (Vec<Tool>, CategoryRegistry, StandardRegistry) {
        let tools = vec![
            tool("a", &["validators", "testing"], &["datex-ii"], ToolStatus::Active),
            tool("b", &["validators"], &["datex-ii", "netex"], ToolStatus::Deprecated),
            tool("c", &["converters"], &[], ToolStatus::Unknown),
        ];
        let categories = CategoryRegistry::from_categories(vec![
            Category::new("validators", "Validators", "✓", "d"),
            Category::new("converters", "Converters", "⇄", "d"),
            Category::new("testing", "Testing", "t", "d"),
            Category::new("sdks", "SDKs", "s", "d"),
        ]);
        let standards = StandardRegistry::from_yaml_str(
            "netex:\n  title: NeTEx\ndatex-ii:\n  title: DATEX II\n  endorsed: true\nalert-c:\n  title: alert-C\nsiri:\n  title: SIRI\n",
        )
        .unwrap();
        (tools, categories, standards)
    }

    #[test]
    fn category_counts_are_registry_driven() {
        let (tools, categories, _) = fixtures();
        let counts = category_counts(&tools, &categories);
        assert_eq!(counts["validators"], 2);
        assert_eq!(counts["converters"], 1);
        assert_eq!(counts["testing"], 1);
        assert_eq!(counts["sdks"], 0);
        assert_eq!(counts.len(), 4);

        let total: usize = counts.values().sum();
        let referenced: usize = tools.iter().map(|t| t.categories.len()).sum();
        assert_eq!(total, referenced);
    }

    #[test]
    fn standard_counts_cover_full_registry() {
        let (tools, _, standards) = fixtures();
        let counts = standard_counts(&tools, &standards);
        assert_eq!(counts["datex-ii"], 2);
        assert_eq!(counts["netex"], 1);
        assert_eq!(counts["siri"], 0);
        assert_eq!(counts["alert-c"], 0);
    }

    #[test]
    fn unregistered_references_are_ignored() {
        let (mut tools, categories, _) = fixtures();
        tools.push(tool("d", &["ghost"], &[], ToolStatus::Active));
        let counts = category_counts(&tools, &categories);
        assert!(!counts.contains_key("ghost"));
    }

    #[test]
    fn category_nav_keeps_registry_order() {
        let (tools, categories, _) = fixtures();
        let nav = category_nav(&tools, &categories);
        let slugs: Vec<_> = nav.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(slugs, ["validators", "converters", "testing", "sdks"]);
        assert_eq!(nav[0].link, "/categories/validators");
        assert_eq!(nav[0].count, 2);
    }

    #[test]
    fn standard_nav_hoists_endorsed_then_sorts_by_title() {
        let (tools, _, standards) = fixtures();
        let nav = standard_nav(&tools, &standards);
        let titles: Vec<_> = nav.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["DATEX II", "alert-C", "NeTEx", "SIRI"]);
        assert!(nav[0].endorsed);
        assert_eq!(nav[0].link, "/standards/datex-ii");
        assert_eq!(nav[3].count, 0);
    }

    #[test]
    fn stats_summarise_catalog() {
        let (tools, categories, _) = fixtures();
        let stats = catalog_stats(&tools, &categories);
        assert_eq!(
            stats.tools,
            ToolStats {
                total: 3,
                active: 1,
                maintenance: 0,
                deprecated: 1
            }
        );
        assert_eq!(stats.categories.total, 4);
        assert_eq!(stats.categories.with_tools, 3);
        assert_eq!(stats.standards.total, 2);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["categories"]["withTools"], 3);
    }
}
