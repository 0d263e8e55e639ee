//! The classify module assigns every legacy page URL a category on the new site.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

/// Content grouping a legacy URL is routed to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Writing,
    Design,
    VibeCoding,
    Productivity,
    /// General fallback, redirected without a category filter.
    All,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Writing,
        Category::Design,
        Category::VibeCoding,
        Category::Productivity,
        Category::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Writing => "writing",
            Category::Design => "design",
            Category::VibeCoding => "vibe-coding",
            Category::Productivity => "productivity",
            Category::All => "all",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == input.to_lowercase())
            .ok_or_else(|| format!("Invalid category: {input}"))
    }
}

/// Outcome of classifying one page URL.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Classification {
    /// The page has no counterpart on the new site (the bare homepage).
    Skip,
    Category(Category),
}

/// A category together with the keywords that select it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords
                .iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
        }
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| haystack.contains(keyword.as_str()))
    }
}

/// A tool from the directory catalog, identified by its URL slug.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CatalogTool {
    pub slug: String,
    pub category: Category,
}

impl CatalogTool {
    pub fn new(slug: &str, category: Category) -> Self {
        Self {
            slug: slug.to_lowercase(),
            category,
        }
    }

    fn matches_segment(&self, segment: &str) -> bool {
        segment == self.slug
            || segment
                .strip_prefix(self.slug.as_str())
                .is_some_and(|rest| rest.starts_with('-'))
    }
}

static DEFAULT_RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        CategoryRule::new(
            Category::Writing,
            &["writing", "copy", "content", "blog", "seo", "article"],
        ),
        CategoryRule::new(
            Category::Design,
            &["design", "video", "image", "graphic", "art", "photo"],
        ),
        CategoryRule::new(
            Category::VibeCoding,
            &[
                "coding", "dev", "code", "program", "software", "app", "web", "build",
            ],
        ),
        CategoryRule::new(
            Category::Productivity,
            &["product", "tool", "automat", "workflow"],
        ),
    ]
});

static DEFAULT_CATALOG: Lazy<Vec<CatalogTool>> = Lazy::new(|| {
    [
        ("lovable", Category::VibeCoding),
        ("bolt-new", Category::VibeCoding),
        ("sketch-ai", Category::Design),
        ("jasper", Category::Writing),
        ("midjourney", Category::Design),
        ("cursor", Category::VibeCoding),
        ("capcut", Category::Design),
        ("invideo-ai", Category::Design),
        ("hostinger", Category::VibeCoding),
        ("namecheap", Category::Productivity),
        ("shopify", Category::Productivity),
        ("justcall", Category::Productivity),
        ("copy-ai", Category::Writing),
        ("rytr", Category::Writing),
        ("writesonic", Category::Writing),
        ("beehiiv", Category::Writing),
    ]
    .into_iter()
    .map(|(slug, category)| CatalogTool::new(slug, category))
    .collect()
});

/// Ordered first-match classifier.
///
/// Rules are evaluated in order and the first whose keyword occurs in the
/// lowercased path and query wins. Tool slugs from the catalog are consulted
/// only when no rule matched, and [`Category::All`] is the final fallback.
#[derive(Clone, Debug)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
    catalog: Vec<CatalogTool>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.clone(), DEFAULT_CATALOG.clone())
    }
}

impl Classifier {
    pub fn new(rules: Vec<CategoryRule>, catalog: Vec<CatalogTool>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                category: rule.category,
                keywords: rule
                    .keywords
                    .iter()
                    .map(|keyword| keyword.to_lowercase())
                    .filter(|keyword| !keyword.is_empty())
                    .collect(),
            })
            .collect();

        Self { rules, catalog }
    }

    /// Builds a classifier whose keyword rules come from a JSON file of
    /// `[{"category": "...", "keywords": ["..."]}]`, keeping the default
    /// tool catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid rule table.
    pub fn from_rules_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        let rules: Vec<CategoryRule> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid rules file: {}", path.display()))?;

        Ok(Self::new(rules, DEFAULT_CATALOG.clone()))
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Classifies a single page URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` cannot be parsed as an absolute URL.
    pub fn classify(&self, url: &str) -> Result<Classification> {
        let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid page URL {url}: {e}"))?;
        Ok(self.classify_url(&parsed))
    }

    pub fn classify_url(&self, url: &Url) -> Classification {
        let path = url.path();
        if path.is_empty() || path == "/" {
            return Classification::Skip;
        }

        let haystack = match url.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.to_owned(),
        }
        .to_lowercase();

        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(&haystack)) {
            return Classification::Category(rule.category);
        }

        let from_catalog = haystack
            .split(['/', '?'])
            .filter(|segment| !segment.is_empty())
            .find_map(|segment| {
                self.catalog
                    .iter()
                    .find(|tool| tool.matches_segment(segment))
                    .map(|tool| tool.category)
            });

        Classification::Category(from_catalog.unwrap_or(Category::All))
    }
}
