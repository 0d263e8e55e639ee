//! The pipeline module drives one migration run: it walks the legacy
//! sitemaps breadth first, classifies every unique page and emits the
//! redirect rules.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use url::Url;

use crate::classify::{Category, Classification, Classifier};
use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, SITEMAP_CANDIDATE_PATHS};
use crate::emit::{RedirectRule, RunSummary, redirect_for};
use crate::fetch::SitemapSource;
use crate::sitemap::{SitemapRef, parse_sitemap};

/// Settings for a single run.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct MigrationConfig {
    /// Origin of the legacy site, recorded in the summary.
    pub origin: Url,
    /// Sitemaps probed first, in order.
    pub candidates: Vec<Url>,
    /// How many levels of nested sitemap indexes are followed.
    pub max_depth: usize,
    /// Upper bound on sibling sitemap fetches in flight.
    pub concurrency: usize,
}

impl MigrationConfig {
    /// Configuration probing the conventional sitemap locations of `origin`.
    ///
    /// # Errors
    ///
    /// Returns an error if a candidate path cannot be joined onto `origin`.
    pub fn for_origin(origin: Url) -> Result<Self> {
        let candidates = SITEMAP_CANDIDATE_PATHS
            .iter()
            .map(|path| {
                origin
                    .join(path)
                    .with_context(|| format!("Unable to build sitemap URL {origin}{path}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            origin,
            candidates,
            max_depth: DEFAULT_MAX_DEPTH,
            concurrency: DEFAULT_CONCURRENCY,
        })
    }
}

/// Unique pages found while walking the sitemaps.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Discovery {
    /// Page URLs in discovery order, without duplicates.
    pub pages: Vec<Url>,
    /// Sitemaps that were fetched and parsed.
    pub processed: Vec<String>,
    /// Sitemaps that could not be fetched or parsed.
    pub failed: Vec<String>,
}

/// Result of a completed run.
#[derive(Clone, PartialEq, Debug)]
pub struct MigrationReport {
    pub rules: Vec<RedirectRule>,
    pub summary: RunSummary,
    pub failed_sitemaps: Vec<String>,
}

impl MigrationReport {
    /// True when not a single sitemap could be processed.
    pub fn is_degenerate(&self) -> bool {
        self.summary.sitemaps_processed.is_empty()
    }
}

/// Runs the whole migration: discovery, classification and rule emission.
///
/// Unavailable or malformed sitemaps are logged and skipped, so a run always
/// completes. Nothing is written to disk here.
pub async fn run<S: SitemapSource>(
    source: &S,
    classifier: &Classifier,
    config: &MigrationConfig,
) -> MigrationReport {
    let discovery = discover_pages(source, config).await;
    info!("Total unique URLs found: {}", discovery.pages.len());

    let (rules, category_breakdown) = build_rules(&discovery.pages, classifier);

    let summary = RunSummary {
        generated_at: Utc::now(),
        source_url: config.origin.as_str().trim_end_matches('/').to_owned(),
        total_urls: discovery.pages.len(),
        total_redirects: rules.len(),
        category_breakdown,
        sitemaps_processed: discovery.processed,
    };

    MigrationReport {
        rules,
        summary,
        failed_sitemaps: discovery.failed,
    }
}

/// Walks the candidate sitemaps and every nested sitemap they reference,
/// one level at a time.
///
/// All fetches of a level are joined before the level is parsed, and each
/// sitemap URL is requested at most once.
pub async fn discover_pages<S: SitemapSource>(source: &S, config: &MigrationConfig) -> Discovery {
    let mut discovery = Discovery::default();
    let mut visited_sitemaps = HashSet::new();
    let mut seen_pages = HashSet::new();

    let mut level: Vec<Url> = config
        .candidates
        .iter()
        .filter(|url| visited_sitemaps.insert(url.to_string()))
        .cloned()
        .collect();
    let mut depth = 0;

    while !level.is_empty() {
        debug!("Fetching {} sitemaps at depth {depth}", level.len());

        let fetched: Vec<(Url, Result<String>)> = stream::iter(level)
            .map(|url| async move {
                info!("Fetching: {url}");
                let body = source.fetch(&url).await;
                (url, body)
            })
            .buffered(config.concurrency.max(1))
            .collect()
            .await;

        let mut next_level = Vec::new();

        for (url, body) in fetched {
            let refs = match body.and_then(|body| parse_sitemap(&body)) {
                Ok(refs) => refs,
                Err(error) => {
                    warn!("Skipping sitemap {url}: {error:#}");
                    discovery.failed.push(url.to_string());
                    continue;
                }
            };

            info!("Found {} entries in {url}", refs.len());
            discovery.processed.push(url.to_string());

            for entry in refs {
                match entry {
                    SitemapRef::Page(page) => {
                        if seen_pages.insert(page.to_string()) {
                            discovery.pages.push(page);
                        }
                    }
                    SitemapRef::Sitemap(nested) if depth >= config.max_depth => {
                        warn!("Ignoring nested sitemap {nested}: depth limit {depth} reached");
                    }
                    SitemapRef::Sitemap(nested) => {
                        if visited_sitemaps.insert(nested.to_string()) {
                            next_level.push(nested);
                        }
                    }
                }
            }
        }

        level = next_level;
        depth += 1;
    }

    discovery
}

/// Classifies every page and converts it into a redirect rule, preserving
/// input order. The breakdown always lists every category.
pub fn build_rules(
    pages: &[Url],
    classifier: &Classifier,
) -> (Vec<RedirectRule>, BTreeMap<Category, usize>) {
    let mut breakdown: BTreeMap<Category, usize> =
        Category::ALL.into_iter().map(|category| (category, 0)).collect();
    let mut rules = Vec::with_capacity(pages.len());

    for page in pages {
        let classification = classifier.classify_url(page);

        match classification {
            Classification::Skip => {
                debug!("Skipping {page}: no destination on the new site");
                continue;
            }
            Classification::Category(category) => {
                *breakdown.entry(category).or_default() += 1;
            }
        }

        if let Some(rule) = redirect_for(page, classification) {
            rules.push(rule);
        }
    }

    (rules, breakdown)
}
