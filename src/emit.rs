//! The emit module turns classified URLs into redirect rules and writes the
//! rules module and run summary to disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use url::Url;

use crate::classify::{Category, Classification};
use crate::constants::{MIGRATION_REF, RULES_FILE_NAME, SUMMARY_FILE_NAME};

/// A permanent redirect from a legacy path to a filtered view on the new site.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RedirectRule {
    pub source: String,
    pub destination: String,
    pub permanent: bool,
}

/// Diagnostic record of a single run.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub source_url: String,
    pub total_urls: usize,
    pub total_redirects: usize,
    pub category_breakdown: BTreeMap<Category, usize>,
    pub sitemaps_processed: Vec<String>,
}

impl RunSummary {
    pub fn category_count(&self, category: Category) -> usize {
        self.category_breakdown
            .get(&category)
            .copied()
            .unwrap_or_default()
    }
}

/// Paths of the files written by [`write_outputs`].
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OutputPaths {
    pub rules: PathBuf,
    pub summary: PathBuf,
}

/// Destination on the new site for a category.
pub fn category_destination(category: Category) -> String {
    match category {
        Category::All => format!("/?ref={MIGRATION_REF}"),
        category => format!("/?category={category}&ref={MIGRATION_REF}"),
    }
}

/// Builds the redirect rule for a page, or `None` when the page must not be
/// redirected (skipped pages and the site root).
pub fn redirect_for(url: &Url, classification: Classification) -> Option<RedirectRule> {
    let Classification::Category(category) = classification else {
        return None;
    };

    let path = url.path();
    let source = match path.strip_suffix('/') {
        Some(stripped) if path != "/" => stripped,
        _ => path,
    };

    if source.is_empty() || source == "/" {
        return None;
    }

    Some(RedirectRule {
        source: source.to_owned(),
        destination: category_destination(category),
        permanent: true,
    })
}

/// Renders the rules as a CommonJS module exporting one async function that
/// resolves to the rule list, as consumed by the site's redirect config.
///
/// # Errors
///
/// Returns an error if the rules cannot be serialized.
pub fn render_rules_module(origin: &str, rules: &[RedirectRule]) -> Result<String> {
    let json = serde_json::to_string_pretty(rules).context("Unable to serialize redirect rules")?;

    Ok(format!(
        "// Auto-generated SEO Migration Redirects\n\
         // Source: {origin}\n\
         // Total URLs mapped: {count}\n\
         \n\
         const migrationRedirects = async () => {{\n  \
         return {json};\n\
         }};\n\
         \n\
         module.exports = migrationRedirects;\n",
        count = rules.len(),
    ))
}

/// Writes the rules module and the JSON summary into `out_dir`, replacing any
/// previous output wholesale.
///
/// # Errors
///
/// Returns an error if serialization fails or either file cannot be written.
pub fn write_outputs(
    out_dir: &Path,
    rules: &[RedirectRule],
    summary: &RunSummary,
) -> Result<OutputPaths> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Unable to create output directory {}", out_dir.display()))?;

    let paths = OutputPaths {
        rules: out_dir.join(RULES_FILE_NAME),
        summary: out_dir.join(SUMMARY_FILE_NAME),
    };

    let module = render_rules_module(&summary.source_url, rules)?;
    write_atomically(&paths.rules, module.as_bytes())?;
    info!("Wrote {} redirects to {}", rules.len(), paths.rules.display());

    let mut summary_json =
        serde_json::to_string_pretty(summary).context("Unable to serialize run summary")?;
    summary_json.push('\n');
    write_atomically(&paths.summary, summary_json.as_bytes())?;
    info!("Wrote run summary to {}", paths.summary.display());

    Ok(paths)
}

fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Unable to create temporary file in {}", dir.display()))?;

    file.write_all(content)
        .with_context(|| format!("Unable to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Unable to replace {}", path.display()))?;

    Ok(())
}
