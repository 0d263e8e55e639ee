//! sitemigrate is a CLI tool that preserves search rankings across a site
//! migration by turning the legacy site's sitemaps into redirect rules.
//!
//! The tool has two commands:
//! 1. `map` - Crawls the legacy sitemaps and writes the redirect rules module and a run summary
//! 2. `classify` - Shows where individual URLs would be redirected to

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{error, info, warn};
use url::Url;

use sitemigrate::{
    Classification, Classifier, HttpSitemapSource, MigrationConfig,
    constants::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_ORIGIN},
    emit::category_destination,
    report::{log_level_filter, render_report},
    run, write_outputs,
};

/// A CLI tool to map a legacy sitemap.xml onto permanent redirects
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute (map or classify)
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "More log output: debug (-v), trace (-vv)", global = true)]
    verbose: u8,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Less log output: warn (-q), error (-qq)", global = true)]
    quiet: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl the legacy sitemaps and write the redirect rules and run summary
    Map {
        /// Origin of the legacy site
        #[arg(long, short, default_value = DEFAULT_ORIGIN)]
        origin: String,
        /// Sitemap URL to probe instead of the conventional locations (repeatable)
        #[arg(long, short)]
        sitemap: Vec<String>,
        /// JSON file with an ordered category keyword table
        #[arg(long, short)]
        rules: Option<PathBuf>,
        /// Directory to write redirects.js and migration-summary.json to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Number of sibling sitemaps fetched concurrently
        #[arg(long, short, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
        /// How many levels of nested sitemap indexes to follow
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
        /// Fail instead of writing empty output when no sitemap could be processed
        #[arg(long)]
        strict: bool,
    },
    /// Print the category and destination for each URL
    Classify {
        /// Absolute page URLs to classify
        #[arg(required = true)]
        urls: Vec<String>,
        /// JSON file with an ordered category keyword table
        #[arg(long, short)]
        rules: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(log_level_filter(cli.verbose, cli.quiet))
        .init();

    match cli.command {
        Command::Map {
            origin,
            sitemap,
            rules,
            out_dir,
            concurrency,
            max_depth,
            strict,
        } => {
            let mut config = MigrationConfig::for_origin(
                Url::parse(&origin).map_err(|e| anyhow::anyhow!("Invalid origin url: {}", e))?,
            )?;
            if !sitemap.is_empty() {
                config.candidates = sitemap
                    .iter()
                    .map(|url| {
                        Url::parse(url)
                            .map_err(|e| anyhow::anyhow!("Invalid sitemap url {url}: {}", e))
                    })
                    .collect::<Result<_>>()?;
            }
            config.concurrency = concurrency;
            config.max_depth = max_depth;

            handle_map_command(config, rules, out_dir, strict).await
        }
        Command::Classify { urls, rules } => handle_classify_command(&urls, rules),
    }
}

fn load_classifier(rules: Option<PathBuf>) -> Result<Classifier> {
    match rules {
        Some(path) => Classifier::from_rules_file(&path),
        None => Ok(Classifier::default()),
    }
}

async fn handle_map_command(
    config: MigrationConfig,
    rules: Option<PathBuf>,
    out_dir: PathBuf,
    strict: bool,
) -> Result<()> {
    let classifier = load_classifier(rules)?;
    let source = HttpSitemapSource::new()?;

    info!("Mapping legacy sitemaps of {}", config.origin);
    let report = run(&source, &classifier, &config).await;
    println!("{}", render_report(&report));

    if report.is_degenerate() {
        error!("No sitemap could be processed for {}", config.origin);
        if strict {
            bail!("No sitemap could be processed for {}", config.origin);
        }
    }

    let paths = write_outputs(&out_dir, &report.rules, &report.summary)?;
    info!("Output: {}", paths.rules.display());
    info!("Summary: {}", paths.summary.display());

    Ok(())
}

fn handle_classify_command(urls: &[String], rules: Option<PathBuf>) -> Result<()> {
    let classifier = load_classifier(rules)?;

    for url in urls {
        match classifier.classify(url) {
            Ok(Classification::Skip) => println!("{url}\tskip"),
            Ok(Classification::Category(category)) => {
                println!("{url}\t{category}\t{}", category_destination(category));
            }
            Err(error) => warn!("Skipping {url}: {error:#}"),
        }
    }

    Ok(())
}
