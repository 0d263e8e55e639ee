//! The sitemigrate library maps the pages of a legacy site, as listed in its
//! sitemap.xml files, onto permanent redirects into the category views of
//! the new site.

pub mod classify;
pub mod constants;
pub mod emit;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod sitemap;

pub use classify::{Category, Classification, Classifier};
pub use emit::{RedirectRule, RunSummary, write_outputs};
pub use fetch::{HttpSitemapSource, SitemapSource};
pub use pipeline::{MigrationConfig, MigrationReport, run};
