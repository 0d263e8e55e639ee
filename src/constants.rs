pub const DEFAULT_ORIGIN: &str = "https://aitooladvisor.com";

/// Conventional sitemap locations probed under the origin, in order.
pub const SITEMAP_CANDIDATE_PATHS: [&str; 4] = [
    "/sitemap_index.xml",
    "/sitemap.xml",
    "/post-sitemap.xml",
    "/page-sitemap.xml",
];

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; SEO-Migration-Bot/1.0)";

pub const FETCH_TIMEOUT_SECS: u64 = 10;

pub const MIGRATION_REF: &str = "migration";

pub const DEFAULT_MAX_DEPTH: usize = 3;

pub const DEFAULT_CONCURRENCY: usize = 1;

pub const RULES_FILE_NAME: &str = "redirects.js";

pub const SUMMARY_FILE_NAME: &str = "migration-summary.json";
