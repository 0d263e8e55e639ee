use sitemigrate::emit::render_rules_module;
use sitemigrate::pipeline::{build_rules, discover_pages};
use sitemigrate::{Category, Classifier, MigrationConfig, RedirectRule, run};
use spectral::prelude::*;
use url::Url;

mod migrate_extras;

use migrate_extras::{StubSitemapSource, sitemap_index, urlset};

const ORIGIN: &str = "https://aitooladvisor.com";

fn config() -> MigrationConfig {
    MigrationConfig::for_origin(Url::parse(ORIGIN).expect("Expected a valid origin."))
        .expect("Expected candidate URLs.")
}

fn rule(source: &str, destination: &str) -> RedirectRule {
    RedirectRule {
        source: source.to_owned(),
        destination: destination.to_owned(),
        permanent: true,
    }
}

#[test]
fn candidates_follow_the_conventional_names() {
    let candidates: Vec<String> = config()
        .candidates
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_that(&candidates).is_equal_to(vec![
        "https://aitooladvisor.com/sitemap_index.xml".to_owned(),
        "https://aitooladvisor.com/sitemap.xml".to_owned(),
        "https://aitooladvisor.com/post-sitemap.xml".to_owned(),
        "https://aitooladvisor.com/page-sitemap.xml".to_owned(),
    ]);
}

#[tokio::test]
async fn maps_pages_to_category_redirects() {
    let source = StubSitemapSource::new().with(
        "https://aitooladvisor.com/sitemap.xml",
        urlset(&[
            "https://aitooladvisor.com/reviews/midjourney",
            "https://aitooladvisor.com/best-ai-coding-tools/",
        ]),
    );

    let report = run(&source, &Classifier::default(), &config()).await;

    assert_that(&report.rules).is_equal_to(vec![
        rule("/reviews/midjourney", "/?category=design&ref=migration"),
        rule("/best-ai-coding-tools", "/?category=vibe-coding&ref=migration"),
    ]);
    assert_that(&report.summary.total_urls).is_equal_to(2);
    assert_that(&report.summary.total_redirects).is_equal_to(2);
    assert_that(&report.summary.source_url).is_equal_to(ORIGIN.to_owned());
}

#[tokio::test]
async fn unreachable_sitemaps_are_skipped() {
    let source = StubSitemapSource::new().with(
        "https://aitooladvisor.com/post-sitemap.xml",
        urlset(&["https://aitooladvisor.com/random-page-xyz"]),
    );

    let report = run(&source, &Classifier::default(), &config()).await;

    assert_that(&report.rules)
        .is_equal_to(vec![rule("/random-page-xyz", "/?ref=migration")]);
    assert_that(&report.summary.sitemaps_processed)
        .is_equal_to(vec!["https://aitooladvisor.com/post-sitemap.xml".to_owned()]);
    assert_that(&report.failed_sitemaps).has_length(3);
    assert_that(&report.is_degenerate()).is_false();
}

#[tokio::test]
async fn malformed_sitemaps_are_skipped() {
    let source = StubSitemapSource::new()
        .with("https://aitooladvisor.com/sitemap.xml", "<urlset><url>")
        .with(
            "https://aitooladvisor.com/page-sitemap.xml",
            urlset(&["https://aitooladvisor.com/contact"]),
        );

    let report = run(&source, &Classifier::default(), &config()).await;

    assert_that(&report.rules).is_equal_to(vec![rule("/contact", "/?ref=migration")]);
    assert_that(&report.failed_sitemaps)
        .contains("https://aitooladvisor.com/sitemap.xml".to_owned());
}

#[tokio::test]
async fn nothing_reachable_is_a_degenerate_success() {
    let report = run(&StubSitemapSource::new(), &Classifier::default(), &config()).await;

    assert_that(&report.rules).is_empty();
    assert_that(&report.summary.total_urls).is_equal_to(0);
    assert_that(&report.is_degenerate()).is_true();
}

#[tokio::test]
async fn nested_sitemaps_are_followed() {
    let source = StubSitemapSource::new()
        .with(
            "https://aitooladvisor.com/sitemap_index.xml",
            sitemap_index(&[
                "https://aitooladvisor.com/post-sitemap.xml",
                "https://aitooladvisor.com/tools-sitemap.xml",
            ]),
        )
        .with(
            "https://aitooladvisor.com/post-sitemap.xml",
            urlset(&["https://aitooladvisor.com/blog/ai-writing-tips/"]),
        )
        .with(
            "https://aitooladvisor.com/tools-sitemap.xml",
            urlset(&["https://aitooladvisor.com/reviews/shopify"]),
        );

    let mut config = config();
    config.concurrency = 4;
    let report = run(&source, &Classifier::default(), &config).await;

    assert_that(&report.rules).is_equal_to(vec![
        rule("/blog/ai-writing-tips", "/?category=writing&ref=migration"),
        rule("/reviews/shopify", "/?category=productivity&ref=migration"),
    ]);
    assert_that(&report.summary.sitemaps_processed).is_equal_to(vec![
        "https://aitooladvisor.com/sitemap_index.xml".to_owned(),
        "https://aitooladvisor.com/post-sitemap.xml".to_owned(),
        "https://aitooladvisor.com/tools-sitemap.xml".to_owned(),
    ]);
}

#[tokio::test]
async fn each_sitemap_is_requested_once() {
    let source = StubSitemapSource::new()
        .with(
            "https://aitooladvisor.com/sitemap_index.xml",
            sitemap_index(&[
                "https://aitooladvisor.com/sitemap_index.xml",
                "https://aitooladvisor.com/post-sitemap.xml",
            ]),
        )
        .with(
            "https://aitooladvisor.com/post-sitemap.xml",
            urlset(&["https://aitooladvisor.com/about"]),
        );

    let discovery = discover_pages(&source, &config()).await;
    let requests = source.requests();

    assert_that(&requests).has_length(4);
    assert_that(&discovery.pages).has_length(1);
}

#[tokio::test]
async fn nesting_stops_at_the_depth_limit() {
    let source = StubSitemapSource::new()
        .with(
            "https://example.com/level-0.xml",
            sitemap_index(&["https://example.com/level-1.xml"]),
        )
        .with(
            "https://example.com/level-1.xml",
            sitemap_index(&["https://example.com/level-2.xml"]),
        )
        .with(
            "https://example.com/level-2.xml",
            urlset(&["https://example.com/deep-page"]),
        );

    let mut config = config();
    config.candidates = vec![Url::parse("https://example.com/level-0.xml").expect("valid url")];
    config.max_depth = 1;
    let discovery = discover_pages(&source, &config).await;

    assert_that(&discovery.pages).is_empty();
    assert_that(&source.requests()).is_equal_to(vec![
        "https://example.com/level-0.xml".to_owned(),
        "https://example.com/level-1.xml".to_owned(),
    ]);
}

#[tokio::test]
async fn duplicate_pages_emit_one_rule() {
    let source = StubSitemapSource::new()
        .with(
            "https://aitooladvisor.com/post-sitemap.xml",
            urlset(&["https://aitooladvisor.com/ai-video-tools"]),
        )
        .with(
            "https://aitooladvisor.com/page-sitemap.xml",
            urlset(&[
                "https://aitooladvisor.com/ai-video-tools",
                "https://aitooladvisor.com/",
            ]),
        );

    let report = run(&source, &Classifier::default(), &config()).await;

    assert_that(&report.rules)
        .is_equal_to(vec![rule("/ai-video-tools", "/?category=design&ref=migration")]);
    assert_that(&report.summary.total_urls).is_equal_to(2);
    assert_that(&report.summary.category_count(Category::Design)).is_equal_to(1);
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let source = StubSitemapSource::new().with(
        "https://aitooladvisor.com/sitemap.xml",
        urlset(&[
            "https://aitooladvisor.com/seo-writing-tools",
            "https://aitooladvisor.com/app-builders/",
            "https://aitooladvisor.com/terms",
            "https://aitooladvisor.com/ai-image-generators",
        ]),
    );

    let first = run(&source, &Classifier::default(), &config()).await;
    let second = run(&source, &Classifier::default(), &config()).await;

    assert_that(&render_rules_module(ORIGIN, &first.rules).expect("render"))
        .is_equal_to(render_rules_module(ORIGIN, &second.rules).expect("render"));
}

#[test]
fn breakdown_lists_every_category() {
    let pages = vec![
        Url::parse("https://example.com/").expect("valid url"),
        Url::parse("https://example.com/blog-design-tips").expect("valid url"),
    ];

    let (rules, breakdown) = build_rules(&pages, &Classifier::default());

    assert_that(&rules).has_length(1);
    assert_that(&breakdown.len()).is_equal_to(Category::ALL.len());
    assert_that(&breakdown.get(&Category::Writing).copied()).is_equal_to(Some(1));
    assert_that(&breakdown.get(&Category::All).copied()).is_equal_to(Some(0));
}
