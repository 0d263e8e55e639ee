use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use sitemigrate::SitemapSource;
use url::Url;

#[macro_export]
macro_rules! assert_classifications {
    (
        $(
            $test_name:ident : url => $url:expr, category => $category:expr
        ),+ $(,)?
    ) => {
        $(
            #[test]
            fn $test_name() {
                let classification = sitemigrate::Classifier::default()
                    .classify($url)
                    .expect("Expected a parseable URL.");

                assert_that(&classification).is_equal_to($category);
            }
        )+
    }
}

/// In-memory sitemap source that records every request it receives.
#[derive(Default)]
pub(crate) struct StubSitemapSource {
    documents: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubSitemapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl Into<String>) -> Self {
        self.documents.insert(url.to_owned(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("Stub mutex poisoned")
            .clone()
    }
}

impl SitemapSource for StubSitemapSource {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.requests
            .lock()
            .expect("Stub mutex poisoned")
            .push(url.to_string());

        self.documents
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("404 Not Found: {url}"))
    }
}

#[allow(dead_code)]
pub(crate) fn urlset(urls: &[&str]) -> String {
    let entries: String = urls
        .iter()
        .map(|url| format!("  <url>\n    <loc>{url}</loc>\n  </url>\n"))
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{entries}</urlset>\n"
    )
}

#[allow(dead_code)]
pub(crate) fn sitemap_index(urls: &[&str]) -> String {
    let entries: String = urls
        .iter()
        .map(|url| format!("  <sitemap>\n    <loc>{url}</loc>\n  </sitemap>\n"))
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{entries}</sitemapindex>\n"
    )
}
