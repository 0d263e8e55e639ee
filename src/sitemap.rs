use anyhow::{Context, Result, anyhow};
use log::warn;
use sitemap::{
    reader::{SiteMapEntity, SiteMapReader},
    structs::Location,
};
use url::Url;
use xml::reader::{ParserConfig, XmlEvent};
use xml::writer::EmitterConfig;

/// A single `loc` discovered in a sitemap document.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SitemapRef {
    /// Points at another sitemap document (from a `sitemapindex`).
    Sitemap(Url),
    /// Points at a content page (from a `urlset`).
    Page(Url),
}

/// Parses a raw sitemap document into the references it lists.
///
/// A `sitemapindex` yields only [`SitemapRef::Sitemap`] entries and a `urlset`
/// only [`SitemapRef::Page`] entries. Well-formed documents with any other
/// root yield nothing. Entries without a `loc` are dropped silently, entries
/// whose `loc` is not an absolute URL are dropped with a warning. A `loc`
/// wrapped in a CDATA section is read like plain text.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML.
pub fn parse_sitemap(xml: &str) -> Result<Vec<SitemapRef>> {
    let normalized = unwrap_cdata(xml)?;
    let mut refs = Vec::new();

    for entity in SiteMapReader::new(normalized.as_slice()) {
        match entity {
            SiteMapEntity::Url(url_entry) => {
                if let Some(url) = location_url(url_entry.loc) {
                    refs.push(SitemapRef::Page(url));
                }
            }
            SiteMapEntity::SiteMap(sitemap_entry) => {
                if let Some(url) = location_url(sitemap_entry.loc) {
                    refs.push(SitemapRef::Sitemap(url));
                }
            }
            // The reader keeps yielding the same error once the XML stream
            // is broken, so the first one ends the document.
            SiteMapEntity::Err(error) => return Err(anyhow!("Malformed sitemap XML: {error:?}")),
        }
    }

    Ok(refs)
}

/// Re-serializes the document with every CDATA section turned into escaped
/// character data, since the sitemap reader only looks at plain text nodes.
fn unwrap_cdata(xml: &str) -> Result<Vec<u8>> {
    let reader = ParserConfig::new()
        .cdata_to_characters(true)
        .create_reader(xml.as_bytes());
    let mut normalized = Vec::with_capacity(xml.len());

    {
        let mut writer = EmitterConfig::new()
            .write_document_declaration(false)
            .create_writer(&mut normalized);

        for event in reader {
            let event = event.context("Malformed sitemap XML")?;
            // The output is always UTF-8, whatever the source declared.
            if matches!(event, XmlEvent::StartDocument { .. }) {
                continue;
            }
            if let Some(event) = event.as_writer_event() {
                writer
                    .write(event)
                    .context("Unable to re-serialize sitemap XML")?;
            }
        }
    }

    Ok(normalized)
}

fn location_url(loc: Location) -> Option<Url> {
    match loc {
        Location::Url(url) => Some(url),
        Location::ParseErr(error) => {
            warn!("Skipping sitemap entry with invalid loc: {error:?}");
            None
        }
        Location::None => None,
    }
}
