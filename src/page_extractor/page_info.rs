//! Page parsing and signal extraction entry points

use scraper::{ElementRef, Html};
use tracing::{debug, instrument};
use url::Url;

use super::extractors::{
    SignalSink, extract_bylines, extract_json_ld, extract_meta_tags, extract_microdata,
    extract_semantic, extract_url_shape,
};
use super::schema::SignalBag;
use crate::utils::{ExtractionError, ExtractionResult};
use crate::{Config, ExtractionConfig, HostConfig};

/// A parsed HTML document bound to the absolute URL it was fetched from
#[derive(Debug)]
pub struct PageDocument {
    html: Html,
    page_url: String,
    url: Url,
}

impl PageDocument {
    /// Parse a DOM string
    ///
    /// # Errors
    /// - [`ExtractionError::EmptyDocument`] when the input is blank or has no elements or text
    /// - [`ExtractionError::InvalidUrl`] / [`ExtractionError::RelativeUrl`] when `url` is not
    ///   absolute
    pub fn parse(dom: &str, url: &str) -> ExtractionResult<Self> {
        let page_url = url.trim();
        if page_url.is_empty() {
            return Err(ExtractionError::InvalidUrl("empty URL".to_string()));
        }
        let parsed = Url::parse(page_url)?;

        if dom.trim().is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }
        let html = Html::parse_document(dom);
        if !has_content(&html) {
            return Err(ExtractionError::EmptyDocument);
        }

        Ok(Self {
            html,
            page_url: page_url.to_string(),
            url: parsed,
        })
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL exactly as supplied
    pub fn page_url(&self) -> &str {
        &self.page_url
    }
}

/// Anything beyond the implicit `html`/`head`/`body` skeleton
fn has_content(html: &Html) -> bool {
    let root = html.root_element();
    root.text().any(|text| !text.trim().is_empty())
        || root
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|el| !matches!(el.value().name(), "html" | "head" | "body"))
}

/// Run every extraction pass over a parsed document
///
/// Passes run structured, semantic, then heuristic. The heuristic byline
/// pass is skipped when `extraction.body_heuristics` is off; URL-shape
/// heuristics always run.
#[instrument(skip_all, fields(url = %doc.page_url()))]
pub fn extract_signals(
    doc: &PageDocument,
    extraction: &ExtractionConfig,
    hosts: &HostConfig,
) -> SignalBag {
    let mut bag = SignalBag::for_parsed_url(doc.page_url(), doc.url().clone());

    {
        let mut sink = SignalSink::new(&mut bag, extraction);

        extract_meta_tags(doc.html(), &mut sink);
        extract_json_ld(doc.html(), &mut sink);
        extract_microdata(doc.html(), &mut sink);

        extract_semantic(doc.html(), doc.url(), hosts, &mut sink);

        if extraction.body_heuristics {
            extract_bylines(doc.html(), &mut sink);
        }
        extract_url_shape(doc.url(), hosts, &mut sink);
    }

    debug!(
        "Extracted {} signals across {} fields",
        bag.len(),
        bag.fields().count()
    );
    bag
}

/// Parse `dom` and extract its signal bag in one step
pub fn extract_page_signals(dom: &str, url: &str, config: &Config) -> ExtractionResult<SignalBag> {
    let doc = PageDocument::parse(dom, url)?;
    Ok(extract_signals(&doc, &config.extraction, &config.hosts))
}
