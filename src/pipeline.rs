//! Classify-and-build pipeline
//!
//! One DOM + URL pair in, one [`Citation`] out. Invocations share no mutable
//! state, so a [`CitationPipeline`] can be cloned freely and used from many
//! threads at once.

use tracing::{debug, instrument};

use crate::Config;
use crate::citation::{Citation, assign_roles, build_citation, classify, resolve_parent};
use crate::page_extractor::{SignalBag, SignalField, extract_page_signals};
use crate::utils::CitationResult;

/// Run the classification stages over an already extracted bag
///
/// Stages run strictly forward: type, parent, roles, then assembly. The bag
/// is only read.
pub fn citation_from_signals(bag: &SignalBag) -> CitationResult<Citation> {
    let entry_type = classify(bag);
    let parent = resolve_parent(entry_type, bag);
    let contributors = assign_roles(bag.candidates(SignalField::Contributor));
    debug!(
        "Classified as {} with {} contributors, parent: {}",
        entry_type,
        contributors.len(),
        parent.is_some()
    );
    build_citation(entry_type, parent, contributors, bag)
}

/// Extract, classify and build a citation for one page
///
/// # Errors
/// - [`CitationError::Extraction`](crate::CitationError::Extraction) when the
///   document is empty or the URL is not absolute
/// - [`CitationError::MissingTitle`](crate::CitationError::MissingTitle) when
///   no title candidate exists
pub fn generate_citation(dom: &str, url: &str, config: &Config) -> CitationResult<Citation> {
    let bag = extract_page_signals(dom, url, config)?;
    citation_from_signals(&bag)
}

/// Pipeline bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct CitationPipeline {
    config: Config,
}

impl CitationPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Signal bag for a page without classifying it
    pub fn extract(&self, dom: &str, url: &str) -> CitationResult<SignalBag> {
        Ok(extract_page_signals(dom, url, &self.config)?)
    }

    #[instrument(skip(self, dom))]
    pub fn run(&self, dom: &str, url: &str) -> CitationResult<Citation> {
        generate_citation(dom, url, &self.config)
    }
}
