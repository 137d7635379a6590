//! Raw signal bag produced by the extractor
//!
//! A bag lives for one pipeline invocation. Every field keeps all of its
//! candidates in insertion order, each tagged with a provenance weight, so
//! later stages can apply their own precedence.

use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::utils::text::clean_text;
use crate::utils::{ExtractionError, ExtractionResult};

/// How trustworthy a candidate's source is; higher wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provenance {
    /// Visible text and URL shape
    Heuristic,
    /// Semantic HTML elements (`<h1>`, `<title>`, `<time>`, `rel` links)
    Semantic,
    /// Explicit metadata (meta tags, JSON-LD, microdata)
    Structured,
}

/// Semantic name of an extracted signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalField {
    Title,
    Contributor,
    Date,
    SiteName,
    ContainerTitle,
    ConferenceTitle,
    BookTitle,
    Publisher,
    Doi,
    Isbn,
    Issn,
    PatentNumber,
    Arxiv,
    Pmid,
    OgType,
    SchemaType,
    ThesisInstitution,
    ReportInstitution,
    Media,
    SiteKind,
    CanonicalUrl,
    Language,
}

impl SignalField {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalField::Title => "title",
            SignalField::Contributor => "contributor",
            SignalField::Date => "date",
            SignalField::SiteName => "site-name",
            SignalField::ContainerTitle => "container-title",
            SignalField::ConferenceTitle => "conference-title",
            SignalField::BookTitle => "book-title",
            SignalField::Publisher => "publisher",
            SignalField::Doi => "identifier-doi",
            SignalField::Isbn => "identifier-isbn",
            SignalField::Issn => "identifier-issn",
            SignalField::PatentNumber => "identifier-patent",
            SignalField::Arxiv => "identifier-arxiv",
            SignalField::Pmid => "identifier-pmid",
            SignalField::OgType => "og-type",
            SignalField::SchemaType => "schema-type",
            SignalField::ThesisInstitution => "institution-thesis",
            SignalField::ReportInstitution => "institution-report",
            SignalField::Media => "media",
            SignalField::SiteKind => "site-kind",
            SignalField::CanonicalUrl => "canonical-url",
            SignalField::Language => "language",
        }
    }
}

impl fmt::Display for SignalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate value for a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub value: String,
    pub provenance: Provenance,
    /// Where the value came from, e.g. `meta[citation_title]`
    pub source: String,
    /// Contributor context tag, e.g. `translated by`
    pub context: Option<String>,
}

impl Signal {
    pub fn new(value: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            value: value.into(),
            provenance,
            source: String::new(),
            context: None,
        }
    }

    pub fn structured(value: impl Into<String>) -> Self {
        Self::new(value, Provenance::Structured)
    }

    pub fn semantic(value: impl Into<String>) -> Self {
        Self::new(value, Provenance::Semantic)
    }

    pub fn heuristic(value: impl Into<String>) -> Self {
        Self::new(value, Provenance::Heuristic)
    }

    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Provenance-weighted candidates extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalBag {
    page_url: Option<String>,
    url: Option<Url>,
    signals: BTreeMap<SignalField, Vec<Signal>>,
}

impl SignalBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty bag bound to an absolute page URL
    pub fn for_url(page_url: &str) -> ExtractionResult<Self> {
        let trimmed = page_url.trim();
        if trimmed.is_empty() {
            return Err(ExtractionError::InvalidUrl("empty URL".to_string()));
        }
        let url = Url::parse(trimmed)?;
        Ok(Self {
            page_url: Some(trimmed.to_string()),
            url: Some(url),
            signals: BTreeMap::new(),
        })
    }

    /// Bag for a URL that was already validated
    pub(crate) fn for_parsed_url(page_url: &str, url: Url) -> Self {
        Self {
            page_url: Some(page_url.to_string()),
            url: Some(url),
            signals: BTreeMap::new(),
        }
    }

    /// The page URL exactly as supplied by the caller
    pub fn page_url(&self) -> Option<&str> {
        self.page_url.as_deref()
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Add a candidate after whitespace cleanup; empty values are dropped
    pub fn insert(&mut self, field: SignalField, mut signal: Signal) -> bool {
        let Some(value) = clean_text(&signal.value) else {
            return false;
        };
        signal.value = value;
        signal.context = signal.context.as_deref().and_then(clean_text);

        let candidates = self.signals.entry(field).or_default();
        let duplicate = candidates.iter().any(|existing| {
            existing.value == signal.value
                && existing.provenance == signal.provenance
                && existing.context == signal.context
        });
        if duplicate {
            return false;
        }
        candidates.push(signal);
        true
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, field: SignalField, signal: Signal) -> Self {
        self.insert(field, signal);
        self
    }

    pub fn candidates(&self, field: SignalField) -> &[Signal] {
        self.signals.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: SignalField) -> bool {
        !self.candidates(field).is_empty()
    }

    /// Highest-provenance candidate; the earliest wins ties
    pub fn best(&self, field: SignalField) -> Option<&Signal> {
        self.candidates(field)
            .iter()
            .fold(None, |best: Option<&Signal>, candidate| match best {
                Some(current) if current.provenance >= candidate.provenance => Some(current),
                _ => Some(candidate),
            })
    }

    pub fn best_value(&self, field: SignalField) -> Option<&str> {
        self.best(field).map(|signal| signal.value.as_str())
    }

    /// Candidates ordered by provenance (highest first), insertion order within a tier
    pub fn ranked(&self, field: SignalField) -> Vec<&Signal> {
        let mut ranked: Vec<&Signal> = self.candidates(field).iter().collect();
        ranked.sort_by(|a, b| b.provenance.cmp(&a.provenance));
        ranked
    }

    pub fn values(&self, field: SignalField) -> impl Iterator<Item = &str> {
        self.candidates(field).iter().map(|signal| signal.value.as_str())
    }

    /// Whether any candidate equals `value`, ignoring ASCII case
    pub fn has_value(&self, field: SignalField, value: &str) -> bool {
        self.values(field).any(|candidate| candidate.eq_ignore_ascii_case(value))
    }

    /// Total number of candidates across all fields
    pub fn len(&self) -> usize {
        self.signals.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fields(&self) -> impl Iterator<Item = SignalField> + '_ {
        self.signals
            .iter()
            .filter(|(_, candidates)| !candidates.is_empty())
            .map(|(field, _)| *field)
    }
}
