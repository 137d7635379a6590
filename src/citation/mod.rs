//! Citation model and the classification stages that produce it
//!
//! Stages run strictly forward over one [`SignalBag`](crate::page_extractor::SignalBag):
//! - `classifier` - picks the [`EntryType`]
//! - `parent` - synthesizes the optional parent citation
//! - `contributors` - assigns a [`Role`] to each contributor
//! - `builder` - assembles the immutable [`Citation`]

mod builder;
mod classifier;
mod contributors;
mod date;
mod entry_type;
mod parent;
mod role;

pub use builder::build_citation;
pub use classifier::classify;
pub use contributors::assign_roles;
pub use date::{CitationDate, DateParseError};
pub use entry_type::{DEFAULT_PARENTS, EntryType, UnknownEntryType};
pub use parent::{PARENT_OVERRIDES, ParentOverride, parent_type, resolve_parent};
pub use role::{ROLE_PHRASES, Role};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::text::citation_key;

/// A named contributor; no role means plain authorship
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Contributor {
    pub name: String,
    pub role: Option<Role>,
}

impl Contributor {
    pub fn author(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: None,
        }
    }

    pub fn with_role(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role: Some(role),
        }
    }
}

/// Kind of identifier attached to a citation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierKind {
    Doi,
    Isbn,
    Issn,
    PatentNumber,
    Arxiv,
    Pmid,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 6] = [
        IdentifierKind::Doi,
        IdentifierKind::Isbn,
        IdentifierKind::Issn,
        IdentifierKind::PatentNumber,
        IdentifierKind::Arxiv,
        IdentifierKind::Pmid,
    ];

    /// Serialized key
    pub fn key(self) -> &'static str {
        match self {
            IdentifierKind::Doi => "doi",
            IdentifierKind::Isbn => "isbn",
            IdentifierKind::Issn => "issn",
            IdentifierKind::PatentNumber => "patent-number",
            IdentifierKind::Arxiv => "arxiv",
            IdentifierKind::Pmid => "pmid",
        }
    }

    pub fn from_key(key: &str) -> Option<IdentifierKind> {
        IdentifierKind::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Identifiers that describe the container rather than the work itself
    pub fn is_container_level(self) -> bool {
        matches!(self, IdentifierKind::Issn)
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Immutable bibliographic record for one page
///
/// Produced by the pipeline or the YAML reader; a new value is created for
/// every change, a built citation is never edited in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    entry_type: EntryType,
    title: String,
    contributors: Vec<Contributor>,
    date: Option<CitationDate>,
    url: Option<String>,
    publisher: Option<String>,
    /// BCP 47 tag, e.g. `en-US`
    language: Option<String>,
    identifiers: BTreeMap<IdentifierKind, String>,
    parent: Option<Box<Citation>>,
}

impl Citation {
    pub fn new(entry_type: EntryType, title: impl Into<String>) -> Self {
        Self {
            entry_type,
            title: title.into(),
            contributors: Vec::new(),
            date: None,
            url: None,
            publisher: None,
            language: None,
            identifiers: BTreeMap::new(),
            parent: None,
        }
    }

    pub fn with_contributors(mut self, contributors: Vec<Contributor>) -> Self {
        self.contributors = contributors;
        self
    }

    pub fn with_date(mut self, date: Option<CitationDate>) -> Self {
        self.date = date;
        self
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn with_publisher(mut self, publisher: Option<String>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_identifier(mut self, kind: IdentifierKind, value: impl Into<String>) -> Self {
        self.identifiers.insert(kind, value.into());
        self
    }

    pub fn with_identifiers(mut self, identifiers: BTreeMap<IdentifierKind, String>) -> Self {
        self.identifiers = identifiers;
        self
    }

    pub fn with_parent(mut self, parent: Option<Citation>) -> Self {
        self.parent = parent.map(Box::new);
        self
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    pub fn date(&self) -> Option<CitationDate> {
        self.date
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn identifiers(&self) -> &BTreeMap<IdentifierKind, String> {
        &self.identifiers
    }

    pub fn identifier(&self, kind: IdentifierKind) -> Option<&str> {
        self.identifiers.get(&kind).map(String::as_str)
    }

    pub fn parent(&self) -> Option<&Citation> {
        self.parent.as_deref()
    }

    /// Bibliography key derived from the title, e.g. `deep-learning`
    pub fn key(&self) -> String {
        citation_key(&self.title)
    }
}
