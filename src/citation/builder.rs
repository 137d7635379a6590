use std::collections::BTreeMap;
use tracing::{debug, info};
use url::Url;

use super::parent::identifier_field;
use super::{Citation, CitationDate, Contributor, EntryType, IdentifierKind};
use crate::page_extractor::{Provenance, SignalBag, SignalField};
use crate::utils::{CitationError, CitationResult};

/// Assemble the final citation from the earlier stages and the bag's scalar fields
///
/// Title is mandatory: the highest-provenance candidate is used and its
/// absence fails with [`CitationError::MissingTitle`]. Every other field is
/// omitted when the bag has nothing usable for it. Container-level
/// identifiers stay with the parent when one was resolved.
pub fn build_citation(
    entry_type: EntryType,
    parent: Option<Citation>,
    contributors: Vec<Contributor>,
    bag: &SignalBag,
) -> CitationResult<Citation> {
    let title = bag
        .best_value(SignalField::Title)
        .ok_or(CitationError::MissingTitle)?;

    let date = select_date(bag);
    let url = select_url(bag);
    let publisher = bag.best_value(SignalField::Publisher).map(str::to_string);
    let language = select_language(bag);

    let identifiers: BTreeMap<IdentifierKind, String> = IdentifierKind::ALL
        .into_iter()
        .filter(|kind| parent.is_none() || !kind.is_container_level())
        .filter_map(|kind| {
            bag.best_value(identifier_field(kind))
                .map(|value| (kind, value.to_string()))
        })
        .collect();

    let citation = Citation::new(entry_type, title)
        .with_contributors(contributors)
        .with_date(date)
        .with_url(url)
        .with_publisher(publisher)
        .with_language(language)
        .with_identifiers(identifiers)
        .with_parent(parent);

    info!(
        "Built {} citation '{}' ({} contributors, parent: {})",
        citation.entry_type(),
        citation.title(),
        citation.contributors().len(),
        citation
            .parent()
            .map(|p| p.entry_type().as_str())
            .unwrap_or("none")
    );

    Ok(citation)
}

/// Highest-provenance candidate that parses as a date
fn select_date(bag: &SignalBag) -> Option<CitationDate> {
    bag.ranked(SignalField::Date).into_iter().find_map(|signal| {
        match signal.value.parse::<CitationDate>() {
            Ok(date) => Some(date),
            Err(e) => {
                debug!("Skipping date candidate from {}: {}", signal.source, e);
                None
            }
        }
    })
}

/// Highest-provenance well-formed language tag; `og:locale` style `_`
/// separators become `-`
fn select_language(bag: &SignalBag) -> Option<String> {
    bag.ranked(SignalField::Language)
        .into_iter()
        .map(|signal| signal.value.replace('_', "-"))
        .find(|tag| {
            tag.split('-').all(|part| {
                !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric())
            })
        })
}

/// Explicit canonical URL if it is absolute, otherwise the page URL as given
fn select_url(bag: &SignalBag) -> Option<String> {
    let canonical = bag
        .ranked(SignalField::CanonicalUrl)
        .into_iter()
        .filter(|signal| signal.provenance >= Provenance::Semantic)
        .find_map(|signal| Url::parse(&signal.value).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(String::from);

    canonical.or_else(|| bag.page_url().map(str::to_string))
}
