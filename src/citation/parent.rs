//! Parent citation synthesis
//!
//! The parent type comes from the default parent table unless an override
//! rule sees an explicit contradicting signal. A parent is only synthesized
//! when a container signal supplies its title.

use std::collections::BTreeMap;
use tracing::debug;

use super::{Citation, EntryType, IdentifierKind};
use crate::page_extractor::{SignalBag, SignalField};

/// Explicit signal that replaces a child type's default parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentOverride {
    pub child: EntryType,
    pub field: SignalField,
    /// Required candidate value (ASCII case-insensitive); `None` means presence is enough
    pub value: Option<&'static str>,
    pub parent: EntryType,
}

pub const PARENT_OVERRIDES: &[ParentOverride] = &[
    ParentOverride {
        child: EntryType::Article,
        field: SignalField::ConferenceTitle,
        value: None,
        parent: EntryType::Proceedings,
    },
    ParentOverride {
        child: EntryType::Article,
        field: SignalField::SchemaType,
        value: Some("NewsArticle"),
        parent: EntryType::Newspaper,
    },
    ParentOverride {
        child: EntryType::Article,
        field: SignalField::SchemaType,
        value: Some("BlogPosting"),
        parent: EntryType::Blog,
    },
];

/// Fields that may title the parent, in precedence order per parent type
const PARENT_TITLE_FIELDS: &[(EntryType, &[SignalField])] = &[
    (
        EntryType::Proceedings,
        &[
            SignalField::ConferenceTitle,
            SignalField::ContainerTitle,
            SignalField::Publisher,
        ],
    ),
    (
        EntryType::Book,
        &[
            SignalField::BookTitle,
            SignalField::ContainerTitle,
            SignalField::SiteName,
            SignalField::Publisher,
        ],
    ),
];

const DEFAULT_TITLE_FIELDS: &[SignalField] = &[
    SignalField::ContainerTitle,
    SignalField::ConferenceTitle,
    SignalField::BookTitle,
    SignalField::SiteName,
    SignalField::Publisher,
];

fn title_fields(parent: EntryType) -> &'static [SignalField] {
    PARENT_TITLE_FIELDS
        .iter()
        .find(|(entry_type, _)| *entry_type == parent)
        .map(|(_, fields)| *fields)
        .unwrap_or(DEFAULT_TITLE_FIELDS)
}

/// Parent type for `entry_type`, honoring override rules
pub fn parent_type(entry_type: EntryType, bag: &SignalBag) -> Option<EntryType> {
    let default = entry_type.default_parent()?;

    let overridden = PARENT_OVERRIDES.iter().find(|rule| {
        rule.child == entry_type
            && match rule.value {
                Some(value) => bag.has_value(rule.field, value),
                None => bag.has(rule.field),
            }
    });

    match overridden {
        Some(rule) => {
            debug!(
                "Parent of {} overridden to {} by {}",
                entry_type, rule.parent, rule.field
            );
            Some(rule.parent)
        }
        None => Some(default),
    }
}

/// Synthesize the parent citation, or `None` when the type stands alone or
/// no container signal exists
pub fn resolve_parent(entry_type: EntryType, bag: &SignalBag) -> Option<Citation> {
    let parent = parent_type(entry_type, bag)?;

    let Some(title) = title_fields(parent)
        .iter()
        .find_map(|field| bag.best_value(*field))
    else {
        debug!("No container signal for {} parent, omitting it", parent);
        return None;
    };

    let identifiers: BTreeMap<IdentifierKind, String> = IdentifierKind::ALL
        .into_iter()
        .filter(|kind| kind.is_container_level())
        .filter_map(|kind| {
            bag.best_value(identifier_field(kind))
                .map(|value| (kind, value.to_string()))
        })
        .collect();

    Some(Citation::new(parent, title).with_identifiers(identifiers))
}

/// Signal field that carries an identifier kind
pub(crate) fn identifier_field(kind: IdentifierKind) -> SignalField {
    match kind {
        IdentifierKind::Doi => SignalField::Doi,
        IdentifierKind::Isbn => SignalField::Isbn,
        IdentifierKind::Issn => SignalField::Issn,
        IdentifierKind::PatentNumber => SignalField::PatentNumber,
        IdentifierKind::Arxiv => SignalField::Arxiv,
        IdentifierKind::Pmid => SignalField::Pmid,
    }
}
