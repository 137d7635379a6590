//! YAML bibliography rendering and reading
//!
//! A bibliography is a YAML mapping from citation key to entry. Entries list
//! their fields in a fixed order (`type`, `title`, `author`, `date`, `url`,
//! `publisher`, `language`, identifier keys, `parent`) and omit absent
//! fields. Plain authors render as strings, contributors with a role as a
//! `name`/`role` mapping.
//!
//! ```yaml
//! war-and-peace:
//!   type: Book
//!   title: War and Peace
//!   author:
//!   - Leo Tolstoy
//!   - name: Jane Smith
//!     role: translator
//!   date: '2007'
//!   publisher: Vintage
//!   isbn: '9781400079988'
//! ```

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::citation::{Citation, CitationDate, Contributor, EntryType, IdentifierKind, Role};
use crate::utils::{CitationError, CitationResult};

/// On-disk shape of one entry; field order here is emission order
#[derive(Debug, Serialize, Deserialize)]
struct EntryRecord {
    #[serde(rename = "type")]
    entry_type: EntryType,

    title: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    author: Vec<AuthorRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    publisher: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,

    #[serde(flatten)]
    identifiers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<Box<EntryRecord>>,
}

/// A plain author is a bare string; anything else carries its role
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum AuthorRecord {
    Plain(String),
    Credited { name: String, role: Role },
}

impl From<&Contributor> for AuthorRecord {
    fn from(contributor: &Contributor) -> Self {
        match contributor.role {
            Some(role) => AuthorRecord::Credited {
                name: contributor.name.clone(),
                role,
            },
            None => AuthorRecord::Plain(contributor.name.clone()),
        }
    }
}

impl From<AuthorRecord> for Contributor {
    fn from(record: AuthorRecord) -> Self {
        match record {
            AuthorRecord::Plain(name) => Contributor::author(name),
            AuthorRecord::Credited { name, role } => Contributor::with_role(name, role),
        }
    }
}

impl From<&Citation> for EntryRecord {
    fn from(citation: &Citation) -> Self {
        Self {
            entry_type: citation.entry_type(),
            title: citation.title().to_string(),
            author: citation.contributors().iter().map(AuthorRecord::from).collect(),
            date: citation.date().map(|date| date.to_string()),
            url: citation.url().map(str::to_string),
            publisher: citation.publisher().map(str::to_string),
            language: citation.language().map(str::to_string),
            identifiers: citation
                .identifiers()
                .iter()
                .map(|(kind, value)| (kind.key().to_string(), value.clone()))
                .collect(),
            parent: citation.parent().map(|parent| Box::new(EntryRecord::from(parent))),
        }
    }
}

impl TryFrom<EntryRecord> for Citation {
    type Error = CitationError;

    fn try_from(record: EntryRecord) -> CitationResult<Self> {
        let date = record
            .date
            .as_deref()
            .map(str::parse::<CitationDate>)
            .transpose()
            .map_err(|e| CitationError::Yaml(e.to_string()))?;

        let identifiers = record
            .identifiers
            .into_iter()
            .map(|(key, value)| match IdentifierKind::from_key(&key) {
                Some(kind) => Ok((kind, value)),
                None => Err(CitationError::Yaml(format!("unknown field `{key}`"))),
            })
            .collect::<CitationResult<BTreeMap<_, _>>>()?;

        let parent = record
            .parent
            .map(|parent| Citation::try_from(*parent))
            .transpose()?;

        Ok(Citation::new(record.entry_type, record.title)
            .with_contributors(record.author.into_iter().map(Contributor::from).collect())
            .with_date(date)
            .with_url(record.url)
            .with_publisher(record.publisher)
            .with_language(record.language)
            .with_identifiers(identifiers)
            .with_parent(parent))
    }
}

/// Render citations as one YAML bibliography
///
/// Keys come from [`Citation::key`]. A key already in the document gets the
/// lowest free `-2`, `-3`, ... suffix, so every citation keeps its own entry.
pub fn to_yaml(citations: &[Citation]) -> CitationResult<String> {
    let mut document = Mapping::new();
    let mut used: HashSet<String> = HashSet::new();

    for citation in citations {
        let key = unique_key(citation.key(), &used);
        used.insert(key.clone());

        let record = serde_yaml::to_value(EntryRecord::from(citation))?;
        document.insert(Value::String(key), record);
    }

    debug!("Serialized {} citations", citations.len());
    Ok(serde_yaml::to_string(&document)?)
}

fn unique_key(base: String, used: &HashSet<String>) -> String {
    if !used.contains(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or(base)
}

/// Read a YAML bibliography back into citations, in document order
pub fn from_yaml(text: &str) -> CitationResult<Vec<Citation>> {
    let document: Mapping = serde_yaml::from_str(text)?;

    document
        .into_iter()
        .map(|(key, value)| {
            let record: EntryRecord = serde_yaml::from_value(value).map_err(|e| {
                CitationError::Yaml(format!("entry {}: {e}", key.as_str().unwrap_or("?")))
            })?;
            Citation::try_from(record)
        })
        .collect()
}

impl Citation {
    /// This citation alone as a YAML bibliography
    pub fn to_yaml_string(&self) -> CitationResult<String> {
        to_yaml(std::slice::from_ref(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Citation {
        Citation::new(EntryType::Book, "War and Peace")
            .with_contributors(vec![
                Contributor::author("Leo Tolstoy"),
                Contributor::with_role("Jane Smith", Role::Translator),
            ])
            .with_date(Some(CitationDate::year(2007)))
            .with_url(Some("https://example.com/war-and-peace".to_string()))
            .with_publisher(Some("Vintage".to_string()))
            .with_language(Some("en".to_string()))
            .with_identifier(IdentifierKind::Isbn, "9781400079988")
    }

    #[test]
    fn fields_render_in_fixed_order() {
        let yaml = book().to_yaml_string().unwrap();
        let positions: Vec<usize> = [
            "type:",
            "title:",
            "author:",
            "date:",
            "url:",
            "publisher:",
            "language:",
            "isbn:",
        ]
            .iter()
            .map(|key| yaml.find(key).unwrap_or_else(|| panic!("{key} missing in\n{yaml}")))
            .collect();

        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "{yaml}");
        assert!(yaml.starts_with("war-and-peace:"));
        assert!(yaml.contains("- Leo Tolstoy\n"), "{yaml}");
        assert!(yaml.contains("name: Jane Smith"), "{yaml}");
        assert!(yaml.contains("role: translator"), "{yaml}");
    }

    #[test]
    fn absent_fields_are_omitted() {
        let yaml = Citation::new(EntryType::Misc, "Bare").to_yaml_string().unwrap();
        for key in ["author:", "date:", "url:", "publisher:", "language:", "parent:", "doi:"] {
            assert!(!yaml.contains(key), "{key} in\n{yaml}");
        }
    }

    #[test]
    fn parent_round_trips_recursively() {
        let parent = Citation::new(EntryType::Periodical, "Nature")
            .with_identifier(IdentifierKind::Issn, "0028-0836");
        let article = Citation::new(EntryType::Article, "Deep learning")
            .with_contributors(vec![Contributor::author("Yann LeCun")])
            .with_date(CitationDate::ymd(2015, 5, 28))
            .with_identifier(IdentifierKind::Doi, "10.1038/nature14539")
            .with_parent(Some(parent));

        let yaml = to_yaml(&[article.clone(), book()]).unwrap();
        assert_eq!(from_yaml(&yaml).unwrap(), vec![article, book()]);
    }

    #[test]
    fn duplicate_keys_get_suffixes() {
        let yaml = to_yaml(&[book(), book()]).unwrap();
        assert!(yaml.contains("war-and-peace:"));
        assert!(yaml.contains("war-and-peace-2:"));
        assert_eq!(from_yaml(&yaml).unwrap().len(), 2);
    }

    #[test]
    fn suffixed_titles_never_overwrite_each_other() {
        let first = Citation::new(EntryType::Book, "War and Peace");
        let second = Citation::new(EntryType::Book, "War and Peace")
            .with_date(Some(CitationDate::year(1869)));
        let third = Citation::new(EntryType::Book, "War and Peace 2");
        assert_eq!(third.key(), "war-and-peace-2");

        let citations = vec![first, second, third];
        let yaml = to_yaml(&citations).unwrap();
        assert!(yaml.contains("war-and-peace-2:"), "{yaml}");
        assert!(yaml.contains("war-and-peace-2-2:"), "{yaml}");
        assert_eq!(from_yaml(&yaml).unwrap(), citations);
    }

    #[test]
    fn parenthesized_names_round_trip_verbatim() {
        let citation = Citation::new(EntryType::Report, "Annual filing").with_contributors(vec![
            Contributor::author("Acme (translator)"),
            Contributor::author("Ann Lee (cast-member)"),
            Contributor::with_role("Acme (Holdings)", Role::Organizer),
        ]);

        let yaml = citation.to_yaml_string().unwrap();
        assert_eq!(from_yaml(&yaml).unwrap(), vec![citation]);
    }

    #[test]
    fn role_mapping_is_read_back() {
        let parsed = from_yaml(
            "x:\n  type: Video\n  title: T\n  author:\n  - name: Ann Lee\n    role: cast-member\n",
        )
        .unwrap();
        assert_eq!(
            parsed[0].contributors(),
            &[Contributor::with_role("Ann Lee", Role::CastMember)]
        );
    }

    #[test]
    fn reader_rejects_unknown_fields_and_types() {
        assert!(matches!(
            from_yaml("x:\n  type: Article\n  title: T\n  color: red\n"),
            Err(CitationError::Yaml(_))
        ));
        assert!(matches!(
            from_yaml("x:\n  type: Pamphlet\n  title: T\n"),
            Err(CitationError::Yaml(_))
        ));
        assert!(matches!(
            from_yaml("x:\n  type: Video\n  title: T\n  author:\n  - name: A\n    role: boss\n"),
            Err(CitationError::Yaml(_))
        ));
    }
}
