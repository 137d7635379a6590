//! Closed taxonomy of entry types and their default parents

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of work a citation describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntryType {
    Article,
    Chapter,
    Entry,
    Anthos,
    Report,
    Thesis,
    Web,
    Scene,
    Artwork,
    Patent,
    Case,
    Newspaper,
    Legislation,
    Manuscript,
    Tweet,
    Misc,
    Periodical,
    Proceedings,
    Book,
    Blog,
    Reference,
    Conference,
    Anthology,
    Repository,
    Thread,
    Video,
    Audio,
    Exhibition,
}

use EntryType::*;

/// Container type each entry type is conventionally published within
///
/// Every variant appears exactly once. `None` means the type stands alone.
pub const DEFAULT_PARENTS: [(EntryType, Option<EntryType>); 28] = [
    (Article, Some(Periodical)),
    (Chapter, Some(Book)),
    (Entry, Some(Reference)),
    (Anthos, Some(Anthology)),
    (Report, None),
    (Thesis, None),
    (Web, None),
    (Scene, Some(Video)),
    (Artwork, Some(Exhibition)),
    (Patent, None),
    (Case, None),
    (Newspaper, None),
    (Legislation, Some(Anthology)),
    (Manuscript, None),
    (Tweet, Some(Thread)),
    (Misc, None),
    (Periodical, None),
    (Proceedings, None),
    (Book, None),
    (Blog, None),
    (Reference, None),
    (Conference, None),
    (Anthology, None),
    (Repository, None),
    (Thread, None),
    (Video, None),
    (Audio, None),
    (Exhibition, None),
];

impl EntryType {
    /// All variants in declaration order
    pub const ALL: [EntryType; 28] = [
        Article,
        Chapter,
        Entry,
        Anthos,
        Report,
        Thesis,
        Web,
        Scene,
        Artwork,
        Patent,
        Case,
        Newspaper,
        Legislation,
        Manuscript,
        Tweet,
        Misc,
        Periodical,
        Proceedings,
        Book,
        Blog,
        Reference,
        Conference,
        Anthology,
        Repository,
        Thread,
        Video,
        Audio,
        Exhibition,
    ];

    /// Default parent container type, if this type has one
    pub fn default_parent(self) -> Option<EntryType> {
        DEFAULT_PARENTS
            .iter()
            .find(|(child, _)| *child == self)
            .and_then(|(_, parent)| *parent)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Article => "Article",
            Chapter => "Chapter",
            Entry => "Entry",
            Anthos => "Anthos",
            Report => "Report",
            Thesis => "Thesis",
            Web => "Web",
            Scene => "Scene",
            Artwork => "Artwork",
            Patent => "Patent",
            Case => "Case",
            Newspaper => "Newspaper",
            Legislation => "Legislation",
            Manuscript => "Manuscript",
            Tweet => "Tweet",
            Misc => "Misc",
            Periodical => "Periodical",
            Proceedings => "Proceedings",
            Book => "Book",
            Blog => "Blog",
            Reference => "Reference",
            Conference => "Conference",
            Anthology => "Anthology",
            Repository => "Repository",
            Thread => "Thread",
            Video => "Video",
            Audio => "Audio",
            Exhibition => "Exhibition",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for entry type names outside the taxonomy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown entry type: {0}")]
pub struct UnknownEntryType(pub String);

impl FromStr for EntryType {
    type Err = UnknownEntryType;

    /// Case-insensitive match on the variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        EntryType::ALL
            .into_iter()
            .find(|entry_type| entry_type.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownEntryType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_parent_table_is_total_and_unique() {
        let listed: HashSet<EntryType> = DEFAULT_PARENTS.iter().map(|(child, _)| *child).collect();
        assert_eq!(listed.len(), EntryType::ALL.len());
        for entry_type in EntryType::ALL {
            assert!(listed.contains(&entry_type), "{entry_type} missing from table");
        }
    }

    #[test]
    fn default_parents_match_taxonomy() {
        let expected = [
            (Article, Some(Periodical)),
            (Chapter, Some(Book)),
            (Entry, Some(Reference)),
            (Anthos, Some(Anthology)),
            (Scene, Some(Video)),
            (Artwork, Some(Exhibition)),
            (Legislation, Some(Anthology)),
            (Tweet, Some(Thread)),
        ];

        for entry_type in EntryType::ALL {
            let want = expected
                .iter()
                .find(|(child, _)| *child == entry_type)
                .and_then(|(_, parent)| *parent);
            assert_eq!(entry_type.default_parent(), want, "{entry_type}");
        }
    }

    #[test]
    fn no_type_is_its_own_default_parent() {
        for entry_type in EntryType::ALL {
            assert_ne!(entry_type.default_parent(), Some(entry_type));
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("article".parse::<EntryType>(), Ok(Article));
        assert_eq!(" Proceedings ".parse::<EntryType>(), Ok(Proceedings));
        assert!("podcast".parse::<EntryType>().is_err());
    }
}
