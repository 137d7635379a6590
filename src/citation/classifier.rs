//! Entry type classification
//!
//! Rules run in a fixed order, most specific signal first. The first rule
//! that returns a type wins; [`EntryType::Misc`] is the universal fallback.

use tracing::debug;

use super::EntryType;
use crate::page_extractor::{SignalBag, SignalField, site_kind};

/// schema.org / Dublin Core type names, most specific first
const SCHEMA_TYPES: &[(&str, EntryType)] = &[
    ("ScholarlyArticle", EntryType::Article),
    ("NewsArticle", EntryType::Article),
    ("BlogPosting", EntryType::Article),
    ("TechArticle", EntryType::Article),
    ("Patent", EntryType::Patent),
    ("Thesis", EntryType::Thesis),
    ("Report", EntryType::Report),
    ("Legislation", EntryType::Legislation),
    ("LegislationObject", EntryType::Legislation),
    ("LegalCase", EntryType::Case),
    ("Case", EntryType::Case),
    ("Chapter", EntryType::Chapter),
    ("Book", EntryType::Book),
    ("Manuscript", EntryType::Manuscript),
    ("TVEpisode", EntryType::Scene),
    ("Clip", EntryType::Scene),
    ("Movie", EntryType::Video),
    ("VideoObject", EntryType::Video),
    ("PodcastEpisode", EntryType::Audio),
    ("MusicRecording", EntryType::Audio),
    ("AudioObject", EntryType::Audio),
    ("SoftwareSourceCode", EntryType::Repository),
    ("VisualArtwork", EntryType::Artwork),
    ("Painting", EntryType::Artwork),
    ("Sculpture", EntryType::Artwork),
    ("Photograph", EntryType::Artwork),
    ("ExhibitionEvent", EntryType::Exhibition),
    ("SocialMediaPosting", EntryType::Tweet),
    ("DiscussionForumPosting", EntryType::Thread),
    ("Proceedings", EntryType::Proceedings),
    ("Conference", EntryType::Conference),
    ("Periodical", EntryType::Periodical),
    ("Newspaper", EntryType::Newspaper),
    ("Blog", EntryType::Blog),
    ("Collection", EntryType::Anthology),
];

/// Open Graph `og:type` values
const OG_TYPES: &[(&str, EntryType)] = &[
    ("video.episode", EntryType::Scene),
    ("video.movie", EntryType::Video),
    ("video.tv_show", EntryType::Video),
    ("video.other", EntryType::Video),
    ("music.song", EntryType::Audio),
    ("music.album", EntryType::Audio),
    ("music.playlist", EntryType::Audio),
    ("music.radio_station", EntryType::Audio),
    ("book", EntryType::Book),
];

/// Catch-all article markers, consulted only after URL shape
const GENERIC_SCHEMA_TYPES: &[(&str, EntryType)] = &[("Article", EntryType::Article)];
const GENERIC_OG_TYPES: &[(&str, EntryType)] = &[("article", EntryType::Article)];

/// URL-shape classes emitted by the extractor
const SITE_KINDS: &[(&str, EntryType)] = &[
    (site_kind::MICRO_BLOG_POST, EntryType::Tweet),
    (site_kind::REPOSITORY, EntryType::Repository),
    (site_kind::VIDEO, EntryType::Video),
    (site_kind::PATENT, EntryType::Patent),
    (site_kind::REFERENCE_ENTRY, EntryType::Entry),
];

/// Embedded media elements
const MEDIA_KINDS: &[(&str, EntryType)] =
    &[("video", EntryType::Video), ("audio", EntryType::Audio)];

struct Rule {
    name: &'static str,
    apply: fn(&SignalBag) -> Option<EntryType>,
}

const RULES: &[Rule] = &[
    Rule {
        name: "patent-number",
        apply: |bag| present(bag, SignalField::PatentNumber, EntryType::Patent),
    },
    Rule {
        name: "thesis-institution",
        apply: |bag| present(bag, SignalField::ThesisInstitution, EntryType::Thesis),
    },
    Rule {
        name: "report-institution",
        apply: |bag| present(bag, SignalField::ReportInstitution, EntryType::Report),
    },
    Rule {
        name: "conference-title",
        apply: |bag| present(bag, SignalField::ConferenceTitle, EntryType::Article),
    },
    Rule {
        name: "book-title",
        apply: |bag| present(bag, SignalField::BookTitle, EntryType::Chapter),
    },
    Rule {
        name: "schema-type",
        apply: |bag| lookup(bag, SignalField::SchemaType, SCHEMA_TYPES),
    },
    Rule {
        name: "og-type",
        apply: |bag| lookup(bag, SignalField::OgType, OG_TYPES),
    },
    Rule {
        name: "site-kind",
        apply: |bag| lookup(bag, SignalField::SiteKind, SITE_KINDS),
    },
    Rule {
        name: "generic-article",
        apply: |bag| {
            lookup(bag, SignalField::SchemaType, GENERIC_SCHEMA_TYPES)
                .or_else(|| lookup(bag, SignalField::OgType, GENERIC_OG_TYPES))
        },
    },
    Rule {
        name: "media",
        apply: |bag| lookup(bag, SignalField::Media, MEDIA_KINDS),
    },
    Rule {
        name: "isbn",
        apply: |bag| present(bag, SignalField::Isbn, EntryType::Book),
    },
    Rule {
        name: "container",
        apply: |bag| {
            let periodical = [SignalField::ContainerTitle, SignalField::Doi, SignalField::Issn];
            periodical
                .into_iter()
                .any(|field| bag.has(field))
                .then_some(EntryType::Article)
        },
    },
    Rule {
        name: "web-url",
        apply: |bag| {
            bag.url()
                .filter(|url| matches!(url.scheme(), "http" | "https"))
                .map(|_| EntryType::Web)
        },
    },
];

fn present(bag: &SignalBag, field: SignalField, entry_type: EntryType) -> Option<EntryType> {
    bag.has(field).then_some(entry_type)
}

/// First table entry (in table order) matched by any candidate of `field`
fn lookup(bag: &SignalBag, field: SignalField, table: &[(&str, EntryType)]) -> Option<EntryType> {
    if !bag.has(field) {
        return None;
    }
    table
        .iter()
        .find(|(name, _)| bag.has_value(field, name))
        .map(|(_, entry_type)| *entry_type)
}

/// Decide the single best-matching entry type for a bag
///
/// Deterministic and total: identical bags always produce the same type,
/// and a bag without recognizable signals produces [`EntryType::Misc`].
pub fn classify(bag: &SignalBag) -> EntryType {
    for rule in RULES {
        if let Some(entry_type) = (rule.apply)(bag) {
            debug!("Classified as {} by rule '{}'", entry_type, rule.name);
            return entry_type;
        }
    }

    debug!("No classification rule matched, falling back to Misc");
    EntryType::Misc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_extractor::Signal;

    fn web_bag() -> SignalBag {
        SignalBag::for_url("https://example.com/page").unwrap()
    }

    #[test]
    fn empty_bag_is_misc() {
        assert_eq!(classify(&SignalBag::new()), EntryType::Misc);
    }

    #[test]
    fn title_only_bag_is_misc() {
        let bag = SignalBag::new().with(SignalField::Title, Signal::structured("Lonely"));
        assert_eq!(classify(&bag), EntryType::Misc);
    }

    #[test]
    fn non_web_scheme_is_misc() {
        let bag = SignalBag::for_url("file:///tmp/page.html").unwrap();
        assert_eq!(classify(&bag), EntryType::Misc);
    }

    #[test]
    fn plain_http_page_is_web() {
        assert_eq!(classify(&web_bag()), EntryType::Web);
    }

    #[test]
    fn patent_number_beats_everything() {
        let bag = web_bag()
            .with(SignalField::SchemaType, Signal::structured("ScholarlyArticle"))
            .with(SignalField::ContainerTitle, Signal::structured("Nature"))
            .with(SignalField::PatentNumber, Signal::structured("US1234567"));
        assert_eq!(classify(&bag), EntryType::Patent);
    }

    #[test]
    fn schema_table_order_decides_between_candidates() {
        let bag = web_bag()
            .with(SignalField::SchemaType, Signal::structured("WebPage"))
            .with(SignalField::SchemaType, Signal::structured("Article"))
            .with(SignalField::SchemaType, Signal::structured("NewsArticle"));
        assert_eq!(classify(&bag), EntryType::Article);

        let bag = web_bag()
            .with(SignalField::SchemaType, Signal::structured("Collection"))
            .with(SignalField::SchemaType, Signal::structured("Book"));
        assert_eq!(classify(&bag), EntryType::Book);
    }

    #[test]
    fn og_type_is_case_insensitive() {
        let bag = web_bag().with(SignalField::OgType, Signal::structured("Video.Episode"));
        assert_eq!(classify(&bag), EntryType::Scene);
    }

    #[test]
    fn url_shape_classifies_micro_blog_posts() {
        let bag = web_bag().with(
            SignalField::SiteKind,
            Signal::heuristic(site_kind::MICRO_BLOG_POST),
        );
        assert_eq!(classify(&bag), EntryType::Tweet);
    }

    #[test]
    fn media_element_makes_video() {
        let bag = web_bag().with(SignalField::Media, Signal::semantic("video"));
        assert_eq!(classify(&bag), EntryType::Video);
    }

    #[test]
    fn container_title_makes_article() {
        let bag = web_bag().with(SignalField::ContainerTitle, Signal::structured("Journal of AI"));
        assert_eq!(classify(&bag), EntryType::Article);
    }

    #[test]
    fn isbn_makes_book() {
        let bag = web_bag().with(SignalField::Isbn, Signal::structured("9780262035613"));
        assert_eq!(classify(&bag), EntryType::Book);
    }

    #[test]
    fn url_shape_outranks_generic_article_markers() {
        let bag = SignalBag::for_url("https://en.wikipedia.org/wiki/Rust_(programming_language)")
            .unwrap()
            .with(SignalField::SchemaType, Signal::structured("Article"))
            .with(SignalField::OgType, Signal::structured("article"))
            .with(
                SignalField::SiteKind,
                Signal::heuristic(site_kind::REFERENCE_ENTRY),
            );
        assert_eq!(classify(&bag), EntryType::Entry);
    }

    #[test]
    fn generic_article_still_beats_media_and_container_rules() {
        let bag = web_bag()
            .with(SignalField::SchemaType, Signal::structured("Article"))
            .with(SignalField::Media, Signal::semantic("video"));
        assert_eq!(classify(&bag), EntryType::Article);

        let bag = web_bag().with(SignalField::OgType, Signal::structured("article"));
        assert_eq!(classify(&bag), EntryType::Article);
    }

    #[test]
    fn unmapped_schema_type_falls_through() {
        let bag = web_bag().with(SignalField::SchemaType, Signal::structured("WebPage"));
        assert_eq!(classify(&bag), EntryType::Web);
    }
}
