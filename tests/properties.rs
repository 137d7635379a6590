//! Property tests: determinism, totality and YAML round-trip

use proptest::prelude::*;

use kodegen_tools_citation::{
    Citation, CitationDate, Config, Contributor, DEFAULT_PARENTS, EntryType, IdentifierKind,
    Provenance, Role, Signal, SignalBag, SignalField, classify, from_yaml, generate_citation,
    to_yaml,
};

const FIELDS: &[SignalField] = &[
    SignalField::Title,
    SignalField::Contributor,
    SignalField::Date,
    SignalField::SiteName,
    SignalField::ContainerTitle,
    SignalField::ConferenceTitle,
    SignalField::BookTitle,
    SignalField::Publisher,
    SignalField::Doi,
    SignalField::Isbn,
    SignalField::Issn,
    SignalField::PatentNumber,
    SignalField::OgType,
    SignalField::SchemaType,
    SignalField::ThesisInstitution,
    SignalField::Media,
    SignalField::SiteKind,
];

fn provenance() -> impl Strategy<Value = Provenance> {
    prop_oneof![
        Just(Provenance::Structured),
        Just(Provenance::Semantic),
        Just(Provenance::Heuristic),
    ]
}

fn signal_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 .:/-]{1,24}",
        Just("NewsArticle".to_string()),
        Just("video".to_string()),
        Just("book".to_string()),
        Just("repository".to_string()),
    ]
}

fn signal_bag() -> impl Strategy<Value = SignalBag> {
    prop::collection::vec(
        (0..FIELDS.len(), signal_value(), provenance()),
        0..12,
    )
    .prop_map(|entries| {
        let mut bag = SignalBag::new();
        for (field, value, provenance) in entries {
            bag.insert(FIELDS[field], Signal::new(value, provenance));
        }
        bag
    })
}

fn name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}( [A-Z][a-z]{1,10}){0,2}"
}

fn credited_name() -> impl Strategy<Value = String> {
    (name(), prop::option::of(prop::sample::select(Role::ALL.to_vec()))).prop_map(
        |(name, label)| match label {
            Some(role) => format!("{name} ({})", role.label()),
            None => name,
        },
    )
}

fn contributor() -> impl Strategy<Value = Contributor> {
    (credited_name(), prop::option::of(prop::sample::select(Role::ALL.to_vec()))).prop_map(
        |(name, role)| match role {
            Some(role) => Contributor::with_role(name, role),
            None => Contributor::author(name),
        },
    )
}

fn date() -> impl Strategy<Value = Option<CitationDate>> {
    prop_oneof![
        Just(None),
        (1000i32..2100).prop_map(|y| Some(CitationDate::year(y))),
        (1000i32..2100, 1u8..=12).prop_map(|(y, m)| CitationDate::year_month(y, m)),
        (1000i32..2100, 1u8..=12, 1u8..=28).prop_map(|(y, m, d)| CitationDate::ymd(y, m, d)),
    ]
}

fn title() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 :,.'?!()-]{0,40}[A-Za-z0-9.?!)]"
}

fn citation() -> impl Strategy<Value = Citation> {
    let parent = prop::option::of(
        (title(), prop::option::of("[0-9]{4}-[0-9]{3}[0-9X]"))
            .prop_map(|(title, issn)| {
                let parent = Citation::new(EntryType::Periodical, title);
                match issn {
                    Some(issn) => parent.with_identifier(IdentifierKind::Issn, issn),
                    None => parent,
                }
            }),
    );

    (
        prop::sample::select(EntryType::ALL.to_vec()),
        title(),
        prop::collection::vec(contributor(), 0..4),
        date(),
        prop::option::of("https://example\\.com/[a-z0-9/]{0,16}"),
        prop::option::of("10\\.[0-9]{4,6}/[a-z0-9.]{1,12}"),
        (
            prop::option::of("[A-Z][A-Za-z ]{0,20}[a-z]"),
            prop::option::of("[a-z]{2}(-[A-Z]{2})?"),
        ),
        parent,
    )
        .prop_map(
            |(entry_type, title, contributors, date, url, doi, (publisher, language), parent)| {
                let citation = Citation::new(entry_type, title)
                    .with_contributors(contributors)
                    .with_date(date)
                    .with_url(url)
                    .with_publisher(publisher)
                    .with_language(language)
                    .with_parent(parent);
                match doi {
                    Some(doi) => citation.with_identifier(IdentifierKind::Doi, doi),
                    None => citation,
                }
            },
        )
}

proptest! {
    #[test]
    fn classification_is_deterministic(bag in signal_bag()) {
        let first = classify(&bag);
        prop_assert_eq!(first, classify(&bag.clone()));
    }

    #[test]
    fn bags_without_type_signals_are_misc(
        values in prop::collection::vec("[A-Za-z ]{1,16}", 0..5),
    ) {
        let mut bag = SignalBag::new();
        for value in values {
            bag.insert(SignalField::Title, Signal::structured(value.clone()));
            bag.insert(SignalField::Contributor, Signal::semantic(value));
        }
        prop_assert_eq!(classify(&bag), EntryType::Misc);
    }

    #[test]
    fn yaml_round_trip_preserves_citations(citations in prop::collection::vec(citation(), 1..4)) {
        let yaml = to_yaml(&citations).unwrap();
        let parsed = from_yaml(&yaml).unwrap();
        prop_assert_eq!(parsed, citations);
    }

    #[test]
    fn pipeline_is_idempotent(
        words in prop::collection::vec("[A-Za-z]{1,10}", 1..6),
        author in name(),
    ) {
        let title = words.join(" ");
        let dom = format!(
            r#"<html><head><title>{title}</title><meta name="author" content="{author}"></head>
<body></body></html>"#
        );
        let config = Config::default();

        let first = generate_citation(&dom, "https://example.com/page", &config).unwrap();
        let second = generate_citation(&dom, "https://example.com/page", &config).unwrap();
        prop_assert_eq!(first.title(), title.as_str());
        prop_assert_eq!(&first, &second);
    }
}

#[test]
fn default_parent_table_matches_taxonomy() {
    let expected = [
        (EntryType::Article, Some(EntryType::Periodical)),
        (EntryType::Chapter, Some(EntryType::Book)),
        (EntryType::Entry, Some(EntryType::Reference)),
        (EntryType::Anthos, Some(EntryType::Anthology)),
        (EntryType::Report, None),
        (EntryType::Thesis, None),
        (EntryType::Web, None),
        (EntryType::Scene, Some(EntryType::Video)),
        (EntryType::Artwork, Some(EntryType::Exhibition)),
        (EntryType::Legislation, Some(EntryType::Anthology)),
        (EntryType::Tweet, Some(EntryType::Thread)),
    ];

    for (entry_type, parent) in expected {
        assert_eq!(entry_type.default_parent(), parent, "{entry_type}");
    }
    assert_eq!(DEFAULT_PARENTS.len(), EntryType::ALL.len());
    for entry_type in EntryType::ALL {
        assert_ne!(entry_type.default_parent(), Some(entry_type));
    }
}
