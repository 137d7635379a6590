//! Signal extraction passes
//!
//! Each pass walks the parsed document for one family of sources and feeds
//! candidates into a [`SignalSink`]. Passes run structured first, then
//! semantic, then heuristic, so insertion order follows provenance.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use super::identifiers;
use super::schema::{Provenance, Signal, SignalBag, SignalField};
use super::site_kind;
use crate::citation::ROLE_PHRASES;
use crate::{ExtractionConfig, HostConfig};

static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta").expect("meta selector"));
static JSON_LD_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("json-ld selector")
});
static ITEMTYPE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemscope][itemtype]").expect("itemtype selector"));
static ITEMPROP_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[itemprop]").expect("itemprop selector"));
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("h1 selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector"));
static TIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time[datetime]").expect("time selector"));
static AUTHOR_LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[rel~="author"]"#).expect("author link selector"));
static CANONICAL_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"link[rel~="canonical"][href]"#).expect("canonical selector"));
static VIDEO_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("video").expect("video selector"));
static AUDIO_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("audio").expect("audio selector"));
static IFRAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("iframe[src]").expect("iframe selector"));
static LANG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("html[lang]").expect("lang selector"));
static BYLINE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[class*="byline"], [class*="credit"], [class*="contributor"]"#)
        .expect("byline selector")
});

/// "<phrase> by" patterns from the role phrase table
static BYLINE_ROLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    let phrases: Vec<String> = ROLE_PHRASES
        .iter()
        .map(|(phrase, _)| *phrase)
        .filter(|phrase| phrase.ends_with(" by") || *phrase == "starring")
        .map(|phrase| regex::escape(phrase).replace(' ', r"\s+"))
        .collect();
    Regex::new(&format!(r"(?i)\b({})\s*:?\s+", phrases.join("|"))).expect("byline role regex")
});

static BYLINE_AUTHOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*by\s+(.+)$").expect("byline author regex"));

static NAME_SPLIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(?:,|&|\band\b)\s*").expect("name split regex"));

/// Bylines longer than this are page sections, not credits
const MAX_BYLINE_CHARS: usize = 300;

// =============================================================================
// Signal sink
// =============================================================================

/// Validating front door to the bag used by every pass
pub(crate) struct SignalSink<'a> {
    bag: &'a mut SignalBag,
    max_title_chars: usize,
}

impl<'a> SignalSink<'a> {
    pub(crate) fn new(bag: &'a mut SignalBag, config: &ExtractionConfig) -> Self {
        Self {
            bag,
            max_title_chars: config.max_title_chars,
        }
    }

    /// Normalize identifiers, drop overlong titles, then insert
    fn emit(&mut self, field: SignalField, mut signal: Signal) {
        let Some(value) = identifiers::normalize(field, &signal.value) else {
            debug!(
                "Dropping invalid {} candidate '{}' from {}",
                field, signal.value, signal.source
            );
            return;
        };
        if field == SignalField::Title && value.chars().count() > self.max_title_chars {
            debug!("Dropping overlong title candidate from {}", signal.source);
            return;
        }
        signal.value = value;
        self.bag.insert(field, signal);
    }

    fn field(&mut self, field: SignalField, value: &str, provenance: Provenance, source: &str) {
        self.emit(field, Signal::new(value, provenance).from_source(source));
    }

    /// Contributor names; profile URLs are not names and are skipped
    fn contributor(
        &mut self,
        name: &str,
        provenance: Provenance,
        source: &str,
        context: Option<&str>,
    ) {
        let name = name.trim();
        if name.starts_with("http://") || name.starts_with("https://") {
            debug!("Skipping contributor URL '{}' from {}", name, source);
            return;
        }
        let name = natural_name_order(name);
        let mut signal = Signal::new(name, provenance).from_source(source);
        if let Some(context) = context {
            signal = signal.with_context(context);
        }
        self.bag.insert(SignalField::Contributor, signal);
    }

    /// Free-form identifier whose kind must be sniffed
    fn identifier(&mut self, raw: &str, provenance: Provenance, source: &str) {
        match identifiers::sniff(raw) {
            Some((field, value)) => self.field(field, &value, provenance, source),
            None => debug!("Unrecognized identifier '{}' from {}", raw, source),
        }
    }
}

/// Generational, academic and corporate tails that follow a comma
const NAME_SUFFIXES: &[&str] = &[
    "jr", "sr", "ii", "iii", "iv", "phd", "md", "esq", "inc", "ltd", "llc", "co", "corp",
];

/// `Family, Given` becomes `Given Family`. Suffix tails and comma lists of
/// full names keep their written form.
fn natural_name_order(name: &str) -> String {
    let Some((family, given)) = name.split_once(',') else {
        return name.to_string();
    };
    let (family, given) = (family.trim(), given.trim());
    if family.is_empty() || given.is_empty() || given.contains(',') {
        return name.to_string();
    }

    let tail = given.trim_end_matches('.').to_ascii_lowercase();
    if NAME_SUFFIXES.contains(&tail.as_str()) {
        return name.to_string();
    }
    let words = |part: &str| part.split_whitespace().count();
    if words(family) > 1 && words(given) > 1 {
        return name.to_string();
    }

    format!("{given} {family}")
}

/// `host` is `domain` or one of its subdomains
fn on_host(host: &str, domain: &str) -> bool {
    host.strip_suffix(domain)
        .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'))
}

// =============================================================================
// Structured: meta tags
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum MetaTarget {
    Field(SignalField),
    /// Contributor with an optional context tag
    Contributor(Option<&'static str>),
    /// `;`-separated contributor list
    ContributorList,
    /// Identifier of unknown kind
    Identifier,
}

const META_TAGS: &[(&str, MetaTarget)] = &[
    // Highwire Press / Google Scholar
    ("citation_title", MetaTarget::Field(SignalField::Title)),
    ("citation_author", MetaTarget::Contributor(None)),
    ("citation_authors", MetaTarget::ContributorList),
    ("citation_publication_date", MetaTarget::Field(SignalField::Date)),
    ("citation_date", MetaTarget::Field(SignalField::Date)),
    ("citation_online_date", MetaTarget::Field(SignalField::Date)),
    ("citation_journal_title", MetaTarget::Field(SignalField::ContainerTitle)),
    ("citation_conference_title", MetaTarget::Field(SignalField::ConferenceTitle)),
    ("citation_conference", MetaTarget::Field(SignalField::ConferenceTitle)),
    ("citation_inbook_title", MetaTarget::Field(SignalField::BookTitle)),
    ("citation_book_title", MetaTarget::Field(SignalField::BookTitle)),
    ("citation_publisher", MetaTarget::Field(SignalField::Publisher)),
    ("citation_doi", MetaTarget::Field(SignalField::Doi)),
    ("citation_isbn", MetaTarget::Field(SignalField::Isbn)),
    ("citation_issn", MetaTarget::Field(SignalField::Issn)),
    ("citation_eissn", MetaTarget::Field(SignalField::Issn)),
    ("citation_patent_number", MetaTarget::Field(SignalField::PatentNumber)),
    ("citation_patent_publication_number", MetaTarget::Field(SignalField::PatentNumber)),
    ("citation_arxiv_id", MetaTarget::Field(SignalField::Arxiv)),
    ("citation_pmid", MetaTarget::Field(SignalField::Pmid)),
    ("citation_dissertation_institution", MetaTarget::Field(SignalField::ThesisInstitution)),
    ("citation_technical_report_institution", MetaTarget::Field(SignalField::ReportInstitution)),
    ("citation_language", MetaTarget::Field(SignalField::Language)),
    // Dublin Core
    ("dc.title", MetaTarget::Field(SignalField::Title)),
    ("dcterms.title", MetaTarget::Field(SignalField::Title)),
    ("dc.creator", MetaTarget::Contributor(None)),
    ("dcterms.creator", MetaTarget::Contributor(None)),
    ("dc.contributor", MetaTarget::Contributor(None)),
    ("dc.date", MetaTarget::Field(SignalField::Date)),
    ("dc.date.issued", MetaTarget::Field(SignalField::Date)),
    ("dcterms.issued", MetaTarget::Field(SignalField::Date)),
    ("dcterms.created", MetaTarget::Field(SignalField::Date)),
    ("dc.publisher", MetaTarget::Field(SignalField::Publisher)),
    ("dcterms.publisher", MetaTarget::Field(SignalField::Publisher)),
    ("dc.relation.ispartof", MetaTarget::Field(SignalField::ContainerTitle)),
    ("dcterms.ispartof", MetaTarget::Field(SignalField::ContainerTitle)),
    ("dc.type", MetaTarget::Field(SignalField::SchemaType)),
    ("dcterms.type", MetaTarget::Field(SignalField::SchemaType)),
    ("dc.identifier", MetaTarget::Identifier),
    ("dcterms.identifier", MetaTarget::Identifier),
    ("dc.language", MetaTarget::Field(SignalField::Language)),
    // PRISM
    ("prism.publicationname", MetaTarget::Field(SignalField::ContainerTitle)),
    ("prism.publicationdate", MetaTarget::Field(SignalField::Date)),
    ("prism.doi", MetaTarget::Field(SignalField::Doi)),
    ("prism.issn", MetaTarget::Field(SignalField::Issn)),
    ("prism.eissn", MetaTarget::Field(SignalField::Issn)),
    ("prism.isbn", MetaTarget::Field(SignalField::Isbn)),
    // Open Graph
    ("og:title", MetaTarget::Field(SignalField::Title)),
    ("og:type", MetaTarget::Field(SignalField::OgType)),
    ("og:site_name", MetaTarget::Field(SignalField::SiteName)),
    ("og:locale", MetaTarget::Field(SignalField::Language)),
    ("article:author", MetaTarget::Contributor(None)),
    ("og:article:author", MetaTarget::Contributor(None)),
    ("article:published_time", MetaTarget::Field(SignalField::Date)),
    ("og:article:published_time", MetaTarget::Field(SignalField::Date)),
    ("book:author", MetaTarget::Contributor(None)),
    ("og:book:author", MetaTarget::Contributor(None)),
    ("book:isbn", MetaTarget::Field(SignalField::Isbn)),
    ("og:book:isbn", MetaTarget::Field(SignalField::Isbn)),
    ("book:release_date", MetaTarget::Field(SignalField::Date)),
    ("og:book:release_date", MetaTarget::Field(SignalField::Date)),
    ("video:director", MetaTarget::Contributor(Some("director"))),
    ("video:writer", MetaTarget::Contributor(Some("writer"))),
    ("video:actor", MetaTarget::Contributor(Some("actor"))),
    ("video:release_date", MetaTarget::Field(SignalField::Date)),
    ("music:musician", MetaTarget::Contributor(None)),
    ("music:creator", MetaTarget::Contributor(None)),
    ("music:release_date", MetaTarget::Field(SignalField::Date)),
    // Generic
    ("twitter:title", MetaTarget::Field(SignalField::Title)),
    ("title", MetaTarget::Field(SignalField::Title)),
    ("author", MetaTarget::Contributor(None)),
    ("application-name", MetaTarget::Field(SignalField::SiteName)),
    ("content-language", MetaTarget::Field(SignalField::Language)),
];

fn meta_target(key: &str) -> Option<MetaTarget> {
    META_TAGS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, target)| *target)
}

/// `<meta>` tags keyed by `name`, `property` or `http-equiv`
pub(crate) fn extract_meta_tags(html: &Html, sink: &mut SignalSink) {
    let mut matched = 0usize;

    for el in html.select(&META_SELECTOR) {
        let element = el.value();
        let Some(key) = element
            .attr("name")
            .or_else(|| element.attr("property"))
            .or_else(|| element.attr("http-equiv"))
        else {
            continue;
        };
        let Some(content) = element.attr("content") else {
            continue;
        };

        let key = key.trim().to_ascii_lowercase();
        let source = format!("meta[{key}]");

        // Dublin Core role refinements, e.g. dc.contributor.translator
        if let Some(refinement) = key.strip_prefix("dc.contributor.") {
            sink.contributor(content, Provenance::Structured, &source, Some(refinement));
            matched += 1;
            continue;
        }

        let Some(target) = meta_target(&key) else {
            continue;
        };
        matched += 1;

        match target {
            MetaTarget::Field(field) => sink.field(field, content, Provenance::Structured, &source),
            MetaTarget::Contributor(context) => {
                sink.contributor(content, Provenance::Structured, &source, context)
            }
            MetaTarget::ContributorList => {
                for name in content.split(';') {
                    sink.contributor(name, Provenance::Structured, &source, None);
                }
            }
            MetaTarget::Identifier => sink.identifier(content, Provenance::Structured, &source),
        }
    }

    debug!("Meta pass matched {} tags", matched);
}

// =============================================================================
// Structured: JSON-LD
// =============================================================================

/// Node types that describe the site, people or page furniture rather than the work
const NON_WORK_TYPES: &[&str] = &[
    "WebSite",
    "Organization",
    "Corporation",
    "NewsMediaOrganization",
    "Person",
    "BreadcrumbList",
    "ListItem",
    "ImageObject",
    "SiteNavigationElement",
    "SearchAction",
    "EntryPoint",
    "WPHeader",
    "WPFooter",
    "ReadAction",
];

/// schema.org contributor properties and the context tag they carry
const ROLE_PROPERTIES: &[(&str, Option<&str>)] = &[
    ("author", None),
    ("creator", None),
    ("translator", Some("translator")),
    ("director", Some("director")),
    ("composer", Some("composer")),
    ("musicBy", Some("music by")),
    ("producer", Some("producer")),
    ("illustrator", Some("illustrator")),
    ("actor", Some("actor")),
    ("actors", Some("actor")),
    ("contributor", Some("collaborator")),
    ("founder", Some("founder")),
    ("organizer", Some("organizer")),
    ("readBy", Some("read by")),
];

const DATE_PROPERTIES: &[&str] = &["datePublished", "dateCreated", "uploadDate"];

/// `<script type="application/ld+json">` blocks, including `@graph` arrays
pub(crate) fn extract_json_ld(html: &Html, sink: &mut SignalSink) {
    for script in html.select(&JSON_LD_SELECTOR) {
        let raw: String = script.text().collect();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => {
                let nodes = json_ld_nodes(&value);
                debug!("JSON-LD block with {} nodes", nodes.len());
                for node in nodes {
                    extract_json_ld_node(node, sink);
                }
            }
            Err(e) => warn!("Skipping malformed JSON-LD block: {}", e),
        }
    }
}

fn json_ld_nodes(value: &Value) -> Vec<&Map<String, Value>> {
    match value {
        Value::Array(items) => items.iter().flat_map(json_ld_nodes).collect(),
        Value::Object(map) => match map.get("@graph") {
            Some(graph) => json_ld_nodes(graph),
            None => vec![map],
        },
        _ => Vec::new(),
    }
}

/// `@type` values with any vocabulary prefix removed
fn json_ld_types(node: &Map<String, Value>) -> Vec<String> {
    match node.get("@type") {
        Some(Value::String(t)) => vec![schema_type_name(t)],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(schema_type_name)
            .collect(),
        _ => Vec::new(),
    }
}

/// `https://schema.org/Book` / `schema:Book` -> `Book`
fn schema_type_name(raw: &str) -> String {
    let raw = raw.trim();
    raw.rsplit(['/', ':', '#'])
        .next()
        .unwrap_or(raw)
        .to_string()
}

fn is_work(types: &[String]) -> bool {
    !types.is_empty() && types.iter().all(|t| !NON_WORK_TYPES.contains(&t.as_str()))
}

fn extract_json_ld_node(node: &Map<String, Value>, sink: &mut SignalSink) {
    let types = json_ld_types(node);
    for t in &types {
        sink.field(SignalField::SchemaType, t, Provenance::Structured, "json-ld:@type");
    }

    if types.iter().any(|t| t == "WebSite") {
        for name in json_ld_names(node.get("name")) {
            let source = "json-ld:WebSite.name";
            sink.field(SignalField::SiteName, &name, Provenance::Structured, source);
        }
    }

    if !is_work(&types) {
        return;
    }

    for key in ["headline", "name"] {
        if let Some(Value::String(title)) = node.get(key) {
            let source = format!("json-ld:{key}");
            sink.field(SignalField::Title, title, Provenance::Structured, &source);
        }
    }

    for (property, context) in ROLE_PROPERTIES {
        for name in json_ld_names(node.get(*property)) {
            let source = format!("json-ld:{property}");
            sink.contributor(&name, Provenance::Structured, &source, *context);
        }
    }

    for property in DATE_PROPERTIES {
        if let Some(Value::String(date)) = node.get(*property) {
            let source = format!("json-ld:{property}");
            sink.field(SignalField::Date, date, Provenance::Structured, &source);
        }
    }

    for name in json_ld_names(node.get("publisher")) {
        sink.field(SignalField::Publisher, &name, Provenance::Structured, "json-ld:publisher");
    }

    if let Some(container) = node.get("isPartOf") {
        extract_json_ld_container(container, sink, 0);
    }

    for (key, field) in [("isbn", SignalField::Isbn), ("issn", SignalField::Issn)] {
        for value in json_ld_strings(node.get(key)) {
            sink.field(field, &value, Provenance::Structured, &format!("json-ld:{key}"));
        }
    }

    for key in ["identifier", "sameAs"] {
        extract_json_ld_identifiers(node.get(key), sink, key);
    }

    if let Some(Value::String(language)) = node.get("inLanguage") {
        sink.field(SignalField::Language, language, Provenance::Structured, "json-ld:inLanguage");
    }
}

/// Walk an `isPartOf` chain (issue -> volume -> periodical) collecting
/// container titles and ISSNs
fn extract_json_ld_container(value: &Value, sink: &mut SignalSink, depth: usize) {
    const MAX_DEPTH: usize = 4;
    if depth >= MAX_DEPTH {
        return;
    }

    match value {
        Value::String(name) if !name.starts_with("http") => {
            let source = "json-ld:isPartOf";
            sink.field(SignalField::ContainerTitle, name, Provenance::Structured, source);
        }
        Value::Array(items) => {
            for item in items {
                extract_json_ld_container(item, sink, depth + 1);
            }
        }
        Value::Object(node) => {
            let types = json_ld_types(node);
            let field = if types.iter().any(|t| t == "Book") {
                SignalField::BookTitle
            } else if types.iter().any(|t| t == "WebSite") {
                SignalField::SiteName
            } else {
                SignalField::ContainerTitle
            };
            if let Some(Value::String(name)) = node.get("name") {
                sink.field(field, name, Provenance::Structured, "json-ld:isPartOf.name");
            }
            for issn in json_ld_strings(node.get("issn")) {
                let source = "json-ld:isPartOf.issn";
                sink.field(SignalField::Issn, &issn, Provenance::Structured, source);
            }
            if let Some(parent) = node.get("isPartOf") {
                extract_json_ld_container(parent, sink, depth + 1);
            }
        }
        _ => {}
    }
}

/// Identifiers given as strings, URLs or `PropertyValue` objects
fn extract_json_ld_identifiers(value: Option<&Value>, sink: &mut SignalSink, key: &str) {
    let source = format!("json-ld:{key}");
    match value {
        Some(Value::String(raw)) => {
            if identifiers::sniff(raw).is_some() {
                sink.identifier(raw, Provenance::Structured, &source);
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                extract_json_ld_identifiers(Some(item), sink, key);
            }
        }
        Some(Value::Object(node)) => {
            let property = node
                .get("propertyID")
                .and_then(Value::as_str)
                .map(str::to_ascii_lowercase);
            let Some(raw) = node.get("value").and_then(Value::as_str) else {
                return;
            };
            let field = match property.as_deref() {
                Some("doi") => Some(SignalField::Doi),
                Some("isbn") => Some(SignalField::Isbn),
                Some("issn") => Some(SignalField::Issn),
                Some("pmid") => Some(SignalField::Pmid),
                Some("arxiv") => Some(SignalField::Arxiv),
                _ => None,
            };
            match field {
                Some(field) => sink.field(field, raw, Provenance::Structured, &source),
                None => sink.identifier(raw, Provenance::Structured, &source),
            }
        }
        _ => {}
    }
}

/// Person / organization names from a string, object or array
fn json_ld_names(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(name)) => vec![name.clone()],
        Some(Value::Array(items)) => {
            items.iter().flat_map(|item| json_ld_names(Some(item))).collect()
        }
        Some(Value::Object(node)) => {
            if let Some(Value::String(name)) = node.get("name") {
                return vec![name.clone()];
            }
            let given = node.get("givenName").and_then(Value::as_str);
            let family = node.get("familyName").and_then(Value::as_str);
            match (given, family) {
                (Some(given), Some(family)) => vec![format!("{given} {family}")],
                (None, Some(family)) => vec![family.to_string()],
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}

fn json_ld_strings(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => {
            items.iter().filter_map(Value::as_str).map(str::to_string).collect()
        }
        _ => Vec::new(),
    }
}

// =============================================================================
// Structured: microdata
// =============================================================================

/// `itemscope`/`itemtype`/`itemprop` annotations
pub(crate) fn extract_microdata(html: &Html, sink: &mut SignalSink) {
    for scope in html.select(&ITEMTYPE_SELECTOR) {
        if let Some(itemtype) = scope.value().attr("itemtype") {
            for t in itemtype.split_whitespace() {
                sink.field(
                    SignalField::SchemaType,
                    &schema_type_name(t),
                    Provenance::Structured,
                    "microdata:itemtype",
                );
            }
        }
    }

    for el in html.select(&ITEMPROP_SELECTOR) {
        let Some(props) = el.value().attr("itemprop") else {
            continue;
        };
        let owner = owning_scope(el);
        let owner_types = owner.map(scope_types).unwrap_or_default();
        let top_level_work =
            owner.is_some_and(|scope| owning_scope(scope).is_none()) && is_work(&owner_types);

        // Properties of nested people/organizations are read through their parent property
        if !owner_types.is_empty() && !is_work(&owner_types) {
            continue;
        }

        for prop in props.split_whitespace() {
            let source = format!("microdata:{prop}");
            match prop {
                "headline" | "name" if top_level_work => {
                    if let Some(title) = itemprop_value(el) {
                        sink.field(SignalField::Title, &title, Provenance::Structured, &source);
                    }
                }
                "datePublished" | "dateCreated" | "uploadDate" => {
                    if let Some(date) = itemprop_value(el) {
                        sink.field(SignalField::Date, &date, Provenance::Structured, &source);
                    }
                }
                "publisher" => {
                    if let Some(name) = scoped_name(el) {
                        sink.field(SignalField::Publisher, &name, Provenance::Structured, &source);
                    }
                }
                "isbn" | "issn" => {
                    let field = if prop == "isbn" { SignalField::Isbn } else { SignalField::Issn };
                    if let Some(value) = itemprop_value(el) {
                        sink.field(field, &value, Provenance::Structured, &source);
                    }
                }
                "inLanguage" => {
                    if let Some(language) = itemprop_value(el) {
                        let field = SignalField::Language;
                        sink.field(field, &language, Provenance::Structured, &source);
                    }
                }
                _ => {
                    let role = ROLE_PROPERTIES.iter().find(|(name, _)| *name == prop);
                    if let Some((_, context)) = role {
                        if let Some(name) = scoped_name(el) {
                            sink.contributor(&name, Provenance::Structured, &source, *context);
                        }
                    }
                }
            }
        }
    }
}

/// Nearest ancestor (not `el` itself) carrying `itemscope`
fn owning_scope(el: ElementRef) -> Option<ElementRef> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().attr("itemscope").is_some())
}

fn scope_types(scope: ElementRef) -> Vec<String> {
    scope
        .value()
        .attr("itemtype")
        .map(|itemtype| itemtype.split_whitespace().map(schema_type_name).collect())
        .unwrap_or_default()
}

/// Value of an `itemprop` element per the microdata value rules
fn itemprop_value(el: ElementRef) -> Option<String> {
    let element = el.value();
    let attr = match element.name() {
        "meta" => element.attr("content"),
        "time" => element.attr("datetime"),
        "data" | "meter" => element.attr("value"),
        _ => element.attr("content"),
    };
    match attr {
        Some(value) => Some(value.to_string()),
        None => {
            let text: String = el.text().collect();
            crate::utils::text::clean_text(&text)
        }
    }
}

/// Name of a person/organization property, looking inside nested item scopes
fn scoped_name(el: ElementRef) -> Option<String> {
    if el.value().attr("itemscope").is_some() {
        return el
            .select(&ITEMPROP_SELECTOR)
            .find(|child| {
                child
                    .value()
                    .attr("itemprop")
                    .is_some_and(|props| props.split_whitespace().any(|p| p == "name"))
            })
            .and_then(itemprop_value);
    }
    itemprop_value(el)
}

// =============================================================================
// Semantic HTML
// =============================================================================

/// Headings, `<title>`, `<time>`, author links, canonical link, media elements
pub(crate) fn extract_semantic(html: &Html, base: &Url, hosts: &HostConfig, sink: &mut SignalSink) {
    if let Some(h1) = html.select(&H1_SELECTOR).next() {
        let text: String = h1.text().collect();
        sink.field(SignalField::Title, &text, Provenance::Semantic, "h1");
    }

    if let Some(title) = html.select(&TITLE_SELECTOR).next() {
        let text: String = title.text().collect();
        sink.field(SignalField::Title, &text, Provenance::Semantic, "title");
    }

    for time in html.select(&TIME_SELECTOR) {
        if let Some(datetime) = time.value().attr("datetime") {
            sink.field(SignalField::Date, datetime, Provenance::Semantic, "time[datetime]");
        }
    }

    for link in html.select(&AUTHOR_LINK_SELECTOR) {
        let text: String = link.text().collect();
        sink.contributor(&text, Provenance::Semantic, "a[rel=author]", None);
    }

    for link in html.select(&CANONICAL_SELECTOR) {
        if let Some(href) = link.value().attr("href") {
            match base.join(href.trim()) {
                Ok(canonical) => sink.field(
                    SignalField::CanonicalUrl,
                    canonical.as_str(),
                    Provenance::Semantic,
                    "link[rel=canonical]",
                ),
                Err(e) => debug!("Ignoring canonical link '{}': {}", href, e),
            }
        }
    }

    if html.select(&VIDEO_SELECTOR).next().is_some() {
        sink.field(SignalField::Media, "video", Provenance::Semantic, "video");
    }
    if html.select(&AUDIO_SELECTOR).next().is_some() {
        sink.field(SignalField::Media, "audio", Provenance::Semantic, "audio");
    }
    let embeds_video = html.select(&IFRAME_SELECTOR).any(|iframe| {
        iframe
            .value()
            .attr("src")
            .and_then(|src| base.join(src).ok())
            .and_then(|src| src.host_str().map(|host| site_kind::host_matches(host, &hosts.video)))
            .unwrap_or(false)
    });
    if embeds_video {
        sink.field(SignalField::Media, "video", Provenance::Semantic, "iframe[src]");
    }

    if let Some(root) = html.select(&LANG_SELECTOR).next() {
        if let Some(lang) = root.value().attr("lang") {
            sink.field(SignalField::Language, lang, Provenance::Semantic, "html[lang]");
        }
    }
}

// =============================================================================
// Heuristics: byline text and URL shape
// =============================================================================

/// "Translated by X", "Directed by X and Y", "By X" inside byline/credit elements
pub(crate) fn extract_bylines(html: &Html, sink: &mut SignalSink) {
    for byline in html.select(&BYLINE_SELECTOR) {
        let text: String = byline.text().collect::<Vec<_>>().join(" ");
        let Some(text) = crate::utils::text::clean_text(&text) else {
            continue;
        };
        if text.chars().count() > MAX_BYLINE_CHARS {
            continue;
        }

        let credits = parse_credits(&text);
        if credits.is_empty() {
            if let Some(caps) = BYLINE_AUTHOR_REGEX.captures(&text) {
                for name in split_names(&caps[1]) {
                    sink.contributor(&name, Provenance::Heuristic, "byline", None);
                }
            }
            continue;
        }

        for (phrase, names) in credits {
            for name in names {
                sink.contributor(&name, Provenance::Heuristic, "byline", Some(&phrase));
            }
        }
    }
}

/// Split credit text into `(phrase, names)` segments
fn parse_credits(text: &str) -> Vec<(String, Vec<String>)> {
    let matches: Vec<_> = BYLINE_ROLE_REGEX.captures_iter(text).collect();
    let mut credits = Vec::new();

    for (i, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(phrase)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|next| next.start())
            .unwrap_or(text.len());
        let segment = &text[whole.end()..end];
        let segment = segment
            .split(['|', ';', '\n'])
            .next()
            .unwrap_or_default();

        let names = split_names(segment);
        if !names.is_empty() {
            let phrase = phrase.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
            credits.push((phrase.to_lowercase(), names));
        }
    }

    credits
}

fn split_names(segment: &str) -> Vec<String> {
    NAME_SPLIT_REGEX
        .split(segment.trim().trim_end_matches(['.', ',']))
        .map(|name| name.trim().trim_end_matches('.').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Site kind and identifiers recoverable from the URL alone
pub(crate) fn extract_url_shape(url: &Url, hosts: &HostConfig, sink: &mut SignalSink) {
    if let Some(kind) = site_kind::classify_url(url, hosts) {
        sink.field(SignalField::SiteKind, kind, Provenance::Heuristic, "url");
    }

    let Some(host) = url.host_str() else {
        return;
    };
    let path = url.path();

    if on_host(host, "doi.org") || path.contains("/doi/") {
        sink.field(SignalField::Doi, path, Provenance::Heuristic, "url");
    }
    if on_host(host, "arxiv.org") {
        if let Some(id) = path
            .strip_prefix("/abs/")
            .or_else(|| path.strip_prefix("/pdf/"))
        {
            let id = id.trim_end_matches(".pdf");
            sink.field(SignalField::Arxiv, id, Provenance::Heuristic, "url");
        }
    }
    if host == "pubmed.ncbi.nlm.nih.gov" {
        sink.field(SignalField::Pmid, path.trim_matches('/'), Provenance::Heuristic, "url");
    }
    if site_kind::host_matches(host, &hosts.patent) {
        if let Some(number) = path.split('/').filter(|s| !s.is_empty()).nth(1) {
            if path.starts_with("/patent/") {
                sink.field(SignalField::PatentNumber, number, Provenance::Heuristic, "url");
            }
        }
    }
}
