//! Identifier normalization
//!
//! Candidates are normalized when they enter the bag so every later stage
//! sees one canonical spelling. Values that fail validation are dropped.

use once_cell::sync::Lazy;
use regex::Regex;

use super::schema::SignalField;

static DOI_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(10\.\d{4,9}/[^\s\x22<>]+)").expect("doi regex"));

static ISSN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-?(\d{3}[\dXx])$").expect("issn regex"));

static ARXIV_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:arxiv:)?(\d{4}\.\d{4,5}(?:v\d+)?|[a-z\-]+(?:\.[A-Z]{2})?/\d{7}(?:v\d+)?)$")
        .expect("arxiv regex")
});

static PMID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,9}$").expect("pmid regex"));

/// Canonical DOI (`10.xxxx/...`) from a bare DOI, `doi:` form or resolver URL
pub fn normalize_doi(raw: &str) -> Option<String> {
    let caps = DOI_REGEX.captures(raw.trim())?;
    let doi = caps[1].trim_end_matches(['.', ',', ';', ')']);
    Some(doi.to_string())
}

/// ISBN-10 or ISBN-13 digits with separators removed, checksum verified
pub fn normalize_isbn(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix("ISBN")
        .or_else(|| raw.strip_prefix("isbn"))
        .unwrap_or(raw)
        .trim_start_matches([':', ' ']);

    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let valid = match compact.len() {
        10 => isbn10_checksum(&compact),
        13 => isbn13_checksum(&compact),
        _ => false,
    };
    valid.then_some(compact)
}

fn isbn10_checksum(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let value = match c {
            '0'..='9' => c.to_digit(10).unwrap_or(0),
            'X' if i == 9 => 10,
            _ => return false,
        };
        sum += value * (10 - i as u32);
    }
    sum % 11 == 0
}

fn isbn13_checksum(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { digit } else { digit * 3 };
    }
    sum % 10 == 0
}

/// ISSN in `NNNN-NNNC` form
pub fn normalize_issn(raw: &str) -> Option<String> {
    let caps = ISSN_REGEX.captures(raw.trim())?;
    Some(format!("{}-{}", &caps[1], caps[2].to_ascii_uppercase()))
}

pub fn normalize_arxiv(raw: &str) -> Option<String> {
    let caps = ARXIV_REGEX.captures(raw.trim())?;
    Some(caps[1].to_string())
}

pub fn normalize_pmid(raw: &str) -> Option<String> {
    let raw = raw.trim();
    PMID_REGEX.is_match(raw).then(|| raw.to_string())
}

/// Patent numbers keep their office prefix; only spacing is removed
pub fn normalize_patent(raw: &str) -> Option<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let has_digit = compact.chars().any(|c| c.is_ascii_digit());
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | ',' | '/');
    (has_digit && compact.chars().all(allowed)).then_some(compact)
}

/// Normalize a value already known to belong to an identifier field
///
/// Non-identifier fields pass through unchanged.
pub fn normalize(field: SignalField, raw: &str) -> Option<String> {
    match field {
        SignalField::Doi => normalize_doi(raw),
        SignalField::Isbn => normalize_isbn(raw),
        SignalField::Issn => normalize_issn(raw),
        SignalField::Arxiv => normalize_arxiv(raw),
        SignalField::Pmid => normalize_pmid(raw),
        SignalField::PatentNumber => normalize_patent(raw),
        _ => Some(raw.to_string()),
    }
}

/// Recognize the kind of a free-form identifier (e.g. `dc.identifier`)
pub fn sniff(raw: &str) -> Option<(SignalField, String)> {
    let trimmed = raw.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("doi:") || lower.contains("doi.org/") || lower.starts_with("10.") {
        return normalize_doi(trimmed).map(|doi| (SignalField::Doi, doi));
    }
    if lower.starts_with("isbn") {
        return normalize_isbn(trimmed).map(|isbn| (SignalField::Isbn, isbn));
    }
    if lower.starts_with("arxiv:") {
        return normalize_arxiv(trimmed).map(|id| (SignalField::Arxiv, id));
    }
    if let Some(issn) = lower.strip_prefix("issn") {
        return normalize_issn(issn.trim_start_matches([':', ' '])).map(|v| (SignalField::Issn, v));
    }
    if let Some(issn) = normalize_issn(trimmed) {
        return Some((SignalField::Issn, issn));
    }
    normalize_isbn(trimmed).map(|isbn| (SignalField::Isbn, isbn))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_forms_normalize_to_bare_doi() {
        for raw in [
            "10.1038/nature14539",
            "doi:10.1038/nature14539",
            "https://doi.org/10.1038/nature14539",
            "http://dx.doi.org/10.1038/nature14539.",
        ] {
            assert_eq!(normalize_doi(raw).as_deref(), Some("10.1038/nature14539"), "{raw}");
        }
        assert_eq!(normalize_doi("not a doi"), None);
    }

    #[test]
    fn isbn_checksums_are_verified() {
        assert_eq!(normalize_isbn("978-0-262-03561-3").as_deref(), Some("9780262035613"));
        assert_eq!(normalize_isbn("ISBN: 0-306-40615-2").as_deref(), Some("0306406152"));
        assert_eq!(normalize_isbn("0-8044-2957-x").as_deref(), Some("080442957X"));
        assert_eq!(normalize_isbn("978-0-262-03561-4"), None);
        assert_eq!(normalize_isbn("12345"), None);
    }

    #[test]
    fn issn_gets_hyphen_and_uppercase_check_digit() {
        assert_eq!(normalize_issn("0028-0836").as_deref(), Some("0028-0836"));
        assert_eq!(normalize_issn("2049363x").as_deref(), Some("2049-363X"));
        assert_eq!(normalize_issn("2049-36"), None);
    }

    #[test]
    fn arxiv_and_pmid() {
        assert_eq!(normalize_arxiv("arXiv:1706.03762v5").as_deref(), Some("1706.03762v5"));
        assert_eq!(normalize_arxiv("hep-th/9901001").as_deref(), Some("hep-th/9901001"));
        assert_eq!(normalize_pmid(" 31452104 ").as_deref(), Some("31452104"));
        assert_eq!(normalize_pmid("PMC123"), None);
    }

    #[test]
    fn sniff_recognizes_free_form_identifiers() {
        assert_eq!(
            sniff("doi:10.1000/182"),
            Some((SignalField::Doi, "10.1000/182".to_string()))
        );
        assert_eq!(
            sniff("ISSN 1234-5679"),
            Some((SignalField::Issn, "1234-5679".to_string()))
        );
        assert_eq!(
            sniff("978-0-262-03561-3"),
            Some((SignalField::Isbn, "9780262035613".to_string()))
        );
        assert_eq!(sniff("urn:uuid:1234"), None);
    }
}
