//! Page signal extraction module
//!
//! Parses an HTML document with `scraper` and collects provenance-tagged
//! candidate values (titles, contributors, dates, identifiers, type hints)
//! into a [`SignalBag`] for the classification pipeline.

pub mod extractors;
pub mod identifiers;
pub mod page_info;
pub mod schema;

// Re-export commonly used types
pub use page_info::{PageDocument, extract_page_signals, extract_signals};
pub use schema::{Provenance, Signal, SignalBag, SignalField};

/// Site kinds inferred from URL shape
///
/// Emitted as [`SignalField::SiteKind`] values by the heuristic pass and
/// consumed by the classifier's site-kind rule.
pub mod site_kind {
    use url::Url;

    use crate::HostConfig;

    pub const MICRO_BLOG_POST: &str = "micro-blog-post";
    pub const REPOSITORY: &str = "repository";
    pub const VIDEO: &str = "video";
    pub const PATENT: &str = "patent";
    pub const REFERENCE_ENTRY: &str = "reference-entry";

    /// First path segments on code hosts that are site pages, not repositories
    const CODE_HOST_RESERVED: &[&str] = &[
        "about", "explore", "features", "login", "marketplace", "orgs", "pricing", "search",
        "settings", "signup", "sponsors", "topics", "users",
    ];

    /// First path segments on video hosts that are listings, not videos
    const VIDEO_HOST_LISTINGS: &[&str] = &[
        "c", "channel", "directory", "feed", "playlist", "results", "search", "user",
    ];

    /// `host` equals a candidate or is a subdomain of it (`www.` and `m.` included)
    pub fn host_matches(host: &str, candidates: &[String]) -> bool {
        let host = host.to_ascii_lowercase();
        candidates.iter().any(|candidate| {
            let candidate = candidate.trim().to_ascii_lowercase();
            !candidate.is_empty()
                && (host == candidate || host.ends_with(&format!(".{candidate}")))
        })
    }

    /// Site kind for a page URL, if its host and path identify one
    pub fn classify_url(url: &Url, hosts: &HostConfig) -> Option<&'static str> {
        let host = url.host_str()?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        if host_matches(host, &hosts.micro_blog) {
            let is_post = segments
                .iter()
                .any(|s| matches!(*s, "status" | "statuses" | "post"))
                || (segments.len() == 2
                    && segments[0].starts_with('@')
                    && segments[1].chars().all(|c| c.is_ascii_digit()));
            return is_post.then_some(MICRO_BLOG_POST);
        }

        if host_matches(host, &hosts.code_hosting) {
            let is_repo = segments.len() >= 2 && !CODE_HOST_RESERVED.contains(&segments[0]);
            return is_repo.then_some(REPOSITORY);
        }

        if host_matches(host, &hosts.video) {
            let watch_query = url.query_pairs().any(|(key, _)| key == "v");
            let is_video = watch_query
                || segments.first().is_some_and(|first| {
                    *first != "watch"
                        && !first.starts_with('@')
                        && !VIDEO_HOST_LISTINGS.contains(first)
                });
            return is_video.then_some(VIDEO);
        }

        if host_matches(host, &hosts.patent) {
            return (!segments.is_empty()).then_some(PATENT);
        }

        if host_matches(host, &hosts.reference) {
            let is_entry = match segments.as_slice() {
                ["wiki", article, ..] => !article.contains(':'),
                [] => false,
                [first, ..] => *first != "index.php" && *first != "search",
            };
            return is_entry.then_some(REFERENCE_ENTRY);
        }

        None
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn kind(url: &str) -> Option<&'static str> {
            classify_url(&Url::parse(url).unwrap(), &HostConfig::default())
        }

        #[test]
        fn micro_blog_posts_need_a_status_path() {
            assert_eq!(kind("https://twitter.com/jack/status/20"), Some(MICRO_BLOG_POST));
            assert_eq!(kind("https://mastodon.social/@alice/109876543210"), Some(MICRO_BLOG_POST));
            assert_eq!(kind("https://twitter.com/jack"), None);
        }

        #[test]
        fn repositories_have_owner_and_name() {
            assert_eq!(kind("https://github.com/rust-lang/rust"), Some(REPOSITORY));
            assert_eq!(kind("https://github.com/rust-lang"), None);
            assert_eq!(kind("https://github.com/topics/parser"), None);
        }

        #[test]
        fn video_pages_and_listings() {
            assert_eq!(kind("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), Some(VIDEO));
            assert_eq!(kind("https://youtu.be/dQw4w9WgXcQ"), Some(VIDEO));
            assert_eq!(kind("https://vimeo.com/76979871"), Some(VIDEO));
            assert_eq!(kind("https://www.youtube.com/channel/UC123"), None);
        }

        #[test]
        fn reference_entries_and_patents() {
            assert_eq!(kind("https://en.wikipedia.org/wiki/Rust"), Some(REFERENCE_ENTRY));
            assert_eq!(kind("https://en.wikipedia.org/wiki/Special:Search"), None);
            assert_eq!(kind("https://patents.google.com/patent/US7654321B2/en"), Some(PATENT));
        }

        #[test]
        fn subdomains_match_but_lookalikes_do_not() {
            let hosts = vec!["github.com".to_string()];
            assert!(host_matches("gist.github.com", &hosts));
            assert!(!host_matches("notgithub.com", &hosts));
        }

        #[test]
        fn unknown_hosts_have_no_kind() {
            assert_eq!(kind("https://example.com/a/b"), None);
        }
    }
}
