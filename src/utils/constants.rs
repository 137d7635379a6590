//! Shared configuration constants for citation extraction
//!
//! This module contains default values and host tables used throughout the
//! codebase to ensure consistency and avoid magic strings.

/// Micro-blogging hosts whose `/status/` pages are single posts
pub const MICRO_BLOG_HOSTS: &[&str] = &[
    "twitter.com",
    "x.com",
    "mastodon.social",
    "bsky.app",
    "threads.net",
];

/// Code hosting platforms where `/<owner>/<repo>` is a repository
pub const CODE_HOSTING_HOSTS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "codeberg.org",
    "sr.ht",
];

/// Video platforms
pub const VIDEO_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "vimeo.com",
    "dailymotion.com",
    "twitch.tv",
];

/// Patent office and patent search front-ends
pub const PATENT_HOSTS: &[&str] = &[
    "patents.google.com",
    "patents.justia.com",
    "worldwide.espacenet.com",
    "patentscope.wipo.int",
];

/// Encyclopedias and other reference works
pub const REFERENCE_HOSTS: &[&str] = &[
    "wikipedia.org",
    "britannica.com",
    "plato.stanford.edu",
    "scholarpedia.org",
];

/// Title candidates longer than this are treated as page noise
pub const MAX_TITLE_CHARS: usize = 512;

/// Number of title words kept in a citation key
pub const KEY_WORD_LIMIT: usize = 4;

/// Key used when a title has no ASCII words left
pub const FALLBACK_KEY: &str = "untitled";
