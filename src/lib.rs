//! Citation classification and normalization for web pages
//!
//! Extracts provenance-weighted metadata signals from an HTML document,
//! classifies the page into a fixed entry-type taxonomy, synthesizes the
//! parent container, assigns contributor roles and renders the result as a
//! YAML bibliography.

pub mod citation;
pub mod page_extractor;
mod pipeline;
pub mod serializer;
mod utils;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use utils::constants::{
    CODE_HOSTING_HOSTS, MAX_TITLE_CHARS, MICRO_BLOG_HOSTS, PATENT_HOSTS, REFERENCE_HOSTS,
    VIDEO_HOSTS,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub hosts: HostConfig,
}

/// Extraction pass tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Scan visible byline/credit text for contributors
    #[serde(default = "default_body_heuristics")]
    pub body_heuristics: bool,

    /// Title candidates longer than this are discarded
    #[serde(default = "default_max_title_chars")]
    pub max_title_chars: usize,
}

/// Host tables behind the URL-shape site-kind rules
///
/// Entries match the host exactly or any of its subdomains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default = "default_micro_blog_hosts")]
    pub micro_blog: Vec<String>,

    #[serde(default = "default_code_hosting_hosts")]
    pub code_hosting: Vec<String>,

    #[serde(default = "default_video_hosts")]
    pub video: Vec<String>,

    #[serde(default = "default_patent_hosts")]
    pub patent: Vec<String>,

    #[serde(default = "default_reference_hosts")]
    pub reference: Vec<String>,
}

fn default_body_heuristics() -> bool {
    true
}

fn default_max_title_chars() -> usize {
    MAX_TITLE_CHARS
}

fn hosts(table: &[&str]) -> Vec<String> {
    table.iter().map(|host| host.to_string()).collect()
}

fn default_micro_blog_hosts() -> Vec<String> {
    hosts(MICRO_BLOG_HOSTS)
}
fn default_code_hosting_hosts() -> Vec<String> {
    hosts(CODE_HOSTING_HOSTS)
}
fn default_video_hosts() -> Vec<String> {
    hosts(VIDEO_HOSTS)
}
fn default_patent_hosts() -> Vec<String> {
    hosts(PATENT_HOSTS)
}
fn default_reference_hosts() -> Vec<String> {
    hosts(REFERENCE_HOSTS)
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            body_heuristics: default_body_heuristics(),
            max_title_chars: default_max_title_chars(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            micro_blog: default_micro_blog_hosts(),
            code_hosting: default_code_hosting_hosts(),
            video: default_video_hosts(),
            patent: default_patent_hosts(),
            reference: default_reference_hosts(),
        }
    }
}

/// Load config from a YAML file; a missing file yields the defaults
pub fn load_yaml_config(config_path: &Path) -> anyhow::Result<Config> {
    if config_path.exists() {
        let contents = fs::read_to_string(config_path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

/// `<config dir>/kodegen/citation.yaml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kodegen").join("citation.yaml"))
}

pub use citation::{
    Citation, CitationDate, Contributor, DEFAULT_PARENTS, EntryType, IdentifierKind,
    PARENT_OVERRIDES, ROLE_PHRASES, Role, assign_roles, build_citation, classify, resolve_parent,
};
pub use page_extractor::{
    PageDocument, Provenance, Signal, SignalBag, SignalField, extract_page_signals,
};
pub use pipeline::{CitationPipeline, citation_from_signals, generate_citation};
pub use serializer::{from_yaml, to_yaml};
pub use utils::{CitationError, CitationResult, ExtractionError, ExtractionResult};
