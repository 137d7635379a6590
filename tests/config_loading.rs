//! Config file loading and its effect on extraction

use std::io::Write;

use kodegen_tools_citation::{CitationPipeline, EntryType, Role, load_yaml_config};

const VIDEO_PAGE: &str = r#"<html><head><title>Community talk</title></head>
<body><p class="credits">Directed by Ana Ruiz</p></body></html>"#;

#[test]
fn yaml_file_overrides_host_tables() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "hosts:\n  video:\n    - peertube.example").unwrap();

    let config = load_yaml_config(file.path()).unwrap();
    assert_eq!(config.hosts.video, vec!["peertube.example".to_string()]);
    assert!(config.extraction.body_heuristics);

    let pipeline = CitationPipeline::new(config);
    let citation = pipeline
        .run(VIDEO_PAGE, "https://videos.peertube.example/w/9c9de5e8")
        .unwrap();
    assert_eq!(citation.entry_type(), EntryType::Video);
    assert_eq!(citation.contributors()[0].role, Some(Role::Director));
}

#[test]
fn disabling_body_heuristics_drops_byline_credits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("citation.yaml");
    std::fs::write(&path, "extraction:\n  body_heuristics: false\n").unwrap();

    let pipeline = CitationPipeline::new(load_yaml_config(&path).unwrap());
    let citation = pipeline.run(VIDEO_PAGE, "https://example.com/talk").unwrap();
    assert_eq!(citation.entry_type(), EntryType::Web);
    assert!(citation.contributors().is_empty());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_yaml_config(&dir.path().join("absent.yaml")).unwrap();
    assert_eq!(config.extraction.max_title_chars, 512);
    assert!(config.hosts.micro_blog.contains(&"twitter.com".to_string()));
}

#[test]
fn malformed_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "extraction: [not, a, mapping]").unwrap();
    assert!(load_yaml_config(file.path()).is_err());
}
