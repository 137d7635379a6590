use thiserror::Error;

/// Errors raised while turning a page into a signal bag
///
/// Only an untraversable input is an error. Missing or partial metadata is
/// represented as absent signals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Document is empty or has no element content")]
    EmptyDocument,

    #[error("Invalid page URL: {0}")]
    InvalidUrl(String),

    #[error("Page URL must be absolute: {0}")]
    RelativeUrl(String),
}

/// Errors returned by the classify-and-build pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CitationError {
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("No title signal found on page")]
    MissingTitle,

    #[error("YAML error: {0}")]
    Yaml(String),
}

/// Implement From<serde_yaml::Error> for CitationError
impl From<serde_yaml::Error> for CitationError {
    fn from(err: serde_yaml::Error) -> Self {
        CitationError::Yaml(err.to_string())
    }
}

/// Implement From<url::ParseError> for ExtractionError
impl From<url::ParseError> for ExtractionError {
    fn from(err: url::ParseError) -> Self {
        match err {
            url::ParseError::RelativeUrlWithoutBase => {
                ExtractionError::RelativeUrl(err.to_string())
            }
            other => ExtractionError::InvalidUrl(other.to_string()),
        }
    }
}

pub type CitationResult<T> = Result<T, CitationError>;
pub type ExtractionResult<T> = Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_url_maps_to_relative_variant() {
        let err = url::Url::parse("/just/a/path").unwrap_err();
        assert!(matches!(
            ExtractionError::from(err),
            ExtractionError::RelativeUrl(_)
        ));
    }

    #[test]
    fn extraction_error_converts_into_citation_error() {
        let err: CitationError = ExtractionError::EmptyDocument.into();
        assert_eq!(
            err.to_string(),
            "Extraction failed: Document is empty or has no element content"
        );
    }
}
