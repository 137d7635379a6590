// Shared error types and default tables
pub mod constants;
mod errors;
pub(crate) mod text;

pub use errors::{CitationError, CitationResult, ExtractionError, ExtractionResult};
