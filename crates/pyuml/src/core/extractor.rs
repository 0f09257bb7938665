//! Core extractor trait for source code
//!
//! This trait defines the interface for turning raw source text into the
//! class model that the diagram stages consume.

use super::{ParseError, ParseResult};

/// Core trait for code model extractors
///
/// Extraction is all-or-nothing: invalid input yields a [`ParseError`] and
/// never a partial result.
///
/// # Example
/// ```
/// use pyuml::core::Extractor;
/// use pyuml::python::PythonExtractor;
///
/// let extractor = PythonExtractor::new();
/// let result = extractor.extract("class A:\n    pass\n").unwrap();
/// assert_eq!(result.len(), 1);
/// ```
pub trait Extractor: Send + Sync {
    /// Extract the class model from source text
    fn extract(&self, source: &str) -> Result<ParseResult, ParseError>;

    /// Get the name of this extractor
    fn name(&self) -> &'static str;

    /// Get the version of this extractor
    fn version(&self) -> &'static str;
}
