//! Core error types for the extraction and rendering pipeline
//!
//! The pipeline has exactly two failure kinds: the input is not valid Python
//! ([`ParseError`]) or valid input produced nothing that can be drawn or
//! written ([`RenderError`]). [`DiagramError`] joins them for callers that run
//! both stages in one go.

use thiserror::Error;

/// Invalid source text; carries the location of the first syntax error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error: {message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line of the first error
    pub line: usize,
    /// 1-based column of the first error
    pub column: usize,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Rendering failures
#[derive(Error, Debug)]
pub enum RenderError {
    /// The parse result holds no classes
    #[error("No classes found")]
    EmptyDiagram,

    #[error("Render error: {message}")]
    Encode { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Create a new encoding error
    pub fn encode_error(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Returns true when the failure means "nothing to draw"
    pub fn is_empty_diagram(&self) -> bool {
        matches!(self, RenderError::EmptyDiagram)
    }
}

impl From<png::EncodingError> for RenderError {
    fn from(err: png::EncodingError) -> Self {
        match err {
            png::EncodingError::IoError(source) => RenderError::Io { source },
            other => RenderError::encode_error(other.to_string()),
        }
    }
}

/// Either stage of the pipeline failed
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
