//! Core renderer trait for diagram output
//!
//! This trait defines the interface for rendering a class model
//! into an output format (PNG bytes, terminal text).

use super::{ParseResult, RenderError};

/// Core trait for diagram renderers
///
/// Every renderer fails with [`RenderError::EmptyDiagram`] when the parse
/// result holds no classes.
///
/// # Example
/// ```
/// use pyuml::core::{ClassInfo, ParseResult, Renderer};
/// use pyuml::diagram::TextRenderer;
///
/// let result: ParseResult = [ClassInfo::new("A")].into_iter().collect();
/// let output = TextRenderer::new().render(&result).unwrap();
/// assert!(output.contains('A'));
/// ```
pub trait Renderer: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the parse result into the output format
    fn render(&self, result: &ParseResult) -> Result<Self::Output, RenderError>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
