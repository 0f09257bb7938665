//! Core layout trait for diagram positioning
//!
//! This trait defines the interface for arranging diagram elements
//! on a grid of character cells shared by every renderer.

use super::{ParseResult, RenderError};

/// Core trait for layout algorithms
///
/// # Example
/// ```
/// use pyuml::core::{ClassInfo, LayoutAlgorithm, ParseResult};
/// use pyuml::diagram::ClassLayoutAlgorithm;
///
/// let result: ParseResult = [ClassInfo::new("A")].into_iter().collect();
/// let layout = ClassLayoutAlgorithm::new();
/// let positioned = layout.layout(&result).unwrap();
/// assert_eq!(positioned.classes.len(), 1);
/// ```
pub trait LayoutAlgorithm: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange the classes of a parse result
    fn layout(&self, result: &ParseResult) -> Result<Self::Output, RenderError>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;
}
