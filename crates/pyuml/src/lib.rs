//! pyuml - Class diagrams from Python source
//!
//! Extracts classes, attributes, methods and inheritance from Python source
//! and renders them as a class diagram, either as a PNG image or as
//! box-drawing text for the terminal.
//!
//! # Quick Start
//!
//! ```rust
//! use pyuml::{extract, render};
//!
//! let source = "class Animal:\n    pass\n\nclass Dog(Animal):\n    pass\n";
//! let result = extract(source).unwrap();
//! let png = render(&result).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use pyuml::prelude::*;
//!
//! let source = "class Shape:\n    def area(self):\n        return 0\n";
//!
//! // Extract the class model
//! let result = PythonExtractor::new().extract(source).unwrap();
//! assert_eq!(result.get("Shape").unwrap().methods[0].name, "area");
//!
//! // Render for the terminal in plain ASCII
//! let config = RenderConfig::new().with_style(CharacterSet::Ascii);
//! let text = TextRenderer::with_config(config).render(&result).unwrap();
//! assert!(text.contains("+ area()"));
//! ```

pub mod core;
pub mod diagram;
pub mod python;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

pub use crate::core::*;
pub use crate::diagram::DiagramImage;

use crate::diagram::{PngRenderer, TextRenderer};
use crate::python::PythonExtractor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CharacterSet, ClassInfo, DiagramError, Extractor, Inheritance, LayoutAlgorithm,
        MethodInfo, ParseError, ParseResult, RenderConfig, RenderError, Renderer,
    };
    pub use crate::diagram::{ClassLayoutAlgorithm, DiagramImage, PngRenderer, TextRenderer};
    pub use crate::python::PythonExtractor;
}

/// Extract the class model from Python source
///
/// # Example
/// ```rust
/// let result = pyuml::extract("class A:\n    x = 1\n").unwrap();
/// assert_eq!(result.classes()[0].attributes, vec!["x"]);
///
/// let err = pyuml::extract("class A(:\n").unwrap_err();
/// assert_eq!(err.line, 1);
/// ```
pub fn extract(source: &str) -> Result<ParseResult, ParseError> {
    PythonExtractor::new().extract(source)
}

/// Render a parse result to PNG bytes with the default configuration
pub fn render(result: &ParseResult) -> Result<Vec<u8>, RenderError> {
    render_with_config(result, &RenderConfig::default())
}

/// Render a parse result to PNG bytes
pub fn render_with_config(
    result: &ParseResult,
    config: &RenderConfig,
) -> Result<Vec<u8>, RenderError> {
    PngRenderer::with_config(config.clone()).render(result)
}

/// Render a parse result to an in-memory image
///
/// This is the displayable form of the diagram; [`render`] produces the
/// same picture encoded as PNG.
pub fn render_image(result: &ParseResult) -> Result<DiagramImage, RenderError> {
    render_image_with_config(result, &RenderConfig::default())
}

pub fn render_image_with_config(
    result: &ParseResult,
    config: &RenderConfig,
) -> Result<DiagramImage, RenderError> {
    PngRenderer::with_config(config.clone()).render_image(result)
}

/// Render a parse result as box-drawing text
///
/// # Example
/// ```rust
/// let result = pyuml::extract("class Node:\n    value = None\n").unwrap();
/// let text = pyuml::render_text(&result).unwrap();
/// assert!(text.contains("- value"));
/// ```
pub fn render_text(result: &ParseResult) -> Result<String, RenderError> {
    render_text_with_config(result, &RenderConfig::default())
}

pub fn render_text_with_config(
    result: &ParseResult,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    TextRenderer::with_config(config.clone()).render(result)
}

/// Render a parse result and write it as a PNG file
///
/// The image is written to a temporary file next to `path` and renamed
/// over it, so an existing file is either fully replaced or left alone.
pub fn save_png(result: &ParseResult, path: impl AsRef<Path>) -> Result<(), RenderError> {
    save_png_with_config(result, path, &RenderConfig::default())
}

pub fn save_png_with_config(
    result: &ParseResult,
    path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    let bytes = render_with_config(result, config)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(&bytes)?;
    file.flush()?;
    file.persist(path).map_err(|err| err.error)?;

    info!(path = %path.display(), bytes = bytes.len(), "Diagram saved");
    Ok(())
}

/// Extract and render in one step
///
/// # Example
/// ```rust
/// use pyuml::DiagramError;
///
/// let png = pyuml::generate("class A:\n    pass\n").unwrap();
/// assert!(!png.is_empty());
///
/// let err = pyuml::generate("x = 1\n").unwrap_err();
/// assert!(matches!(err, DiagramError::Render(ref e) if e.is_empty_diagram()));
/// ```
pub fn generate(source: &str) -> Result<Vec<u8>, DiagramError> {
    let result = extract(source)?;
    Ok(render(&result)?)
}
