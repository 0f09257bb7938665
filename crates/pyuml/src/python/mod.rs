//! Python source support
//!
//! Implements the code model extractor on top of tree-sitter.

mod extractor;
pub mod syntax;

pub use extractor::PythonExtractor;
