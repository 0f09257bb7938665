//! Core abstractions for class diagram generation
//!
//! This module defines the class model, the error types, and the traits each
//! pipeline stage implements: extraction, layout and rendering.

mod box_drawing;
mod canvas;
mod config;
mod error;
mod extractor;
mod layout;
pub mod logging;
mod model;
mod renderer;
mod text;
mod visitor;

pub use box_drawing::*;
pub use canvas::*;
pub use config::*;
pub use error::*;
pub use extractor::*;
pub use layout::*;
pub use logging::*;
pub use model::*;
pub use renderer::*;
pub use text::*;
pub use visitor::*;
