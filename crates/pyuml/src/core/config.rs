//! Rendering configuration
//!
//! [`RenderConfig`] carries every knob shared by the layout and the
//! renderers. All fields have defaults; the `with_*` builders override them.

use std::fmt;

/// Character set for the terminal rendition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharacterSet {
    /// Pure ASCII characters only: + - | < > ^ v
    Ascii,
    /// Unicode box-drawing characters: ┌ ┐ └ ┘ ─ │ △
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

/// Default figure title
pub const DEFAULT_TITLE: &str = "Class Diagram";

/// Shared configuration for layout and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Glyphs used by the terminal rendition
    pub style: CharacterSet,
    /// Title drawn above the diagram, if any
    pub title: Option<String>,
    /// Upper bound on grid columns
    pub max_columns: usize,
    /// Pixel scale factor for raster output
    pub scale: u32,
    /// Member labels wider than this are truncated (0 = never)
    pub max_label_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style: CharacterSet::default(),
            title: Some(DEFAULT_TITLE.to_string()),
            max_columns: 5,
            scale: 2,
            max_label_width: 40,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: CharacterSet) -> Self {
        self.style = style;
        self
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Set the column limit (at least one column)
    pub fn with_max_columns(mut self, max_columns: usize) -> Self {
        self.max_columns = max_columns.max(1);
        self
    }

    /// Set the pixel scale (at least 1)
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.max(1);
        self
    }

    pub fn with_max_label_width(mut self, max_label_width: usize) -> Self {
        self.max_label_width = max_label_width;
        self
    }
}
