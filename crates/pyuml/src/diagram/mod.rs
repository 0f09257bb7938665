//! Class diagram layout and rendering
//!
//! One grid layout feeds two renditions: PNG for files and box-drawing
//! text for terminals.

mod layout;
mod raster;
mod text;

pub use layout::{
    Cell, ClassLayoutAlgorithm, ClassLayoutResult, Direction, PositionedClass,
    PositionedRelationship,
};
pub use raster::{DiagramImage, PixelCanvas, PngRenderer, CELL_HEIGHT, CELL_WIDTH};
pub use text::TextRenderer;
