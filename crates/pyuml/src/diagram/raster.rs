//! Raster rendition of class diagrams
//!
//! Maps the character-cell layout onto pixels: one cell is
//! [`CELL_WIDTH`] x [`CELL_HEIGHT`] pixels before scaling, which fits the
//! 7x13 bitmap font. Drawing goes through `embedded-graphics` onto an RGB
//! buffer that is encoded as PNG.
//!
//! The font covers ISO 8859-1 only. Other characters in identifiers are
//! drawn as the font's replacement glyph, and double-width characters get
//! one glyph in the two cells the layout reserves for them.

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        iso_8859_1::{FONT_7X13, FONT_7X13_BOLD},
        MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, Triangle},
    text::{Baseline, Text},
};
use tracing::{debug, span, Level};

use super::layout::{
    Cell, ClassLayoutAlgorithm, ClassLayoutResult, Direction, PositionedClass,
    PositionedRelationship,
};
use crate::core::{
    display_width, LayoutAlgorithm, ParseResult, RenderConfig, RenderError, Renderer,
};

/// Unscaled pixel width of one layout cell
pub const CELL_WIDTH: u32 = 7;
/// Unscaled pixel height of one layout cell
pub const CELL_HEIGHT: u32 = 16;

const TEXT_OFFSET_Y: i32 = 2;
const ARROW_LENGTH: i32 = 10;
const ARROW_HALF_WIDTH: i32 = 5;

const BACKGROUND: Rgb888 = Rgb888::new(255, 255, 255);
const NODE_FILL: Rgb888 = Rgb888::new(230, 243, 247);
const STROKE: Rgb888 = Rgb888::new(0, 0, 0);

/// RGB pixel buffer that paints each logical pixel as a `scale` x `scale`
/// block
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    scale: u32,
    pixels: Vec<u8>,
}

impl PixelCanvas {
    /// Create a canvas of `width` x `height` logical pixels
    pub fn new(width: u32, height: u32, scale: u32, background: Rgb888) -> Self {
        let scale = scale.max(1);
        let len = (width * scale) as usize * (height * scale) as usize;
        let mut pixels = Vec::with_capacity(len * 3);
        for _ in 0..len {
            pixels.extend_from_slice(&[background.r(), background.g(), background.b()]);
        }
        Self {
            width,
            height,
            scale,
            pixels,
        }
    }

    pub fn pixel_width(&self) -> u32 {
        self.width * self.scale
    }

    pub fn pixel_height(&self) -> u32 {
        self.height * self.scale
    }

    fn put(&mut self, point: Point, color: Rgb888) {
        if point.x < 0 || point.y < 0 {
            return;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= self.width || y >= self.height {
            return;
        }

        let stride = self.pixel_width() as usize;
        for dy in 0..self.scale {
            let row = (y * self.scale + dy) as usize;
            for dx in 0..self.scale {
                let column = (x * self.scale + dx) as usize;
                let offset = (row * stride + column) * 3;
                self.pixels[offset..offset + 3].copy_from_slice(&[color.r(), color.g(), color.b()]);
            }
        }
    }

    fn into_image(self, node_count: usize, edge_count: usize) -> DiagramImage {
        DiagramImage {
            width: self.pixel_width(),
            height: self.pixel_height(),
            pixels: self.pixels,
            node_count,
            edge_count,
        }
    }
}

impl DrawTarget for PixelCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.put(point, color);
        }
        Ok(())
    }
}

impl OriginDimensions for PixelCanvas {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A rendered diagram held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major 8-bit RGB triples
    pub pixels: Vec<u8>,
    pub node_count: usize,
    pub edge_count: usize,
}

impl DiagramImage {
    /// Color of one pixel, if inside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels
            .get(offset..offset + 3)
            .map(|rgb| [rgb[0], rgb[1], rgb[2]])
    }

    /// Encode as an 8-bit RGB PNG
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, self.width, self.height);
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
            writer.finish()?;
        }
        Ok(bytes)
    }
}

/// Pixel center of a cell
fn center((x, y): Cell) -> Point {
    Point::new(
        (x as u32 * CELL_WIDTH + CELL_WIDTH / 2) as i32,
        (y as u32 * CELL_HEIGHT + CELL_HEIGHT / 2) as i32,
    )
}

/// Top-left pixel of a text run starting at a cell
fn text_origin((x, y): Cell) -> Point {
    Point::new(
        (x as u32 * CELL_WIDTH) as i32,
        (y as u32 * CELL_HEIGHT) as i32 + TEXT_OFFSET_Y,
    )
}

/// One cell step in pixels
fn cell_step(direction: Direction) -> Point {
    let (w, h) = (CELL_WIDTH as i32, CELL_HEIGHT as i32);
    match direction {
        Direction::Up => Point::new(0, -h),
        Direction::Down => Point::new(0, h),
        Direction::Left => Point::new(-w, 0),
        Direction::Right => Point::new(w, 0),
    }
}

/// Unit vector of a direction
fn unit(direction: Direction) -> Point {
    match direction {
        Direction::Up => Point::new(0, -1),
        Direction::Down => Point::new(0, 1),
        Direction::Left => Point::new(-1, 0),
        Direction::Right => Point::new(1, 0),
    }
}

fn centered_start(x: usize, width: usize, text: &str) -> usize {
    x + width.saturating_sub(display_width(text)) / 2
}

/// PNG renderer for class diagrams
pub struct PngRenderer {
    config: RenderConfig,
}

impl PngRenderer {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Lay out and rasterize a parse result
    pub fn render_image(&self, result: &ParseResult) -> Result<DiagramImage, RenderError> {
        let render_span = span!(Level::DEBUG, "render_raster", classes = result.len());
        let _enter = render_span.enter();

        let layout = ClassLayoutAlgorithm::with_config(self.config.clone()).layout(result)?;
        let image = self.render_layout(&layout);

        debug!(
            width = image.width,
            height = image.height,
            "Raster rendering completed"
        );
        Ok(image)
    }

    /// Rasterize an existing layout
    pub fn render_layout(&self, layout: &ClassLayoutResult) -> DiagramImage {
        let mut canvas = PixelCanvas::new(
            layout.width as u32 * CELL_WIDTH,
            layout.height as u32 * CELL_HEIGHT,
            self.config.scale,
            BACKGROUND,
        );

        draw_diagram(&mut canvas, layout).unwrap_or_else(|never| match never {});
        canvas.into_image(layout.classes.len(), layout.relationships.len())
    }
}

fn draw_diagram(canvas: &mut PixelCanvas, layout: &ClassLayoutResult) -> Result<(), Infallible> {
    if let Some(title) = &layout.title {
        let x = centered_start(0, layout.width, title);
        let style = MonoTextStyle::new(&FONT_7X13_BOLD, STROKE);
        Text::with_baseline(
            title,
            text_origin((x, ClassLayoutResult::TITLE_Y)),
            style,
            Baseline::Top,
        )
        .draw(canvas)?;
    }

    for class in &layout.classes {
        draw_class(canvas, class)?;
    }
    for relationship in &layout.relationships {
        draw_relationship(canvas, relationship)?;
    }
    Ok(())
}

fn draw_class(canvas: &mut PixelCanvas, class: &PositionedClass) -> Result<(), Infallible> {
    let box_style = PrimitiveStyleBuilder::new()
        .fill_color(NODE_FILL)
        .stroke_color(STROKE)
        .stroke_width(1)
        .build();
    let line_style = PrimitiveStyle::with_stroke(STROKE, 1);

    // Borders run through the centers of the outermost cells
    let top_left = center((class.x, class.y));
    let bottom_right = center((class.right(), class.bottom()));
    Rectangle::with_corners(top_left, bottom_right)
        .into_styled(box_style)
        .draw(canvas)?;

    for separator in [class.attribute_separator_y(), class.method_separator_y()] {
        let y = center((class.x, separator)).y;
        Line::new(Point::new(top_left.x, y), Point::new(bottom_right.x, y))
            .into_styled(line_style)
            .draw(canvas)?;
    }

    let name_x = centered_start(class.x + 1, class.width - 2, &class.name);
    let bold = MonoTextStyle::new(&FONT_7X13_BOLD, STROKE);
    Text::with_baseline(
        &class.name,
        text_origin((name_x, class.header_y())),
        bold,
        Baseline::Top,
    )
    .draw(canvas)?;

    let regular = MonoTextStyle::new(&FONT_7X13, STROKE);
    let attribute_rows = class.attribute_separator_y() + 1..;
    let method_rows = class.method_separator_y() + 1..;
    let labels = attribute_rows
        .zip(&class.attributes)
        .chain(method_rows.zip(&class.methods));
    for (row, label) in labels {
        Text::with_baseline(label, text_origin((class.x + 2, row)), regular, Baseline::Top)
            .draw(canvas)?;
    }

    Ok(())
}

fn draw_relationship(
    canvas: &mut PixelCanvas,
    relationship: &PositionedRelationship,
) -> Result<(), Infallible> {
    let (Some(start), Some(end)) = (
        relationship.start_direction(),
        relationship.arrow_direction(),
    ) else {
        return Ok(());
    };

    let mut points: Vec<Point> = relationship.points.iter().map(|c| center(*c)).collect();
    let Some(last) = points.last().copied() else {
        return Ok(());
    };

    // Reach back to the child's border and forward to the parent's
    let tip = last + cell_step(end);
    let base = tip - unit(end) * ARROW_LENGTH;
    if let Some(first) = points.first_mut() {
        *first -= cell_step(start);
    }
    if let Some(last) = points.last_mut() {
        *last = base;
    }

    let line_style = PrimitiveStyle::with_stroke(STROKE, 1);
    for pair in points.windows(2) {
        Line::new(pair[0], pair[1])
            .into_styled(line_style)
            .draw(canvas)?;
    }

    let side = match end {
        Direction::Up | Direction::Down => Point::new(ARROW_HALF_WIDTH, 0),
        Direction::Left | Direction::Right => Point::new(0, ARROW_HALF_WIDTH),
    };
    let arrow_style = PrimitiveStyleBuilder::new()
        .fill_color(BACKGROUND)
        .stroke_color(STROKE)
        .stroke_width(1)
        .build();
    Triangle::new(tip, base + side, base - side)
        .into_styled(arrow_style)
        .draw(canvas)?;

    Ok(())
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PngRenderer {
    type Output = Vec<u8>;

    fn render(&self, result: &ParseResult) -> Result<Vec<u8>, RenderError> {
        self.render_image(result)?.to_png()
    }

    fn name(&self) -> &'static str {
        "raster"
    }

    fn format(&self) -> &'static str {
        "png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassInfo, MethodInfo};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn animals() -> ParseResult {
        [
            ClassInfo::new("Animal")
                .with_attribute("name")
                .with_method(MethodInfo::new("__init__").with_parameters(["name"])),
            ClassInfo::new("Dog")
                .with_base("Animal")
                .with_method(MethodInfo::new("bark")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_canvas_scales_pixels() {
        let mut canvas = PixelCanvas::new(4, 3, 2, BACKGROUND);
        assert_eq!(canvas.size(), Size::new(4, 3));
        assert_eq!(canvas.pixel_width(), 8);

        canvas.put(Point::new(1, 1), STROKE);
        canvas.put(Point::new(-1, 10), STROKE);
        let image = canvas.into_image(0, 0);
        assert_eq!(image.pixel(2, 2), Some([0, 0, 0]));
        assert_eq!(image.pixel(3, 3), Some([0, 0, 0]));
        assert_eq!(image.pixel(4, 2), Some([255, 255, 255]));
        assert_eq!(image.pixel(8, 0), None);
    }

    #[test]
    fn test_single_class_image() {
        let result: ParseResult = [ClassInfo::new("Solo")].into_iter().collect();
        let image = PngRenderer::new().render_image(&result).unwrap();

        assert_eq!(image.node_count, 1);
        assert_eq!(image.edge_count, 0);
        assert_eq!(image.pixels.len(), (image.width * image.height * 3) as usize);
        // Corners are margin and stay white
        assert_eq!(image.pixel(0, 0), Some([255, 255, 255]));
    }

    #[test]
    fn test_node_is_filled() {
        let config = RenderConfig::new().with_scale(1);
        let renderer = PngRenderer::with_config(config.clone());
        let result: ParseResult = [ClassInfo::new("Solo")].into_iter().collect();
        let layout = ClassLayoutAlgorithm::with_config(config).layout(&result).unwrap();
        let image = renderer.render_layout(&layout);

        // A blank attribute row, away from the label column
        let class = &layout.classes[0];
        let spot = center((class.right() - 1, class.attribute_separator_y() + 1));
        assert_eq!(
            image.pixel(spot.x as u32, spot.y as u32),
            Some([230, 243, 247])
        );
    }

    #[test]
    fn test_scale_multiplies_size() {
        let one = PngRenderer::with_config(RenderConfig::new().with_scale(1))
            .render_image(&animals())
            .unwrap();
        let three = PngRenderer::with_config(RenderConfig::new().with_scale(3))
            .render_image(&animals())
            .unwrap();
        assert_eq!(three.width, one.width * 3);
        assert_eq!(three.height, one.height * 3);
    }

    #[test]
    fn test_edge_counts() {
        let image = PngRenderer::new().render_image(&animals()).unwrap();
        assert_eq!(image.node_count, 2);
        assert_eq!(image.edge_count, 1);
    }

    #[test]
    fn test_png_signature() {
        let bytes = PngRenderer::new().render(&animals()).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_repeat_render_is_identical() {
        let renderer = PngRenderer::new();
        let first = renderer.render_image(&animals()).unwrap();
        let second = renderer.render_image(&animals()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_result_is_an_error() {
        let err = PngRenderer::new().render(&ParseResult::new()).unwrap_err();
        assert!(err.is_empty_diagram());
    }
}
