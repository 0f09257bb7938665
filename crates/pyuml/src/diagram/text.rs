//! Terminal rendition of class diagrams
//!
//! Draws the grid layout with box-drawing characters. Edge cells are
//! collected as link masks first so that merging edges get proper tees
//! and crossings.

use std::collections::BTreeMap;

use tracing::{debug, span, Level};

use super::layout::{
    Cell, ClassLayoutAlgorithm, ClassLayoutResult, Direction, PositionedClass,
    PositionedRelationship,
};
use crate::core::{
    BoxChars, CharGrid, LayoutAlgorithm, LineChars, Links, ParseResult, RenderConfig,
    RenderError, Renderer,
};

/// Box-drawing renderer for terminals
pub struct TextRenderer {
    config: RenderConfig,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    fn draw_class(&self, grid: &mut CharGrid, class: &PositionedClass, chars: &BoxChars) {
        let (x, y, w) = (class.x, class.y, class.width);
        let inner = w - 2;

        grid.set(x, y, chars.top_left);
        grid.draw_horizontal(x + 1, y, inner, chars.horizontal);
        grid.set(x + w - 1, y, chars.top_right);

        for row in y + 1..class.bottom() {
            grid.set(x, row, chars.vertical);
            grid.set(x + w - 1, row, chars.vertical);
        }

        grid.draw_text_centered(x + 1, class.header_y(), inner, &class.name);

        for separator in [class.attribute_separator_y(), class.method_separator_y()] {
            grid.set(x, separator, chars.t_right);
            grid.draw_horizontal(x + 1, separator, inner, chars.horizontal);
            grid.set(x + w - 1, separator, chars.t_left);
        }

        for (i, label) in class.attributes.iter().enumerate() {
            grid.draw_text(x + 2, class.attribute_separator_y() + 1 + i, label);
        }
        for (i, label) in class.methods.iter().enumerate() {
            grid.draw_text(x + 2, class.method_separator_y() + 1 + i, label);
        }

        let bottom = class.bottom();
        grid.set(x, bottom, chars.bottom_left);
        grid.draw_horizontal(x + 1, bottom, inner, chars.horizontal);
        grid.set(x + w - 1, bottom, chars.bottom_right);
    }

    fn draw_relationships(
        &self,
        grid: &mut CharGrid,
        relationships: &[PositionedRelationship],
        chars: &LineChars,
    ) {
        let mut links: BTreeMap<Cell, Links> = BTreeMap::new();
        let mut arrows: Vec<(Cell, char)> = Vec::new();

        for relationship in relationships {
            trace_edge(&mut links, relationship);
            if let (Some(&tip), Some(direction)) =
                (relationship.points.last(), relationship.arrow_direction())
            {
                arrows.push((tip, arrow_char(direction, chars)));
            }
        }

        for ((x, y), cell) in links {
            grid.set(x, y, chars.glyph(cell));
        }
        for ((x, y), arrow) in arrows {
            grid.set(x, y, arrow);
        }
    }

    /// Draw an existing layout
    pub fn render_layout(&self, layout: &ClassLayoutResult) -> String {
        let box_chars = BoxChars::rectangle(self.config.style);
        let line_chars = LineChars::new(self.config.style);
        let mut grid = CharGrid::new(layout.width, layout.height);

        if let Some(title) = &layout.title {
            grid.draw_text_centered(0, ClassLayoutResult::TITLE_Y, layout.width, title);
        }
        for class in &layout.classes {
            self.draw_class(&mut grid, class, &box_chars);
        }
        self.draw_relationships(&mut grid, &layout.relationships, &line_chars);

        grid.to_string()
    }
}

fn side(direction: Direction) -> Links {
    let mut links = Links::default();
    match direction {
        Direction::Up => links.up = true,
        Direction::Down => links.down = true,
        Direction::Left => links.left = true,
        Direction::Right => links.right = true,
    }
    links
}

fn arrow_char(direction: Direction, chars: &LineChars) -> char {
    match direction {
        Direction::Up => chars.arrow_up,
        Direction::Down => chars.arrow_down,
        Direction::Left => chars.arrow_left,
        Direction::Right => chars.arrow_right,
    }
}

/// Record which sides each cell of an edge connects to
fn trace_edge(links: &mut BTreeMap<Cell, Links>, relationship: &PositionedRelationship) {
    let mut add = |cell: Cell, extra: Links| {
        let entry = links.entry(cell).or_default();
        *entry = entry.union(extra);
    };

    // The first cell also reaches back to the child's border
    if let (Some(&start), Some(direction)) =
        (relationship.points.first(), relationship.start_direction())
    {
        add(start, side(direction.opposite()));
    }

    for (from, to) in relationship.segments() {
        let Some(direction) = Direction::between(from, to) else {
            continue;
        };
        let mut cell = from;
        add(cell, side(direction));
        while cell != to {
            cell = step(cell, direction);
            let mut cell_links = side(direction.opposite());
            if cell != to {
                cell_links = cell_links.union(side(direction));
            }
            add(cell, cell_links);
        }
    }
}

fn step((x, y): Cell, direction: Direction) -> Cell {
    match direction {
        Direction::Up => (x, y - 1),
        Direction::Down => (x, y + 1),
        Direction::Left => (x - 1, y),
        Direction::Right => (x + 1, y),
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, result: &ParseResult) -> Result<String, RenderError> {
        let render_span = span!(Level::DEBUG, "render_text", classes = result.len());
        let _enter = render_span.enter();

        let layout = ClassLayoutAlgorithm::with_config(self.config.clone()).layout(result)?;
        let output = self.render_layout(&layout);

        debug!(output_len = output.len(), "Text rendering completed");
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "text"
    }

    fn format(&self) -> &'static str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterSet, ClassInfo, MethodInfo};

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
    fn test_render_simple_class() {
        let result: ParseResult = [ClassInfo::new("Person")
            .with_attribute("name")
            .with_method(MethodInfo::new("greet"))]
        .into_iter()
        .collect();
        let output = TextRenderer::new().render(&result).unwrap();

        assert!(output.contains("Class Diagram"));
        assert!(output.contains("Person"));
        assert!(output.contains("- name"));
        assert!(output.contains("+ greet()"));
        assert!(output.contains('┌'));
        assert!(output.contains('├'));
    }

    #[test]
    fn test_empty_sections_keep_their_rows() {
        let result: ParseResult = [ClassInfo::new("Empty")].into_iter().collect();
        let config = RenderConfig::new().with_title(None);
        let output = TextRenderer::with_config(config).render(&result).unwrap();

        // top, header, separator, blank, separator, blank, bottom
        assert_eq!(output.lines().count(), 7);
        assert_eq!(output.matches('├').count(), 2);
    }

    #[test]
    fn test_inheritance_arrow_points_at_base() {
        let output = TextRenderer::new().render(&animals()).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        let arrow_row = lines.iter().position(|l| l.contains('△')).unwrap();
        let dog_row = lines.iter().position(|l| l.contains("Dog")).unwrap();
        let animal_row = lines.iter().position(|l| l.contains("Animal")).unwrap();
        assert!(animal_row < arrow_row && arrow_row < dog_row);
        assert_eq!(output.matches('△').count(), 1);
    }

    #[test]
    fn test_ascii_style() {
        let config = RenderConfig::new().with_style(CharacterSet::Ascii);
        let output = TextRenderer::with_config(config).render(&animals()).unwrap();

        assert!(output.is_ascii());
        assert!(output.contains('^'));
        assert!(output.contains("+------"));
    }

    #[test]
    fn test_edges_in_both_orientations() {
        let result: ParseResult = [
            ClassInfo::new("Base"),
            ClassInfo::new("Left").with_base("Base"),
            ClassInfo::new("Mid"),
            ClassInfo::new("Right").with_base("Base"),
        ]
        .into_iter()
        .collect();
        let output = TextRenderer::new().render(&result).unwrap();

        // Left is beside Base; Right sits in the next row
        assert!(output.contains('◁'));
        assert!(output.contains('△'));
    }

    #[test]
    fn test_trace_edge_corners() {
        let relationship = PositionedRelationship {
            child: "B".to_string(),
            parent: "A".to_string(),
            points: vec![(2, 6), (2, 4), (5, 4), (5, 1)],
        };
        let mut links = BTreeMap::new();
        trace_edge(&mut links, &relationship);

        let chars = LineChars::unicode();
        assert_eq!(chars.glyph(links[&(2, 6)]), '│');
        assert_eq!(chars.glyph(links[&(2, 4)]), '┌');
        assert_eq!(chars.glyph(links[&(3, 4)]), '─');
        assert_eq!(chars.glyph(links[&(5, 4)]), '┘');
        assert!(links.contains_key(&(5, 1)));
    }

    #[test]
    fn test_render_is_stable() {
        let renderer = TextRenderer::new();
        let first = renderer.render(&animals()).unwrap();
        let second = renderer.render(&animals()).unwrap();
        assert_eq!(first, second);
    }
}
