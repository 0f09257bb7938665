//! Class diagram layout algorithm
//!
//! Places class boxes on a uniform grid and routes inheritance edges as
//! orthogonal polylines through the gaps between rows and columns.
//! Coordinates are character cells; the raster renderer scales them to
//! pixels.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, span, trace, Level};

use crate::core::{
    display_width, fit_label, ClassInfo, LayoutAlgorithm, ParseResult, RenderConfig, RenderError,
    ELLIPSIS,
};

/// A cell coordinate `(x, y)`
pub type Cell = (usize, usize);

/// Travel direction of an edge segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Direction from one cell to another on the same row or column
    pub fn between(from: Cell, to: Cell) -> Option<Self> {
        match (from, to) {
            ((x1, y1), (x2, y2)) if x1 == x2 && y2 < y1 => Some(Direction::Up),
            ((x1, y1), (x2, y2)) if x1 == x2 && y2 > y1 => Some(Direction::Down),
            ((x1, y1), (x2, y2)) if y1 == y2 && x2 < x1 => Some(Direction::Left),
            ((x1, y1), (x2, y2)) if y1 == y2 && x2 > x1 => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Positioned class box for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedClass {
    pub name: String,
    /// Grid row and column
    pub row: usize,
    pub column: usize,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    /// Display labels (`- name`), already truncated
    pub attributes: Vec<String>,
    /// Display labels (`+ name(params)`), already truncated
    pub methods: Vec<String>,
    /// Rows reserved for attributes; the same for every box
    pub attribute_rows: usize,
}

impl PositionedClass {
    pub fn center_x(&self) -> usize {
        self.x + self.width / 2
    }

    pub fn right(&self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> usize {
        self.y + self.height - 1
    }

    pub fn header_y(&self) -> usize {
        self.y + 1
    }

    /// Separator between the header and the attributes
    pub fn attribute_separator_y(&self) -> usize {
        self.y + 2
    }

    /// Separator between the attributes and the methods
    pub fn method_separator_y(&self) -> usize {
        self.y + 3 + self.attribute_rows
    }
}

/// Positioned inheritance edge, from the subclass to the base class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedRelationship {
    pub child: String,
    pub parent: String,
    /// Polyline corners; the first cell touches the child box, the last
    /// one touches the parent box
    pub points: Vec<Cell>,
}

impl PositionedRelationship {
    /// Direction the arrowhead points in
    pub fn arrow_direction(&self) -> Option<Direction> {
        match self.points.as_slice() {
            [.., from, to] => Direction::between(*from, *to),
            _ => None,
        }
    }

    /// Direction the edge leaves the child box in
    pub fn start_direction(&self) -> Option<Direction> {
        match self.points.as_slice() {
            [from, to, ..] => Direction::between(*from, *to),
            _ => None,
        }
    }

    /// Consecutive corner pairs
    pub fn segments(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Layout result containing all positioned elements
#[derive(Debug, Clone)]
pub struct ClassLayoutResult {
    pub classes: Vec<PositionedClass>,
    pub relationships: Vec<PositionedRelationship>,
    pub width: usize,
    pub height: usize,
    pub title: Option<String>,
    pub columns: usize,
    pub rows: usize,
}

impl ClassLayoutResult {
    /// Row the title is drawn on
    pub const TITLE_Y: usize = 1;

    pub fn get(&self, name: &str) -> Option<&PositionedClass> {
        self.classes.iter().find(|c| c.name == name)
    }
}

/// Cells between an edge's start and the child's center, so a box side can
/// carry outgoing edges and incoming arrowheads without them merging
const START_OFFSET: usize = 2;

/// Grid geometry shared by placement and routing
///
/// Row gap `g` is the space above grid row `g`; column gap `g` is the space
/// left of grid column `g`.
#[derive(Debug, Clone, Copy)]
struct GridMetrics {
    left: usize,
    top: usize,
    /// First row below the title
    body_top: usize,
    box_width: usize,
    box_height: usize,
    column_gap: usize,
    row_gap: usize,
}

impl GridMetrics {
    fn column_x(&self, column: usize) -> usize {
        self.left + column * (self.box_width + self.column_gap)
    }

    fn row_y(&self, row: usize) -> usize {
        self.top + row * (self.box_height + self.row_gap)
    }

    /// First row and height of a row gap
    fn row_gap_span(&self, gap: usize) -> (usize, usize) {
        if gap == 0 {
            (self.body_top, self.top - self.body_top)
        } else {
            (self.row_y(gap) - self.row_gap, self.row_gap)
        }
    }

    /// First column and width of a column gap
    fn column_gap_span(&self, gap: usize) -> (usize, usize) {
        if gap == 0 {
            (0, self.left)
        } else {
            (self.column_x(gap) - self.column_gap, self.column_gap)
        }
    }

    /// Row of a horizontal lane
    fn lane_y(&self, gap: usize, (index, count): (usize, usize)) -> usize {
        let (start, size) = self.row_gap_span(gap);
        start + lane_offset(size, index, count)
    }

    /// Column of a vertical lane
    fn lane_x(&self, gap: usize, (index, count): (usize, usize)) -> usize {
        let (start, size) = self.column_gap_span(gap);
        start + lane_offset(size, index, count)
    }
}

/// Lanes sit centered in their gap, one cell clear of either side
fn lane_offset(size: usize, index: usize, count: usize) -> usize {
    let slack = size.saturating_sub(2).saturating_sub(count);
    1 + slack.div_ceil(2) + index
}

/// Gaps an edge runs through, in grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgePlan {
    /// Neighbours in one row, joined straight across the column gap
    Beside,
    /// Along row gaps, with a detour through a column gap when rows lie
    /// between
    Channels {
        start_gap: usize,
        end_gap: usize,
        gutter: Option<usize>,
    },
}

impl EdgePlan {
    fn new(child: (usize, usize), parent: (usize, usize)) -> Self {
        let ((child_row, child_column), (parent_row, parent_column)) = (child, parent);
        if child_row == parent_row && child_column.abs_diff(parent_column) == 1 {
            return EdgePlan::Beside;
        }

        let (start_gap, end_gap) = match parent_row.cmp(&child_row) {
            Ordering::Equal => (child_row, child_row),
            Ordering::Less => (child_row, parent_row + 1),
            Ordering::Greater => (child_row + 1, parent_row),
        };
        let gutter = (child_row.abs_diff(parent_row) > 1).then_some(
            if parent_column <= child_column {
                child_column
            } else {
                child_column + 1
            },
        );

        EdgePlan::Channels {
            start_gap,
            end_gap,
            gutter,
        }
    }
}

/// Where a parent sits relative to a row gap; lanes stack in this order
///
/// Arrowheads into the row above enter from the top lanes and arrowheads
/// into the row below from the bottom ones, so the two never share a
/// vertical run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LaneGroup {
    Above,
    Elsewhere,
    Below,
}

impl LaneGroup {
    fn of(gap: usize, parent_row: usize) -> Self {
        if parent_row + 1 == gap {
            LaneGroup::Above
        } else if parent_row == gap {
            LaneGroup::Below
        } else {
            LaneGroup::Elsewhere
        }
    }
}

/// One lane per parent in every gap its edges pass through
#[derive(Debug, Default)]
struct Lanes {
    slots: HashMap<(usize, usize), usize>,
    counts: HashMap<usize, usize>,
}

impl Lanes {
    /// Assign lanes from `(gap, group, parent)` requests
    fn assign(mut requests: Vec<(usize, LaneGroup, usize)>) -> Self {
        requests.sort();
        requests.dedup();

        let mut lanes = Lanes::default();
        for (gap, _, parent) in requests {
            let count = lanes.counts.entry(gap).or_insert(0);
            lanes.slots.insert((gap, parent), *count);
            *count += 1;
        }
        lanes
    }

    /// Lane index of a parent in a gap, with the gap's lane count
    fn slot(&self, gap: usize, parent: usize) -> (usize, usize) {
        let index = self.slots.get(&(gap, parent)).copied().unwrap_or(0);
        (index, self.count(gap).max(index + 1))
    }

    fn count(&self, gap: usize) -> usize {
        self.counts.get(&gap).copied().unwrap_or(0)
    }

    /// Most lanes needed by any gap between two rows or columns
    fn widest_inner(&self) -> usize {
        self.counts
            .iter()
            .filter(|(gap, _)| **gap > 0)
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0)
    }
}

/// Row and column lanes for every edge of one layout
#[derive(Debug, Default)]
struct EdgeLanes {
    rows: Lanes,
    columns: Lanes,
}

impl EdgeLanes {
    /// `edges` holds `(child, parent)` grid cells and the parent's index
    fn assign(edges: &[((usize, usize), (usize, usize), usize)]) -> Self {
        let mut rows = Vec::new();
        let mut columns = Vec::new();
        for &(child, parent, parent_index) in edges {
            if let EdgePlan::Channels {
                start_gap,
                end_gap,
                gutter,
            } = EdgePlan::new(child, parent)
            {
                for gap in [start_gap, end_gap] {
                    rows.push((gap, LaneGroup::of(gap, parent.0), parent_index));
                }
                if let Some(gap) = gutter {
                    columns.push((gap, LaneGroup::Elsewhere, parent_index));
                }
            }
        }
        EdgeLanes {
            rows: Lanes::assign(rows),
            columns: Lanes::assign(columns),
        }
    }
}

/// Grid layout for class diagrams
pub struct ClassLayoutAlgorithm {
    config: RenderConfig,
    box_padding: usize,
    min_box_width: usize,
    column_gap: usize,
    row_gap: usize,
    margin_x: usize,
    margin_y: usize,
}

impl ClassLayoutAlgorithm {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            config,
            box_padding: 1,
            min_box_width: 12,
            column_gap: 6,
            row_gap: 4,
            margin_x: 4,
            margin_y: 3,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Column count for `n` boxes: `floor(sqrt(n))`, within `1..=max_columns`
    pub fn column_count(&self, n: usize) -> usize {
        let mut columns = 1;
        while (columns + 1) * (columns + 1) <= n {
            columns += 1;
        }
        columns.clamp(1, self.config.max_columns.max(1))
    }

    fn fit(&self, label: String) -> String {
        fit_label(&label, self.config.max_label_width, ELLIPSIS)
    }

    fn attribute_labels(&self, class: &ClassInfo) -> Vec<String> {
        class
            .attributes
            .iter()
            .map(|name| self.fit(format!("- {}", name)))
            .collect()
    }

    fn method_labels(&self, class: &ClassInfo) -> Vec<String> {
        class
            .methods
            .iter()
            .map(|method| self.fit(format!("+ {}", method.signature())))
            .collect()
    }

    /// Route one edge from the child box to the parent box
    fn route(
        &self,
        metrics: &GridMetrics,
        lanes: &EdgeLanes,
        child: &PositionedClass,
        parent: &PositionedClass,
        parent_index: usize,
    ) -> Vec<Cell> {
        let px = parent.center_x();
        let mut points = Vec::with_capacity(6);

        match EdgePlan::new((child.row, child.column), (parent.row, parent.column)) {
            EdgePlan::Beside => {
                let y = child.y + child.height / 2;
                if parent.column > child.column {
                    points.push((child.right() + 1, y));
                    points.push((parent.x - 1, y));
                } else {
                    points.push((child.x - 1, y));
                    points.push((parent.right() + 1, y));
                }
            }
            EdgePlan::Channels {
                start_gap,
                end_gap,
                gutter,
            } => {
                let start = if parent.row <= child.row {
                    (child.center_x() - START_OFFSET, child.y - 1)
                } else {
                    (child.center_x() + START_OFFSET, child.bottom() + 1)
                };
                let end = if parent.row < child.row {
                    (px, parent.bottom() + 1)
                } else {
                    (px, parent.y - 1)
                };
                let lane_y = |gap| metrics.lane_y(gap, lanes.rows.slot(gap, parent_index));
                let (start_lane, end_lane) = (lane_y(start_gap), lane_y(end_gap));

                points.push(start);
                points.push((start.0, start_lane));
                if let Some(gap) = gutter {
                    // Rows in between: detour through the column gap beside the child
                    let x = metrics.lane_x(gap, lanes.columns.slot(gap, parent_index));
                    points.push((x, start_lane));
                    points.push((x, end_lane));
                }
                points.push((px, end_lane));
                points.push(end);
            }
        }

        simplify(points)
    }
}

/// Drop repeated cells and corners that do not turn
fn simplify(points: Vec<Cell>) -> Vec<Cell> {
    let mut simplified: Vec<Cell> = Vec::with_capacity(points.len());
    for point in points {
        if simplified.last() == Some(&point) {
            continue;
        }
        if let [.., a, b] = simplified.as_slice() {
            let straight = (a.0 == b.0 && b.0 == point.0) || (a.1 == b.1 && b.1 == point.1);
            if straight {
                simplified.pop();
            }
        }
        simplified.push(point);
    }
    simplified
}

impl Default for ClassLayoutAlgorithm {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutAlgorithm for ClassLayoutAlgorithm {
    type Output = ClassLayoutResult;

    fn layout(&self, result: &ParseResult) -> Result<ClassLayoutResult, RenderError> {
        let layout_span = span!(Level::DEBUG, "layout_classes", classes = result.len());
        let _enter = layout_span.enter();

        if result.is_empty() {
            return Err(RenderError::EmptyDiagram);
        }

        for (child, base) in result.dangling_bases() {
            trace!(child, base, "Base class not drawn");
        }

        let labels: Vec<(&ClassInfo, Vec<String>, Vec<String>)> = result
            .classes()
            .iter()
            .map(|class| (class, self.attribute_labels(class), self.method_labels(class)))
            .collect();

        // Uniform box shape: the widest label and the longest sections win
        let content_width = labels
            .iter()
            .flat_map(|(class, attrs, methods)| {
                std::iter::once(display_width(&class.name))
                    .chain(attrs.iter().map(|l| display_width(l)))
                    .chain(methods.iter().map(|l| display_width(l)))
            })
            .max()
            .unwrap_or(0);
        let attribute_rows = labels.iter().map(|(_, a, _)| a.len()).max().unwrap_or(0).max(1);
        let method_rows = labels.iter().map(|(_, _, m)| m.len()).max().unwrap_or(0).max(1);

        let box_width = (content_width + self.box_padding * 2 + 2).max(self.min_box_width);
        // borders, header, two separators
        let box_height = attribute_rows + method_rows + 5;

        let title = self.config.title.clone().filter(|t| !t.trim().is_empty());
        let title_rows = if title.is_some() { 2 } else { 0 };

        let columns = self.column_count(result.len());
        let rows = result.len().div_ceil(columns);

        let index: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, (class, _, _))| (class.name.as_str(), i))
            .collect();
        let cell = |i: usize| (i / columns, i % columns);

        let edges: Vec<(String, String, usize, usize)> = result
            .inheritance()
            .filter_map(|edge| {
                let child = *index.get(edge.child.as_str())?;
                let parent = *index.get(edge.parent.as_str())?;
                Some((edge.child, edge.parent, child, parent))
            })
            .collect();

        let lanes = EdgeLanes::assign(
            &edges
                .iter()
                .map(|&(_, _, child, parent)| (cell(child), cell(parent), parent))
                .collect::<Vec<_>>(),
        );

        let metrics = GridMetrics {
            left: self.margin_x.max(lanes.columns.count(0) + 2),
            top: title_rows + self.margin_y.max(lanes.rows.count(0) + 2),
            body_top: title_rows,
            box_width,
            box_height,
            column_gap: self.column_gap.max(lanes.columns.widest_inner() + 2),
            row_gap: self.row_gap.max(lanes.rows.widest_inner() + 2),
        };
        trace!(
            box_width,
            box_height,
            columns,
            rows,
            column_gap = metrics.column_gap,
            row_gap = metrics.row_gap,
            "Grid metrics"
        );

        let classes: Vec<PositionedClass> = labels
            .into_iter()
            .enumerate()
            .map(|(i, (class, attributes, methods))| {
                let (row, column) = cell(i);
                PositionedClass {
                    name: class.name.clone(),
                    row,
                    column,
                    x: metrics.column_x(column),
                    y: metrics.row_y(row),
                    width: box_width,
                    height: box_height,
                    attributes,
                    methods,
                    attribute_rows,
                }
            })
            .collect();

        let relationships: Vec<PositionedRelationship> = edges
            .into_iter()
            .map(|(child_name, parent_name, child, parent)| {
                let points =
                    self.route(&metrics, &lanes, &classes[child], &classes[parent], parent);
                PositionedRelationship {
                    child: child_name,
                    parent: parent_name,
                    points,
                }
            })
            .collect();

        let grid_width = columns * box_width + (columns - 1) * metrics.column_gap;
        let title_width = title.as_deref().map(display_width).unwrap_or(0);
        let width = metrics.left + grid_width.max(title_width) + self.margin_x;
        let height =
            metrics.top + rows * box_height + (rows - 1) * metrics.row_gap + self.margin_y;

        debug!(
            classes = classes.len(),
            relationships = relationships.len(),
            width,
            height,
            "Layout completed"
        );

        Ok(ClassLayoutResult {
            classes,
            relationships,
            width,
            height,
            title,
            columns,
            rows,
        })
    }

    fn name(&self) -> &'static str {
        "grid"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }
}
