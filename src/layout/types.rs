use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// True when both axes are strictly closer than `tolerance`.
    pub fn near(self, other: Point, tolerance: f32) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

/// Node id to position in the margin-adjusted drawing area.
pub type PositionMap = BTreeMap<String, Point>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub positions: PositionMap,
    /// Full chart size, margins included.
    pub width: f32,
    pub height: f32,
    pub inner_width: f32,
    pub inner_height: f32,
    pub margin: Margin,
}

impl Layout {
    /// Position of a node, falling back to the origin for unknown ids.
    pub fn position(&self, id: &str) -> Point {
        self.positions.get(id).copied().unwrap_or(Point::ORIGIN)
    }

    /// Position translated into full-chart coordinates.
    pub fn absolute(&self, id: &str) -> Point {
        let p = self.position(id);
        Point::new(p.x + self.margin.left, p.y + self.margin.top)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}
