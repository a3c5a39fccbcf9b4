//! Text region types.

use super::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position
    pub x: i32,
    /// Vertical position
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// A text region imported from a PAGE document.
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    /// Region identifier assigned by the document author
    pub id: String,

    /// Outline, implicitly closed
    pub polygon: Vec<Point>,

    /// Region category (`paragraph`, `heading`, ...)
    #[serde(rename = "type")]
    pub region_type: String,

    /// Text of the first `TextEquiv/Unicode`, if present
    pub text: Option<String>,

    /// The `TextRegion` element this region was read from
    #[serde(skip)]
    pub node: NodeId,
}

impl Region {
    /// Outline as `(x, y)` tuples.
    pub fn coords_as_tuples(&self) -> Vec<(i32, i32)> {
        self.polygon.iter().map(|p| (p.x, p.y)).collect()
    }

    /// Outline in PAGE `points` notation (`"x1,y1 x2,y2 ..."`).
    pub fn points_string(&self) -> String {
        self.polygon
            .iter()
            .map(Point::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the region carries text.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let first = self.polygon.first()?;
        Some(self.polygon.iter().fold(
            (first.x, first.y, first.x, first.y),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        ))
    }
}
