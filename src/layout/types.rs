//! Core types for the layout engine

use serde::Serialize;

use super::transform::{FrameTransform, RotationTransform};

/// A 2D point in canvas coordinates (Y axis pointing down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of the given size centered on a point
    pub fn centered_at(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest box containing every point; `None` for an empty slice
    pub fn enclosing(points: &[Point]) -> Option<BoundingBox> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Compute the union of two bounding boxes (smallest box containing both)
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }
}

/// Computed placement of one image frame
///
/// `x`/`y` is the fan center the frame hangs from. The frame is rotated by
/// `rotation_degrees` around that point and then shifted by
/// `(offset_x, offset_y)` in the rotated frame of reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Clockwise rotation in degrees
    pub rotation_degrees: f64,
    /// Stacking order; larger values paint on top
    pub z_index: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The transform chain that maps frame-local coordinates to the canvas
    pub fn transform(&self) -> FrameTransform {
        FrameTransform::new(
            self.center(),
            self.rotation_degrees,
            Point::new(self.offset_x, self.offset_y),
        )
    }

    /// Corners of a `width x height` frame in canvas coordinates, clockwise
    /// from the top-left
    pub fn frame_corners(&self, width: f64, height: f64) -> [Point; 4] {
        let t = self.transform();
        let (hw, hh) = (width / 2.0, height / 2.0);
        [
            t.apply(Point::new(-hw, -hh)),
            t.apply(Point::new(hw, -hh)),
            t.apply(Point::new(hw, hh)),
            t.apply(Point::new(-hw, hh)),
        ]
    }

    /// Axis-aligned bounds of the rotated frame.
    ///
    /// The frame is laid out shifted by its offset, then the whole box turns
    /// around the fan center.
    pub fn visual_bounds(&self, width: f64, height: f64) -> BoundingBox {
        let shifted = Point::new(self.x + self.offset_x, self.y + self.offset_y);
        RotationTransform::new(self.rotation_degrees, self.center())
            .transform_bounds(&BoundingBox::centered_at(shifted, width, height))
    }
}
