//! Rotation and transform-chain utilities for fan placement.
//!
//! A frame is positioned by the chain `translate(center) rotate(angle)
//! translate(offset)`, the same order a CSS or SVG `transform` attribute
//! applies its functions in. The trailing offset therefore runs along the
//! rotated axes, which is what bends the outer frames into a fan.
//!
//! ## Rotation Convention
//!
//! Rotation uses the SVG convention: clockwise positive angles, in degrees,
//! with the Y axis pointing down.
//! - 0° = no rotation
//! - 90° = rotated clockwise (right becomes down)
//! - 180° = upside down

use crate::layout::types::{BoundingBox, Point};

/// Represents a 2D rotation around a center point.
#[derive(Debug, Clone, Copy)]
pub struct RotationTransform {
    /// Rotation angle in degrees (clockwise positive, per SVG convention)
    pub angle_degrees: f64,
    /// Center point of rotation
    pub center: Point,
}

impl RotationTransform {
    /// Create a new rotation transform.
    pub fn new(angle_degrees: f64, center: Point) -> Self {
        Self {
            angle_degrees,
            center,
        }
    }

    /// Check if this is effectively a no-op (0° rotation).
    pub fn is_identity(&self) -> bool {
        self.angle_degrees.abs() < f64::EPSILON
    }

    /// Rotate a point around the center.
    ///
    /// In SVG's coordinate system (Y pointing down), clockwise rotation
    /// uses the standard rotation matrix:
    /// ```text
    /// x' = cx + (x - cx) * cos(θ) - (y - cy) * sin(θ)
    /// y' = cy + (x - cx) * sin(θ) + (y - cy) * cos(θ)
    /// ```
    pub fn transform_point(&self, point: Point) -> Point {
        if self.is_identity() {
            return point;
        }

        let radians = self.angle_degrees.to_radians();
        let cos_a = radians.cos();
        let sin_a = radians.sin();

        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;

        Point {
            x: self.center.x + dx * cos_a - dy * sin_a,
            y: self.center.y + dx * sin_a + dy * cos_a,
        }
    }

    /// Transform a bounding box using the "loose bounds" algorithm: rotate
    /// the four corners and take the AABB of the result.
    pub fn transform_bounds(&self, bounds: &BoundingBox) -> BoundingBox {
        if self.is_identity() {
            return *bounds;
        }

        let corners = [
            Point::new(bounds.x, bounds.y),
            Point::new(bounds.right(), bounds.y),
            Point::new(bounds.x, bounds.bottom()),
            Point::new(bounds.right(), bounds.bottom()),
        ];
        let rotated: Vec<Point> = corners.iter().map(|p| self.transform_point(*p)).collect();

        BoundingBox::enclosing(&rotated).unwrap_or(*bounds)
    }
}

/// The `translate(center) rotate(angle) translate(offset)` chain for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameTransform {
    pub center: Point,
    pub rotation_degrees: f64,
    /// Offset applied after rotation, along the rotated axes
    pub offset: Point,
}

impl FrameTransform {
    pub fn new(center: Point, rotation_degrees: f64, offset: Point) -> Self {
        Self {
            center,
            rotation_degrees,
            offset,
        }
    }

    /// Map a frame-local point (origin at the middle of the frame) to the canvas
    pub fn apply(&self, local: Point) -> Point {
        let shifted = Point::new(
            self.center.x + self.offset.x + local.x,
            self.center.y + self.offset.y + local.y,
        );
        RotationTransform::new(self.rotation_degrees, self.center).transform_point(shifted)
    }

    /// Render as an SVG `transform` attribute value
    pub fn to_svg(&self) -> String {
        format!(
            "translate({} {}) rotate({}) translate({} {})",
            fmt_num(self.center.x),
            fmt_num(self.center.y),
            fmt_num(self.rotation_degrees),
            fmt_num(self.offset.x),
            fmt_num(self.offset.y)
        )
    }
}

/// Format a coordinate for SVG output, dropping float noise
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_identity_rotation() {
        let t = RotationTransform::new(0.0, Point { x: 50.0, y: 50.0 });
        assert!(t.is_identity());

        let p = Point { x: 100.0, y: 0.0 };
        let result = t.transform_point(p);
        assert!(approx_eq(result.x, p.x));
        assert!(approx_eq(result.y, p.y));
    }

    #[test]
    fn test_90_degree_rotation_around_origin() {
        let t = RotationTransform::new(90.0, Point { x: 0.0, y: 0.0 });

        // (1, 0) rotated 90° clockwise around origin is (0, 1)
        let result = t.transform_point(Point { x: 1.0, y: 0.0 });
        assert!(approx_eq(result.x, 0.0), "x: expected 0.0, got {}", result.x);
        assert!(approx_eq(result.y, 1.0), "y: expected 1.0, got {}", result.y);
    }

    #[test]
    fn test_negative_rotation_is_counter_clockwise() {
        let t = RotationTransform::new(-90.0, Point { x: 0.0, y: 0.0 });
        let result = t.transform_point(Point { x: 1.0, y: 0.0 });
        assert!(approx_eq(result.x, 0.0));
        assert!(approx_eq(result.y, -1.0));
    }

    #[test]
    fn test_rotation_around_non_origin_center() {
        let t = RotationTransform::new(90.0, Point { x: 50.0, y: 50.0 });

        // 50 units right of center ends up 50 units below it
        let result = t.transform_point(Point { x: 100.0, y: 50.0 });
        assert!(approx_eq(result.x, 50.0), "x: expected 50.0, got {}", result.x);
        assert!(approx_eq(result.y, 100.0), "y: expected 100.0, got {}", result.y);
    }

    #[test]
    fn test_loose_bounds_45_degrees() {
        // A 100x100 square rotated 45° grows to its diagonal
        let t = RotationTransform::new(45.0, Point { x: 50.0, y: 50.0 });
        let result = t.transform_bounds(&BoundingBox::new(0.0, 0.0, 100.0, 100.0));

        let expected_size = 100.0 * std::f64::consts::SQRT_2;
        assert!(
            (result.width - expected_size).abs() < 0.1,
            "width: expected ~{}, got {}",
            expected_size,
            result.width
        );
        assert!((result.height - expected_size).abs() < 0.1);
    }

    #[test]
    fn test_offset_follows_rotated_axes() {
        // Rotating by 90° turns a rightward offset into a downward one
        let t = FrameTransform::new(Point::new(100.0, 100.0), 90.0, Point::new(80.0, 0.0));
        let middle = t.apply(Point::new(0.0, 0.0));
        assert!(approx_eq(middle.x, 100.0), "x: {}", middle.x);
        assert!(approx_eq(middle.y, 180.0), "y: {}", middle.y);
    }

    #[test]
    fn test_unrotated_chain_is_plain_translation() {
        let t = FrameTransform::new(Point::new(10.0, 20.0), 0.0, Point::new(-5.0, 7.0));
        let p = t.apply(Point::new(1.0, 1.0));
        assert!(approx_eq(p.x, 6.0));
        assert!(approx_eq(p.y, 28.0));
    }

    #[test]
    fn test_to_svg() {
        let t = FrameTransform::new(Point::new(400.0, 400.0), -30.0, Point::new(-80.0, 96.0));
        assert_eq!(t.to_svg(), "translate(400 400) rotate(-30) translate(-80 96)");
    }

    #[test]
    fn test_fmt_num_drops_noise() {
        assert_eq!(fmt_num(96.00000000000001), "96");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-1e-9), "0");
    }
}
