//! Fan placement algorithm
//!
//! A single image sits in the middle of the canvas. Two or more images fan
//! out symmetrically around the center index: rotation grows linearly from
//! `-fan_rotation` to `+fan_rotation`, the horizontal offset grows with the
//! signed distance from the center index, and the vertical droop grows with
//! the absolute distance.

use super::params::{LayoutParameters, CANVAS_PADDING};
use super::types::{BoundingBox, Placement, Point};

/// Scale applied to the vertical droop term
const DROOP_FACTOR: f64 = 4.0;

/// Compute the placement of image `index` out of `total` images.
///
/// This is a total function: `total` of 0 or 1 both take the single-image
/// branch, and no parameter combination is rejected.
pub fn place(params: &LayoutParameters, index: usize, total: usize) -> Placement {
    let center = fan_center(params);

    if total <= 1 {
        return Placement {
            x: center.x,
            y: center.y,
            rotation_degrees: params.image_rotate,
            z_index: 1,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }

    let i = index as f64;
    let last = (total - 1) as f64;
    let rotation_step = (params.fan_rotation * 2.0) / last;
    let rotation = -params.fan_rotation + rotation_step * i;

    let distance = i - last / 2.0;
    let offset_x = distance * params.fan_spacing;
    let offset_y =
        distance.abs() * (params.fan_spacing * params.fan_vertical_height_diff * DROOP_FACTOR);

    Placement {
        x: center.x,
        y: center.y,
        rotation_degrees: rotation + params.image_rotate,
        z_index: total.saturating_sub(index) as u32,
        offset_x,
        offset_y,
    }
}

/// Placements for every one of `total` images, in index order
pub fn place_all(params: &LayoutParameters, total: usize) -> Vec<Placement> {
    (0..total).map(|i| place(params, i, total)).collect()
}

/// Middle of the padded content area shifted by the global translation
pub fn fan_center(params: &LayoutParameters) -> Point {
    let half = CANVAS_PADDING + params.content_size() / 2.0;
    Point::new(half + params.translate_x, half + params.translate_y)
}

/// The full square canvas
pub fn canvas_bounds(params: &LayoutParameters) -> BoundingBox {
    let size = f64::from(params.background_width);
    BoundingBox::new(0.0, 0.0, size, size)
}

/// Union of the rotated frame bounds of every image
pub fn arrangement_bounds(params: &LayoutParameters, total: usize) -> Option<BoundingBox> {
    let (w, h) = (f64::from(params.image_width), f64::from(params.image_height));
    place_all(params, total)
        .iter()
        .map(|p| p.visual_bounds(w, h))
        .reduce(|acc, b| acc.union(&b))
}
