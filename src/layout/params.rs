//! Parameter set consumed by the layout engine
//!
//! Every setter clamps to the documented range for that parameter, so the
//! engine itself never has to reject input. Non-finite input is ignored and
//! the previous value is kept.

use serde::Deserialize;

/// Fixed inner padding of the canvas, in pixels
pub const CANVAS_PADDING: f64 = 16.0;

/// Inclusive range for image frame width and height
pub const IMAGE_SIZE_RANGE: (u32, u32) = (100, 2000);
pub const BORDER_RADIUS_RANGE: (f64, f64) = (0.0, 100.0);
pub const SHADOW_RANGE: (f64, f64) = (0.0, 5.0);
pub const FAN_ROTATION_RANGE: (f64, f64) = (0.0, 90.0);
pub const FAN_SPACING_RANGE: (f64, f64) = (0.0, 1000.0);
pub const FAN_HEIGHT_DIFF_RANGE: (f64, f64) = (-2.0, 2.0);
pub const TRANSLATE_RANGE: (f64, f64) = (-500.0, 500.0);
pub const ROTATE_RANGE: (f64, f64) = (-180.0, 180.0);

pub const DEFAULT_IMAGE_WIDTH: u32 = 600;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 400;
pub const DEFAULT_BACKGROUND_WIDTH: u32 = 800;
pub const DEFAULT_BORDER_RADIUS: f64 = 16.0;
pub const DEFAULT_SHADOW: f64 = 2.0;
pub const DEFAULT_FAN_ROTATION: f64 = 30.0;
pub const DEFAULT_FAN_SPACING: f64 = 80.0;
pub const DEFAULT_FAN_HEIGHT_DIFF: f64 = 0.3;
pub const DEFAULT_BACKGROUND_COLOR: &str = "#f0f4f8";

/// Layout and styling parameters for one card composition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParameters {
    /// Width of every image frame in pixels
    pub image_width: u32,
    /// Height of every image frame in pixels
    pub image_height: u32,
    /// Width of the square canvas in pixels
    pub background_width: u32,
    pub border_radius: f64,
    /// Shadow strength, passed through to the renderer untouched by layout
    pub shadow: f64,
    /// Maximum rotation applied to the outermost frames, in degrees
    pub fan_rotation: f64,
    /// Horizontal offset per unit of distance from the center index
    pub fan_spacing: f64,
    /// Vertical droop multiplier for outer frames
    pub fan_vertical_height_diff: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rotation added uniformly to every frame, in degrees
    pub image_rotate: f64,
}

impl Default for LayoutParameters {
    fn default() -> Self {
        Self {
            image_width: DEFAULT_IMAGE_WIDTH,
            image_height: DEFAULT_IMAGE_HEIGHT,
            background_width: DEFAULT_BACKGROUND_WIDTH,
            border_radius: DEFAULT_BORDER_RADIUS,
            shadow: DEFAULT_SHADOW,
            fan_rotation: DEFAULT_FAN_ROTATION,
            fan_spacing: DEFAULT_FAN_SPACING,
            fan_vertical_height_diff: DEFAULT_FAN_HEIGHT_DIFF,
            translate_x: 0.0,
            translate_y: 0.0,
            image_rotate: 0.0,
        }
    }
}

impl LayoutParameters {
    /// Create a parameter set with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frame width, clamped to [100, 2000]
    pub fn with_image_width(mut self, width: f64) -> Self {
        self.image_width = clamp_size(width, self.image_width);
        self
    }

    /// Set the frame height, clamped to [100, 2000]
    pub fn with_image_height(mut self, height: f64) -> Self {
        self.image_height = clamp_size(height, self.image_height);
        self
    }

    /// Set the canvas width. Only a lower bound of one pixel applies.
    pub fn with_background_width(mut self, width: u32) -> Self {
        self.background_width = width.max(1);
        self
    }

    pub fn with_border_radius(mut self, radius: f64) -> Self {
        self.border_radius = clamp(radius, BORDER_RADIUS_RANGE, self.border_radius);
        self
    }

    pub fn with_shadow(mut self, shadow: f64) -> Self {
        self.shadow = clamp(shadow, SHADOW_RANGE, self.shadow);
        self
    }

    pub fn with_fan_rotation(mut self, degrees: f64) -> Self {
        self.fan_rotation = clamp(degrees, FAN_ROTATION_RANGE, self.fan_rotation);
        self
    }

    pub fn with_fan_spacing(mut self, spacing: f64) -> Self {
        self.fan_spacing = clamp(spacing, FAN_SPACING_RANGE, self.fan_spacing);
        self
    }

    pub fn with_fan_vertical_height_diff(mut self, diff: f64) -> Self {
        self.fan_vertical_height_diff =
            clamp(diff, FAN_HEIGHT_DIFF_RANGE, self.fan_vertical_height_diff);
        self
    }

    /// Set the global offset of the arrangement's center
    pub fn with_translate(mut self, x: f64, y: f64) -> Self {
        self.translate_x = clamp(x, TRANSLATE_RANGE, self.translate_x);
        self.translate_y = clamp(y, TRANSLATE_RANGE, self.translate_y);
        self
    }

    pub fn with_image_rotate(mut self, degrees: f64) -> Self {
        self.image_rotate = clamp(degrees, ROTATE_RANGE, self.image_rotate);
        self
    }

    /// Side length of the canvas area inside the padding
    pub fn content_size(&self) -> f64 {
        f64::from(self.background_width) - 2.0 * CANVAS_PADDING
    }

    /// Overlay the fields present in a partial set onto these parameters
    pub fn apply_overrides(self, overrides: &ParameterOverrides) -> Self {
        let mut params = self;
        if let Some(v) = overrides.image_width {
            params = params.with_image_width(v);
        }
        if let Some(v) = overrides.image_height {
            params = params.with_image_height(v);
        }
        if let Some(v) = overrides.background_width {
            params = params.with_background_width(v);
        }
        if let Some(v) = overrides.border_radius {
            params = params.with_border_radius(v);
        }
        if let Some(v) = overrides.shadow {
            params = params.with_shadow(v);
        }
        if let Some(v) = overrides.fan_rotation {
            params = params.with_fan_rotation(v);
        }
        if let Some(v) = overrides.fan_spacing {
            params = params.with_fan_spacing(v);
        }
        if let Some(v) = overrides.fan_vertical_height_diff {
            params = params.with_fan_vertical_height_diff(v);
        }
        let tx = overrides.translate_x.unwrap_or(params.translate_x);
        let ty = overrides.translate_y.unwrap_or(params.translate_y);
        params = params.with_translate(tx, ty);
        if let Some(v) = overrides.image_rotate {
            params = params.with_image_rotate(v);
        }
        params
    }
}

/// Partial parameter set, as found in config files and CLI flags
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParameterOverrides {
    pub image_width: Option<f64>,
    pub image_height: Option<f64>,
    pub background_width: Option<u32>,
    pub border_radius: Option<f64>,
    pub shadow: Option<f64>,
    pub fan_rotation: Option<f64>,
    pub fan_spacing: Option<f64>,
    pub fan_vertical_height_diff: Option<f64>,
    pub translate_x: Option<f64>,
    pub translate_y: Option<f64>,
    pub image_rotate: Option<f64>,
    pub background_color: Option<String>,
}

fn clamp(value: f64, (min, max): (f64, f64), previous: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        previous
    }
}

pub(crate) fn clamp_size(value: f64, previous: u32) -> u32 {
    if !value.is_finite() {
        return previous;
    }
    let (min, max) = IMAGE_SIZE_RANGE;
    value.round().clamp(f64::from(min), f64::from(max)) as u32
}
