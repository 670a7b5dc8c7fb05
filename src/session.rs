//! Live editing state for one session
//!
//! A [`Session`] owns the parameter set, the background color, the image
//! slots and the aspect lock. All numeric setters clamp; nothing here talks
//! to storage.

use crate::error::{validate_hex_color, ValidationError};
use crate::layout::params::{
    clamp_size, LayoutParameters, DEFAULT_BACKGROUND_COLOR, DEFAULT_BORDER_RADIUS,
    DEFAULT_FAN_HEIGHT_DIFF, DEFAULT_FAN_ROTATION, DEFAULT_FAN_SPACING, DEFAULT_IMAGE_HEIGHT,
    DEFAULT_IMAGE_WIDTH, DEFAULT_SHADOW,
};
use crate::layout::{place_all, Placement};
use crate::snapshot::{CardStyle, Snapshot};

/// Ordered image URLs; always holds at least one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlots(Vec<String>);

impl ImageSlots {
    /// A single empty slot
    pub fn new() -> Self {
        Self(vec![String::new()])
    }

    /// Build from stored URLs; an empty list becomes a single empty slot
    pub fn from_urls(urls: Vec<String>) -> Self {
        if urls.is_empty() {
            Self::new()
        } else {
            Self(urls)
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a live slot list
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append an empty slot
    pub fn add(&mut self) {
        self.0.push(String::new());
    }

    pub fn update(&mut self, index: usize, url: impl Into<String>) -> Result<(), ValidationError> {
        let len = self.0.len();
        let slot = self
            .0
            .get_mut(index)
            .ok_or(ValidationError::slot_out_of_range(index, len))?;
        *slot = url.into();
        Ok(())
    }

    /// Remove a slot, refusing to remove the last one
    pub fn remove(&mut self, index: usize) -> Result<String, ValidationError> {
        if index >= self.0.len() {
            return Err(ValidationError::slot_out_of_range(index, self.0.len()));
        }
        if self.0.len() == 1 {
            return Err(ValidationError::LastImageSlot);
        }
        Ok(self.0.remove(index))
    }

    /// Number of slots holding a non-blank URL
    pub fn filled(&self) -> usize {
        self.0.iter().filter(|u| !u.trim().is_empty()).count()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl Default for ImageSlots {
    fn default() -> Self {
        Self::new()
    }
}

/// Aspect ratio lock for the frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectLock {
    pub locked: bool,
    /// width / height, captured when the lock was engaged
    pub ratio: f64,
}

impl Default for AspectLock {
    fn default() -> Self {
        Self {
            locked: false,
            ratio: f64::from(DEFAULT_IMAGE_WIDTH) / f64::from(DEFAULT_IMAGE_HEIGHT),
        }
    }
}

/// Parameters with an individual reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    BorderRadius,
    Shadow,
    FanRotation,
    FanSpacing,
    FanVerticalHeightDiff,
    TranslateX,
    TranslateY,
    ImageRotate,
}

/// In-memory editing state
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    params: LayoutParameters,
    background_color: String,
    slots: ImageSlots,
    aspect: AspectLock,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            params: LayoutParameters::default(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            slots: ImageSlots::new(),
            aspect: AspectLock::default(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a custom parameter set and background color
    pub fn with_parameters(params: LayoutParameters, background_color: impl Into<String>) -> Self {
        Self {
            params,
            background_color: background_color.into(),
            ..Self::default()
        }
    }

    pub fn params(&self) -> &LayoutParameters {
        &self.params
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn slots(&self) -> &ImageSlots {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut ImageSlots {
        &mut self.slots
    }

    pub fn aspect_lock(&self) -> AspectLock {
        self.aspect
    }

    /// Set the frame width; with the lock engaged the height follows
    pub fn set_image_width(&mut self, width: f64) {
        self.params = self.params.with_image_width(width);
        if self.aspect.locked {
            let height = (f64::from(self.params.image_width) / self.aspect.ratio).round();
            self.params.image_height = clamp_size(height, self.params.image_height);
        }
    }

    /// Set the frame height; with the lock engaged the width follows
    pub fn set_image_height(&mut self, height: f64) {
        self.params = self.params.with_image_height(height);
        if self.aspect.locked {
            let width = (f64::from(self.params.image_height) * self.aspect.ratio).round();
            self.params.image_width = clamp_size(width, self.params.image_width);
        }
    }

    /// Engage or release the aspect lock. Engaging captures the current ratio.
    pub fn toggle_aspect_lock(&mut self) -> bool {
        if !self.aspect.locked {
            self.aspect.ratio =
                f64::from(self.params.image_width) / f64::from(self.params.image_height);
        }
        self.aspect.locked = !self.aspect.locked;
        self.aspect.locked
    }

    /// Restore the default 600x400 frame
    pub fn reset_image_size(&mut self) {
        self.params.image_width = DEFAULT_IMAGE_WIDTH;
        self.params.image_height = DEFAULT_IMAGE_HEIGHT;
        if self.aspect.locked {
            self.aspect.ratio = f64::from(DEFAULT_IMAGE_WIDTH) / f64::from(DEFAULT_IMAGE_HEIGHT);
        }
    }

    pub fn set_background_width(&mut self, width: u32) {
        self.params = self.params.with_background_width(width);
    }

    pub fn set_border_radius(&mut self, radius: f64) {
        self.params = self.params.with_border_radius(radius);
    }

    pub fn set_shadow(&mut self, shadow: f64) {
        self.params = self.params.with_shadow(shadow);
    }

    pub fn set_fan_rotation(&mut self, degrees: f64) {
        self.params = self.params.with_fan_rotation(degrees);
    }

    pub fn set_fan_spacing(&mut self, spacing: f64) {
        self.params = self.params.with_fan_spacing(spacing);
    }

    pub fn set_fan_vertical_height_diff(&mut self, diff: f64) {
        self.params = self.params.with_fan_vertical_height_diff(diff);
    }

    pub fn set_translate_x(&mut self, x: f64) {
        self.params = self.params.with_translate(x, self.params.translate_y);
    }

    pub fn set_translate_y(&mut self, y: f64) {
        self.params = self.params.with_translate(self.params.translate_x, y);
    }

    pub fn set_image_rotate(&mut self, degrees: f64) {
        self.params = self.params.with_image_rotate(degrees);
    }

    pub fn set_background_color(&mut self, color: &str) -> Result<(), ValidationError> {
        self.background_color = validate_hex_color(color)?;
        Ok(())
    }

    /// Put one parameter back to its default
    pub fn reset(&mut self, parameter: Parameter) {
        match parameter {
            Parameter::BorderRadius => self.params.border_radius = DEFAULT_BORDER_RADIUS,
            Parameter::Shadow => self.params.shadow = DEFAULT_SHADOW,
            Parameter::FanRotation => self.params.fan_rotation = DEFAULT_FAN_ROTATION,
            Parameter::FanSpacing => self.params.fan_spacing = DEFAULT_FAN_SPACING,
            Parameter::FanVerticalHeightDiff => {
                self.params.fan_vertical_height_diff = DEFAULT_FAN_HEIGHT_DIFF
            }
            Parameter::TranslateX => self.params.translate_x = 0.0,
            Parameter::TranslateY => self.params.translate_y = 0.0,
            Parameter::ImageRotate => self.params.image_rotate = 0.0,
        }
    }

    /// Reset parameters, background color and image slots. The aspect lock
    /// state is left alone.
    pub fn clear(&mut self) {
        self.params = LayoutParameters::default();
        self.background_color = DEFAULT_BACKGROUND_COLOR.to_string();
        self.slots = ImageSlots::new();
    }

    /// Whether any slot holds a URL
    pub fn has_images(&self) -> bool {
        self.slots.filled() > 0
    }

    /// Whether more than one slot holds a URL
    pub fn has_multiple_images(&self) -> bool {
        self.slots.filled() > 1
    }

    /// Whether leaving now would lose work worth a warning
    pub fn warn_before_exit(&self) -> bool {
        self.has_images()
    }

    /// Placement of every slot, in slot order
    pub fn placements(&self) -> Vec<Placement> {
        place_all(&self.params, self.slots.len())
    }

    pub fn style(&self) -> CardStyle {
        CardStyle::capture(&self.params, &self.background_color)
    }

    /// Snapshot of the full state, image URLs included
    pub fn to_document(&self, title: &str) -> Snapshot {
        Snapshot::document(title, self.slots.to_vec(), self.style())
    }

    /// Snapshot of the styling only
    pub fn to_configuration(&self, title: &str) -> Snapshot {
        Snapshot::configuration(title, self.style())
    }

    /// Load a snapshot into the session. Documents replace the image slots;
    /// configurations leave them alone.
    pub fn apply(&mut self, snapshot: &Snapshot) {
        let (params, color) = snapshot.style.resolve();
        self.params = params;
        self.background_color = color;
        if let Some(urls) = &snapshot.image_urls {
            self.slots = ImageSlots::from_urls(urls.clone());
        }
    }
}
