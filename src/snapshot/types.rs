//! Snapshot records and their JSON wire shape

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::params::{
    clamp_size, LayoutParameters, DEFAULT_BACKGROUND_COLOR, DEFAULT_BACKGROUND_WIDTH,
    DEFAULT_BORDER_RADIUS, DEFAULT_FAN_HEIGHT_DIFF, DEFAULT_FAN_ROTATION, DEFAULT_FAN_SPACING,
    DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_SHADOW,
};

/// Which of the two independent snapshot collections an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Full edit state including image URLs
    Documents,
    /// Style presets without image URLs
    Configurations,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Documents, Collection::Configurations];

    /// Key under which the collection lives in the durable medium
    pub fn storage_key(self) -> &'static str {
        match self {
            Collection::Documents => "savedDocuments",
            Collection::Configurations => "savedConfigurations",
        }
    }

    /// Find the collection stored under `key`
    pub fn from_storage_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.storage_key() == key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Documents => write!(f, "document"),
            Collection::Configurations => write!(f, "configuration"),
        }
    }
}

/// Styling and layout fields shared by both snapshot variants.
///
/// Every field is optional on the wire; [`CardStyle::resolve`] applies the
/// documented defaults for anything absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_vertical_height_diff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_rotate: Option<f64>,
}

impl CardStyle {
    /// Capture a complete style from live parameters
    pub fn capture(params: &LayoutParameters, background_color: &str) -> Self {
        Self {
            background_color: Some(background_color.to_string()),
            image_width: Some(f64::from(params.image_width)),
            image_height: Some(f64::from(params.image_height)),
            background_width: Some(f64::from(params.background_width)),
            border_radius: Some(params.border_radius),
            shadow: Some(params.shadow),
            fan_rotation: Some(params.fan_rotation),
            fan_spacing: Some(params.fan_spacing),
            fan_vertical_height_diff: Some(params.fan_vertical_height_diff),
            translate_x: Some(params.translate_x),
            translate_y: Some(params.translate_y),
            image_rotate: Some(params.image_rotate),
        }
    }

    /// Turn the stored fields into live parameters and a background color.
    ///
    /// Absent or non-finite fields take their defaults; present values are
    /// clamped to the editable ranges.
    pub fn resolve(&self) -> (LayoutParameters, String) {
        let background_width = present(self.background_width)
            .map(|w| w.round().max(1.0) as u32)
            .unwrap_or(DEFAULT_BACKGROUND_WIDTH);

        let mut params = LayoutParameters {
            image_width: clamp_size(
                present(self.image_width).unwrap_or(f64::from(DEFAULT_IMAGE_WIDTH)),
                DEFAULT_IMAGE_WIDTH,
            ),
            image_height: clamp_size(
                present(self.image_height).unwrap_or(f64::from(DEFAULT_IMAGE_HEIGHT)),
                DEFAULT_IMAGE_HEIGHT,
            ),
            ..LayoutParameters::default()
        };
        params = params
            .with_background_width(background_width)
            .with_border_radius(present(self.border_radius).unwrap_or(DEFAULT_BORDER_RADIUS))
            .with_shadow(present(self.shadow).unwrap_or(DEFAULT_SHADOW))
            .with_fan_rotation(present(self.fan_rotation).unwrap_or(DEFAULT_FAN_ROTATION))
            .with_fan_spacing(present(self.fan_spacing).unwrap_or(DEFAULT_FAN_SPACING))
            .with_fan_vertical_height_diff(
                present(self.fan_vertical_height_diff).unwrap_or(DEFAULT_FAN_HEIGHT_DIFF),
            )
            .with_translate(
                present(self.translate_x).unwrap_or(0.0),
                present(self.translate_y).unwrap_or(0.0),
            )
            .with_image_rotate(present(self.image_rotate).unwrap_or(0.0));

        let color = self
            .background_color
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_BACKGROUND_COLOR)
            .to_string();

        (params, color)
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// A named, persisted copy of editor state.
///
/// A snapshot carrying `image_urls` is a document; one without is a
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Empty until the store assigns one on save
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(flatten)]
    pub style: CardStyle,
}

impl Snapshot {
    /// A document snapshot with image URLs
    pub fn document(title: impl Into<String>, image_urls: Vec<String>, style: CardStyle) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            image_urls: Some(image_urls),
            style,
        }
    }

    /// A configuration snapshot (style only)
    pub fn configuration(title: impl Into<String>, style: CardStyle) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            image_urls: None,
            style,
        }
    }

    pub fn is_document(&self) -> bool {
        self.image_urls.is_some()
    }
}
