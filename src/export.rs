//! Image export
//!
//! Rendering the composition to pixels is delegated to a [`Rasterizer`]. The
//! crate ships [`SvgPassthrough`], which hands back the SVG document itself;
//! PNG output needs a rasterizer supplied by the host.

use std::path::{Path, PathBuf};

use base64::prelude::*;
use thiserror::Error;

/// Errors raised while producing an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("rasterizer failed: {0}")]
    Rasterize(String),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("canvas is empty")]
    EmptyCanvas,
}

impl ExportError {
    /// Create a rasterizer error
    pub fn rasterize(reason: impl Into<String>) -> Self {
        Self::Rasterize(reason.into())
    }
}

/// Output encoding produced by a rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// Turns a rendered SVG canvas into encoded image bytes
pub trait Rasterizer {
    fn format(&self) -> ImageFormat;

    /// Render `svg`, whose logical size is `size x size`, at `pixel_ratio`
    fn rasterize(&mut self, svg: &str, size: u32, pixel_ratio: f64) -> Result<Vec<u8>, ExportError>;
}

/// Emits the SVG document unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgPassthrough;

impl Rasterizer for SvgPassthrough {
    fn format(&self) -> ImageFormat {
        ImageFormat::Svg
    }

    fn rasterize(
        &mut self,
        svg: &str,
        _size: u32,
        _pixel_ratio: f64,
    ) -> Result<Vec<u8>, ExportError> {
        Ok(svg.as_bytes().to_vec())
    }
}

/// Default pixel density of exported images
pub const DEFAULT_PIXEL_RATIO: f64 = 2.0;

/// Default file stem when the export has no title
pub const DEFAULT_FILE_STEM: &str = "image-card";

/// Options for a single export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub pixel_ratio: f64,
    pub file_stem: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            file_stem: DEFAULT_FILE_STEM.to_string(),
        }
    }
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pixel ratio; non-positive values keep the current one
    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            self.pixel_ratio = ratio;
        }
        self
    }

    pub fn with_file_stem(mut self, stem: impl Into<String>) -> Self {
        self.file_stem = stem.into();
        self
    }

    /// File name for an export titled `title`, falling back to the default stem
    pub fn file_name(&self, title: Option<&str>, format: ImageFormat) -> String {
        let stem = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.file_stem);
        let stem: String = stem
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}.{}", stem, format.extension())
    }
}

/// A finished export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutput {
    pub file_name: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    /// Pixel dimensions after scaling
    pub width: u32,
    pub height: u32,
}

impl ExportOutput {
    /// Encode as a `data:` URL
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            BASE64_STANDARD.encode(&self.bytes)
        )
    }

    /// Write into `dir` under `file_name`, returning the full path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Drives a rasterizer and names the result
pub struct Exporter<R: Rasterizer> {
    rasterizer: R,
    options: ExportOptions,
}

impl<R: Rasterizer> Exporter<R> {
    pub fn new(rasterizer: R) -> Self {
        Self::with_options(rasterizer, ExportOptions::default())
    }

    pub fn with_options(rasterizer: R, options: ExportOptions) -> Self {
        Self { rasterizer, options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Render `svg` of logical size `size` and name it after `title`
    pub fn try_export(
        &mut self,
        svg: &str,
        size: u32,
        title: Option<&str>,
    ) -> Result<ExportOutput, ExportError> {
        if size == 0 || svg.is_empty() {
            return Err(ExportError::EmptyCanvas);
        }
        let ratio = self.options.pixel_ratio;
        let bytes = self.rasterizer.rasterize(svg, size, ratio)?;
        let format = self.rasterizer.format();
        let scaled = (f64::from(size) * ratio).round() as u32;

        Ok(ExportOutput {
            file_name: self.options.file_name(title, format),
            format,
            bytes,
            width: scaled,
            height: scaled,
        })
    }

    /// Like [`try_export`](Self::try_export), but failures are logged and
    /// produce no output
    pub fn export(&mut self, svg: &str, size: u32, title: Option<&str>) -> Option<ExportOutput> {
        match self.try_export(svg, size, title) {
            Ok(output) => {
                tracing::info!(
                    file = %output.file_name,
                    bytes = output.bytes.len(),
                    "exported image"
                );
                Some(output)
            }
            Err(e) => {
                tracing::error!(error = %e, "export failed");
                None
            }
        }
    }
}
