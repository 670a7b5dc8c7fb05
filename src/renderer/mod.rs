//! SVG renderer for card compositions
//!
//! This module turns a parameter set and a list of image URLs into the
//! visual tree handed to the export collaborator.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{render_card, render_frames, SvgBuilder};
