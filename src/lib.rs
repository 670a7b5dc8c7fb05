//! Fancard - fanned image card compositions
//!
//! This library provides the fan layout engine, an editing session, a
//! snapshot store with cross-session sync, and an SVG renderer for the
//! resulting card.
//!
//! # Example
//!
//! ```rust
//! use fancard::{render, Session};
//!
//! let mut session = Session::new();
//! session.slots_mut().update(0, "https://example.com/a.png").unwrap();
//! session.slots_mut().add();
//!
//! let svg = render(&session);
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("https://example.com/a.png"));
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod renderer;
pub mod session;
pub mod snapshot;
pub mod workspace;

pub use config::{AppConfig, ConfigError};
pub use error::ValidationError;
pub use export::{
    ExportError, ExportOptions, ExportOutput, Exporter, ImageFormat, Rasterizer, SvgPassthrough,
};
pub use layout::{place, place_all, LayoutParameters, ParameterOverrides, Placement};
pub use renderer::{render_card, render_frames, SvgConfig};
pub use session::{AspectLock, ImageSlots, Parameter, Session};
pub use snapshot::{
    CardStyle, Collection, DurableMedium, FileMedium, MemoryMedium, PersistenceError, Snapshot,
    SnapshotStore, StorageEvent, StoreError,
};
pub use workspace::{AlwaysConfirm, Shell, Workspace};

/// Render a session to SVG with default configuration
pub fn render(session: &Session) -> String {
    render_card(session, &SvgConfig::default())
}

/// Render a session and hand the result to an exporter.
///
/// Returns `None` when the export fails; the failure is logged.
pub fn export_card<R: Rasterizer>(
    session: &Session,
    exporter: &mut Exporter<R>,
    title: Option<&str>,
) -> Option<ExportOutput> {
    let svg = render(session);
    exporter.export(&svg, session.params().background_width, title)
}
