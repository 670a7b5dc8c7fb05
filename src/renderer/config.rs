//! Output options for the card renderer

/// How the card SVG is written out
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Emit the `<?xml ...?>` prolog
    pub standalone: bool,

    /// One element per line, indented by nesting depth
    pub pretty_print: bool,

    /// Prepended to class names and def ids, so `fc-` yields `fc-frame`
    pub class_prefix: Option<String>,

    /// Caption drawn in frames whose URL is blank
    pub placeholder_text: String,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            pretty_print: true,
            class_prefix: Some("fc-".to_string()),
            placeholder_text: "No image".to_string(),
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Use bare class names and ids
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    pub fn with_placeholder_text(mut self, text: impl Into<String>) -> Self {
        self.placeholder_text = text.into();
        self
    }
}
