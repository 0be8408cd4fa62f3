//! Known-value registries of the wrapped layout tool.

use super::error::RenderError;

pub const DEFAULT_ENGINE: &str = "dot";
pub const DEFAULT_FORMAT: &str = "pdf";

const ENGINES: &[&str] = &[
    "dot",
    "neato",
    "twopi",
    "circo",
    "fdp",
    "sfdp",
    "patchwork",
    "osage",
];

// https://www.graphviz.org/docs/outputs/
const FORMATS: &[&str] = &[
    "bmp",
    "canon",
    "dot",
    "gv",
    "xdot",
    "xdot1.2",
    "xdot1.4",
    "cgimage",
    "cmap",
    "eps",
    "exr",
    "fig",
    "gd",
    "gd2",
    "gif",
    "gtk",
    "ico",
    "imap",
    "cmapx",
    "imap_np",
    "cmapx_np",
    "ismap",
    "jp2",
    "jpg",
    "jpeg",
    "jpe",
    "json",
    "json0",
    "dot_json",
    "xdot_json",
    "pct",
    "pict",
    "pdf",
    "pic",
    "plain",
    "plain-ext",
    "png",
    "pov",
    "ps",
    "ps2",
    "psd",
    "sgi",
    "svg",
    "svgz",
    "tga",
    "tif",
    "tiff",
    "tk",
    "vml",
    "vmlz",
    "vrml",
    "wbmp",
    "webp",
    "xlib",
    "x11",
];

const RENDERERS: &[&str] = &[
    "cairo", "dot", "fig", "gd", "gdiplus", "map", "pic", "pov", "ps", "svg", "tk", "vml", "vrml",
    "xdot",
];

const FORMATTERS: &[&str] = &["cairo", "core", "gd", "gdiplus", "gdwbmp", "xlib"];

const NEATO_NO_OP: &[u8] = &[1, 2];

/// Immutable validation table for engine, format, renderer and formatter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parameters {
    engines: &'static [&'static str],
    formats: &'static [&'static str],
    renderers: &'static [&'static str],
    formatters: &'static [&'static str],
}

impl Default for Parameters {
    fn default() -> Self {
        Self::graphviz()
    }
}

impl Parameters {
    /// The value sets accepted by Graphviz `dot`.
    pub const fn graphviz() -> Self {
        Self {
            engines: ENGINES,
            formats: FORMATS,
            renderers: RENDERERS,
            formatters: FORMATTERS,
        }
    }

    pub const fn new(
        engines: &'static [&'static str],
        formats: &'static [&'static str],
        renderers: &'static [&'static str],
        formatters: &'static [&'static str],
    ) -> Self {
        Self {
            engines,
            formats,
            renderers,
            formatters,
        }
    }

    pub fn engines(&self) -> &'static [&'static str] {
        self.engines
    }

    pub fn formats(&self) -> &'static [&'static str] {
        self.formats
    }

    pub fn renderers(&self) -> &'static [&'static str] {
        self.renderers
    }

    pub fn formatters(&self) -> &'static [&'static str] {
        self.formatters
    }

    pub fn is_format(&self, format: &str) -> bool {
        self.formats.contains(&format)
    }

    pub fn verify_engine(&self, engine: Option<&str>, required: bool) -> Result<(), RenderError> {
        verify("engine", self.engines, engine, required)
    }

    pub fn verify_format(&self, format: Option<&str>, required: bool) -> Result<(), RenderError> {
        verify("format", self.formats, format, required)
    }

    pub fn verify_renderer(
        &self,
        renderer: Option<&str>,
        required: bool,
    ) -> Result<(), RenderError> {
        verify("renderer", self.renderers, renderer, required)
    }

    pub fn verify_formatter(
        &self,
        formatter: Option<&str>,
        required: bool,
    ) -> Result<(), RenderError> {
        verify("formatter", self.formatters, formatter, required)
    }

    pub fn verify_neato_no_op(&self, neato_no_op: Option<u8>) -> Result<(), RenderError> {
        match neato_no_op {
            Some(value) if !NEATO_NO_OP.contains(&value) => Err(RenderError::invalid_argument(
                format!("unknown neato_no_op: {value} (expected 1 or 2)"),
            )),
            _ => Ok(()),
        }
    }
}

fn verify(
    field: &'static str,
    known: &[&str],
    value: Option<&str>,
    required: bool,
) -> Result<(), RenderError> {
    match value {
        None if required => Err(RenderError::invalid_argument(format!("missing {field}"))),
        None => Ok(()),
        Some(value) if known.contains(&value) => Ok(()),
        Some(value) => Err(RenderError::invalid_argument(format!(
            "unknown {field}: '{value}'"
        ))),
    }
}
