use std::{
    fs,
    path::{Path, PathBuf},
};

use super::{
    jupyter::{MimeContent, MimeRepresentations, MimeType, Representation},
    pipe::PipeRequest,
    render::{Backend, RenderRequest},
};
use crate::domain::{
    RenderError,
    parameters::{DEFAULT_ENGINE, DEFAULT_FORMAT},
};

/// Serialized DOT text together with its rendering defaults.
#[derive(Debug, Clone)]
pub struct Source {
    text: String,
    engine: String,
    format: String,
    renderer: Option<String>,
    formatter: Option<String>,
    /// Applies to notebook retrievals, which take no per-call flag.
    quiet: bool,
    backend: Backend,
}

impl Source {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            engine: DEFAULT_ENGINE.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            renderer: None,
            formatter: None,
            quiet: false,
            backend: Backend::default(),
        }
    }

    /// Read DOT text from `path`.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        fs::read_to_string(path).map(Self::new)
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.renderer = Some(renderer.into());
        self
    }

    pub fn with_formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    fn pipe_request<'a>(&'a self, format: &'a str, quiet: bool) -> PipeRequest<'a> {
        PipeRequest {
            engine: &self.engine,
            format,
            renderer: self.renderer.as_deref(),
            formatter: self.formatter.as_deref(),
            neato_no_op: None,
            quiet,
        }
    }

    /// Return the source rendered into `format` (the default format when `None`).
    pub fn pipe(&self, format: Option<&str>, quiet: bool) -> Result<Vec<u8>, RenderError> {
        let format = format.unwrap_or(&self.format);
        self.backend
            .pipe(&self.pipe_request(format, quiet), self.text.as_bytes())
    }

    /// Save the source to `directory/filename` and render it there.
    ///
    /// Returns the path of the rendered file.
    pub fn render(
        &self,
        directory: impl AsRef<Path>,
        filename: &str,
        quiet: bool,
    ) -> Result<PathBuf, RenderError> {
        let directory = directory.as_ref();
        let filepath = directory.join(filename);
        fs::create_dir_all(directory)
            .and_then(|()| fs::write(&filepath, &self.text))
            .map_err(|err| RenderError::Save {
                path: filepath.clone(),
                source: err,
            })?;

        let mut request = RenderRequest::new(&self.engine, Some(self.format.as_str()), filepath)
            .with_quiet(quiet);
        request.renderer = self.renderer.clone();
        request.formatter = self.formatter.clone();
        self.backend.render(&request)
    }

    fn pipe_as(&self, mimetype: MimeType) -> Result<MimeContent, RenderError> {
        match mimetype {
            MimeType::ImageSvgXml => self
                .backend
                .pipe_string(&self.pipe_request("svg", self.quiet), &self.text)
                .map(MimeContent::Text),
            MimeType::ImageJpeg => self
                .pipe(Some("jpeg"), self.quiet)
                .map(MimeContent::Binary),
            MimeType::ImagePng => self.pipe(Some("png"), self.quiet).map(MimeContent::Binary),
        }
    }
}

impl MimeRepresentations for Source {
    fn representation(&self, mimetype: MimeType) -> Option<Representation<'_>> {
        Some(Box::new(move || self.pipe_as(mimetype)))
    }
}
