//! Run DOT source through the layout tool via stdin/stdout, without touching the filesystem.

use std::time::Instant;

use tracing::info;

use super::render::Backend;
use crate::{
    domain::{CommandSpec, RenderError},
    infra::execute,
};

#[derive(Debug, Clone, Copy)]
pub struct PipeRequest<'a> {
    pub engine: &'a str,
    pub format: &'a str,
    pub renderer: Option<&'a str>,
    pub formatter: Option<&'a str>,
    pub neato_no_op: Option<u8>,
    pub quiet: bool,
}

impl<'a> PipeRequest<'a> {
    pub fn new(engine: &'a str, format: &'a str) -> Self {
        Self {
            engine,
            format,
            renderer: None,
            formatter: None,
            neato_no_op: None,
            quiet: false,
        }
    }
}

impl Backend {
    /// Return `data` rendered by the layout tool as raw bytes.
    pub fn pipe(&self, request: &PipeRequest<'_>, data: &[u8]) -> Result<Vec<u8>, RenderError> {
        let started_at = Instant::now();
        let command = self.command(&CommandSpec {
            engine: request.engine,
            format: Some(request.format),
            renderer: request.renderer,
            formatter: request.formatter,
            neato_no_op: request.neato_no_op,
        })?;

        let output = execute::run_check(&command, None, Some(data), request.quiet)?;

        info!(
            target = "application::pipe",
            op = "pipe::pipe",
            result = "ok",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            engine = request.engine,
            format = request.format,
            input_bytes = data.len(),
            output_bytes = output.stdout.len(),
            "Piped DOT source"
        );

        Ok(output.stdout)
    }

    /// Like [`Backend::pipe`], for text output formats such as `svg`.
    pub fn pipe_string(
        &self,
        request: &PipeRequest<'_>,
        source: &str,
    ) -> Result<String, RenderError> {
        let bytes = self.pipe(request, source.as_bytes())?;
        String::from_utf8(bytes).map_err(|_| RenderError::InvalidOutput {
            format: request.format.to_string(),
        })
    }
}
