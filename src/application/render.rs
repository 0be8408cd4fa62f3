//! Render DOT source files into output files with the layout tool.
//!
//! The layout command runs from the directory of the source file, so that
//! references to external files (e.g. `[image="images/camelot.png"]`) can be
//! written relative to the DOT source.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    time::Instant,
};

use tracing::{info, warn};

use crate::{
    domain::{
        CommandLine, CommandSpec, DEFAULT_PROGRAM, Parameters, RenderError, command,
        infer_format,
    },
    infra::execute,
};

/// Handle on a layout tool installation plus the value table it accepts.
#[derive(Debug, Clone)]
pub struct Backend {
    program: PathBuf,
    parameters: Parameters,
}

impl Default for Backend {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Backend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            parameters: Parameters::graphviz(),
        }
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub(crate) fn command(&self, spec: &CommandSpec<'_>) -> Result<CommandLine, RenderError> {
        command::build(&self.parameters, self.program.as_os_str(), spec)
    }

    /// Validate `request` and work out the invocation without running anything.
    pub fn prepare(&self, request: &RenderRequest) -> Result<RenderPlan, RenderError> {
        let (dirname, filename) = split_source_path(&request.source_path)?;

        let mut format = request.format.clone();
        if let Some(rendered_filename) = request.rendered_filename.as_deref() {
            let suffix_format = infer_format(&self.parameters, rendered_filename)?;
            if let Some(explicit) = format.as_deref() {
                if explicit.to_lowercase() != suffix_format {
                    return Err(RenderError::invalid_argument(format!(
                        "format '{explicit}' contradicts suffix from rendered_filename: '{suffix_format}'"
                    )));
                }
            }
            format = Some(suffix_format);
        }

        let mut command = self.command(&CommandSpec {
            engine: &request.engine,
            format: format.as_deref(),
            renderer: request.renderer.as_deref(),
            formatter: request.formatter.as_deref(),
            neato_no_op: request.neato_no_op,
        })?;

        let rendered = match request.rendered_filename.as_deref() {
            Some(rendered_filename) => {
                command.push(format!("-o{}", rendered_filename.display()));
                rendered_filename.to_path_buf()
            }
            None => {
                command.push("-O");
                PathBuf::from(auto_rendered_name(
                    filename,
                    format.as_deref(),
                    request.renderer.as_deref(),
                    request.formatter.as_deref(),
                ))
            }
        };

        command.push(filename.to_string_lossy());

        let (cwd, rendered) = match dirname {
            Some(dir) => (Some(dir.to_path_buf()), dir.join(rendered)),
            None => (None, rendered),
        };

        Ok(RenderPlan {
            command,
            cwd,
            rendered,
        })
    }

    /// Render the file named by `request`, returning the path of the output file.
    ///
    /// The returned path is relative to the caller's working directory when the
    /// source path is. Existence of the output is trusted from the exit status.
    pub fn render(&self, request: &RenderRequest) -> Result<PathBuf, RenderError> {
        let started_at = Instant::now();
        let plan = self.prepare(request).inspect_err(|err| {
            warn!(
                target = "application::render",
                op = "render::render",
                result = "rejected",
                source_path = %request.source_path.display(),
                error = %err,
                "Render request rejected"
            );
        })?;

        execute::run_check(&plan.command, plan.cwd.as_deref(), None, request.quiet)?;

        info!(
            target = "application::render",
            op = "render::render",
            result = "ok",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            engine = %request.engine,
            source_path = %request.source_path.display(),
            rendered = %plan.rendered.display(),
            "Rendered DOT source"
        );

        Ok(plan.rendered)
    }
}

/// Fully resolved invocation for one render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub command: CommandLine,
    /// Working directory for the process; `None` inherits the caller's.
    pub cwd: Option<PathBuf>,
    pub rendered: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub engine: String,
    pub format: Option<String>,
    pub source_path: PathBuf,
    pub renderer: Option<String>,
    pub formatter: Option<String>,
    pub neato_no_op: Option<u8>,
    /// Do not forward the layout tool's stderr.
    pub quiet: bool,
    /// Exact output filename; its suffix decides the format.
    pub rendered_filename: Option<PathBuf>,
}

impl RenderRequest {
    pub fn new(
        engine: impl Into<String>,
        format: Option<&str>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine: engine.into(),
            format: format.map(str::to_string),
            source_path: source_path.into(),
            renderer: None,
            formatter: None,
            neato_no_op: None,
            quiet: false,
            rendered_filename: None,
        }
    }

    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.renderer = Some(renderer.into());
        self
    }

    pub fn with_formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    pub fn with_neato_no_op(mut self, neato_no_op: u8) -> Self {
        self.neato_no_op = Some(neato_no_op);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_rendered_filename(mut self, rendered_filename: impl Into<PathBuf>) -> Self {
        self.rendered_filename = Some(rendered_filename.into());
        self
    }
}

fn split_source_path(source_path: &Path) -> Result<(Option<&Path>, &OsStr), RenderError> {
    let filename = source_path.file_name().ok_or_else(|| {
        RenderError::invalid_argument(format!(
            "source path has no file name: {}",
            source_path.display()
        ))
    })?;
    let dirname = source_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty());
    Ok((dirname, filename))
}

/// Name `dot -O` gives its output: `<filename>.<formatter>.<renderer>.<format>`.
fn auto_rendered_name(
    filename: &OsStr,
    format: Option<&str>,
    renderer: Option<&str>,
    formatter: Option<&str>,
) -> String {
    let suffix = [formatter, renderer, format]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(".");
    format!("{}.{suffix}", filename.to_string_lossy())
}
