//! Command-line construction for the layout tool.

use std::{ffi::OsStr, fmt};

use super::{error::RenderError, parameters::Parameters};

pub const DEFAULT_PROGRAM: &str = "dot";

/// Ordered tokens of one layout tool invocation, program first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    pub fn program(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub(crate) fn push(&mut self, token: impl Into<String>) {
        self.0.push(token.into());
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(tokens: Vec<String>) -> Self {
        Self(tokens)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

/// Engine/format selection for one invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandSpec<'a> {
    pub engine: &'a str,
    pub format: Option<&'a str>,
    pub renderer: Option<&'a str>,
    pub formatter: Option<&'a str>,
    pub neato_no_op: Option<u8>,
}

/// Validate `spec` against `params` and build the tool invocation.
///
/// Output and input arguments are left to the caller.
pub fn build(
    params: &Parameters,
    program: &OsStr,
    spec: &CommandSpec<'_>,
) -> Result<CommandLine, RenderError> {
    if spec.formatter.is_some() && spec.renderer.is_none() {
        return Err(RenderError::missing_required_argument(
            "formatter given without renderer",
        ));
    }

    params.verify_engine(Some(spec.engine), true)?;
    params.verify_format(spec.format, true)?;
    params.verify_renderer(spec.renderer, false)?;
    params.verify_formatter(spec.formatter, false)?;
    params.verify_neato_no_op(spec.neato_no_op)?;

    let output_format = [spec.format, spec.renderer, spec.formatter]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(":");

    let mut tokens = vec![
        program.to_string_lossy().into_owned(),
        format!("-K{}", spec.engine),
        format!("-T{output_format}"),
    ];
    if let Some(value) = spec.neato_no_op {
        tokens.push(format!("-n{value}"));
    }

    Ok(CommandLine(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec<'a>(engine: &'a str, format: &'a str) -> CommandSpec<'a> {
        CommandSpec {
            engine,
            format: Some(format),
            ..Default::default()
        }
    }

    fn build_default(spec: &CommandSpec<'_>) -> Result<CommandLine, RenderError> {
        build(&Parameters::graphviz(), OsStr::new(DEFAULT_PROGRAM), spec)
    }

    #[test]
    fn builds_engine_and_format_flags() {
        let cmd = build_default(&spec("neato", "png")).expect("command");
        assert_eq!(cmd.tokens(), ["dot", "-Kneato", "-Tpng"]);
        assert_eq!(cmd.program(), "dot");
        assert_eq!(cmd.args(), ["-Kneato", "-Tpng"]);
    }

    #[test]
    fn joins_renderer_and_formatter_into_output_format() {
        let cmd = build_default(&CommandSpec {
            renderer: Some("cairo"),
            formatter: Some("core"),
            ..spec("dot", "pdf")
        })
        .expect("command");
        assert_eq!(cmd.tokens(), ["dot", "-Kdot", "-Tpdf:cairo:core"]);
    }

    #[test]
    fn renderer_without_formatter() {
        let cmd = build_default(&CommandSpec {
            renderer: Some("gd"),
            ..spec("dot", "png")
        })
        .expect("command");
        assert_eq!(cmd.tokens(), ["dot", "-Kdot", "-Tpng:gd"]);
    }

    #[test]
    fn appends_neato_no_op() {
        let cmd = build_default(&CommandSpec {
            neato_no_op: Some(2),
            ..spec("neato", "svg")
        })
        .expect("command");
        assert_eq!(cmd.tokens(), ["dot", "-Kneato", "-Tsvg", "-n2"]);
    }

    #[test]
    fn uses_configured_program() {
        let cmd = build(
            &Parameters::graphviz(),
            OsStr::new("/opt/graphviz/bin/dot"),
            &spec("dot", "svg"),
        )
        .expect("command");
        assert_eq!(cmd.program(), "/opt/graphviz/bin/dot");
    }

    #[test]
    fn output_is_deterministic() {
        let params = Parameters::graphviz();
        for engine in params.engines() {
            for format in params.formats() {
                let first = build_default(&spec(engine, format)).expect("command");
                let second = build_default(&spec(engine, format)).expect("command");
                assert_eq!(first, second);
                assert_eq!(
                    first.args(),
                    [format!("-K{engine}"), format!("-T{format}")]
                );
            }
        }

        let with_renderer = CommandSpec {
            renderer: Some("cairo"),
            formatter: Some("core"),
            ..spec("dot", "png")
        };
        assert_eq!(
            build_default(&with_renderer).expect("command"),
            build_default(&with_renderer).expect("command")
        );
    }

    #[test]
    fn formatter_without_renderer_is_missing_argument() {
        let err = build_default(&CommandSpec {
            formatter: Some("cairo"),
            ..spec("dot", "pdf")
        })
        .expect_err("formatter without renderer");
        assert!(matches!(err, RenderError::MissingRequiredArgument { .. }));
    }

    #[test]
    fn formatter_check_precedes_missing_format() {
        let err = build_default(&CommandSpec {
            engine: "dot",
            renderer: None,
            formatter: Some("cairo"),
            ..Default::default()
        })
        .expect_err("formatter without renderer");
        assert!(matches!(err, RenderError::MissingRequiredArgument { .. }));
    }

    #[test]
    fn missing_format_is_invalid_argument() {
        let err = build_default(&CommandSpec {
            engine: "dot",
            renderer: Some("cairo"),
            formatter: Some("cairo"),
            ..Default::default()
        })
        .expect_err("format required");
        assert!(matches!(err, RenderError::InvalidArgument { .. }));
        assert!(err.to_string().contains("missing format"));
    }

    #[test]
    fn rejects_unknown_values_by_field() {
        for (candidate, field) in [
            (spec("spam", "svg"), "engine"),
            (spec("dot", "spam"), "format"),
            (
                CommandSpec {
                    renderer: Some("spam"),
                    ..spec("dot", "svg")
                },
                "renderer",
            ),
            (
                CommandSpec {
                    renderer: Some("cairo"),
                    formatter: Some("spam"),
                    ..spec("dot", "svg")
                },
                "formatter",
            ),
        ] {
            let err = build_default(&candidate).expect_err("unknown value");
            let message = err.to_string();
            assert!(message.contains(field), "{message}");
            assert!(message.contains("spam"), "{message}");
        }
    }
}
