use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the graphviz-render binary.
#[derive(Debug, Parser)]
#[command(
    name = "graphviz-render",
    version,
    about = "Render DOT files with Graphviz"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "GRAPHVIZ_RENDER_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render a DOT file and print the path of the output file.
    Render(RenderArgs),
    /// Print the notebook mimebundle of a DOT file as JSON.
    #[command(name = "mimebundle")]
    MimeBundle(MimeBundleArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the layout executable.
    #[arg(long = "dot-binary", value_name = "PATH", global = true)]
    pub dot_binary: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Layout engine; defaults to `render.default_engine`.
    #[arg(short = 'K', long, value_name = "ENGINE")]
    pub engine: Option<String>,

    /// Output format; inferred from --output when omitted.
    #[arg(short = 'T', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Output renderer.
    #[arg(long, value_name = "RENDERER")]
    pub renderer: Option<String>,

    /// Output formatter; requires --renderer.
    #[arg(long, value_name = "FORMATTER")]
    pub formatter: Option<String>,

    /// Neato no-op mode (1 or 2).
    #[arg(short = 'n', long = "neato-no-op", value_name = "MODE")]
    pub neato_no_op: Option<u8>,

    /// Exact output filename, relative to the source file's directory.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub rendered_filename: Option<PathBuf>,

    /// Do not forward the layout tool's stderr.
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub quiet: bool,

    /// DOT source file to render.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct MimeBundleArgs {
    /// Layout engine; defaults to `render.default_engine`.
    #[arg(short = 'K', long, value_name = "ENGINE")]
    pub engine: Option<String>,

    /// Mimetype to include; repeatable. Without any --include only
    /// image/svg+xml is rendered, so an empty selection cannot be requested.
    #[arg(long, value_name = "MIMETYPE")]
    pub include: Vec<String>,

    /// Mimetype to exclude; repeatable.
    #[arg(long, value_name = "MIMETYPE")]
    pub exclude: Vec<String>,

    /// Do not forward the layout tool's stderr.
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub quiet: bool,

    /// DOT source file to display.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}
