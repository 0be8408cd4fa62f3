use std::{
    io::{self, Write},
    process::ExitCode,
};

use graphviz_render::{
    application::{Backend, RenderRequest, Source, build_representation_bundle},
    config::{self, Command, MimeBundleArgs, RenderArgs, Settings},
    domain::RenderError,
    infra::{error::InfraError, telemetry},
};
use thiserror::Error;
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[derive(Debug, Error)]
enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] config::LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AppError {
    fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Render(err) if err.is_caller_error() => ExitCode::from(2),
            AppError::Config(_) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report_application_error(&error);
            error.exit_code()
        }
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let backend = Backend::new(settings.render.dot_binary.clone());

    match cli_args.command {
        Command::Render(args) => run_render(&backend, &settings, args),
        Command::MimeBundle(args) => run_mimebundle(backend, &settings, args),
    }
}

fn run_render(backend: &Backend, settings: &Settings, args: RenderArgs) -> Result<(), AppError> {
    let engine = args
        .engine
        .unwrap_or_else(|| settings.render.default_engine.clone());

    let mut request = RenderRequest::new(engine, args.format.as_deref(), args.file)
        .with_quiet(args.quiet || settings.render.quiet);
    request.renderer = args.renderer;
    request.formatter = args.formatter;
    request.neato_no_op = args.neato_no_op;
    request.rendered_filename = args.rendered_filename;

    let rendered = backend.render(&request)?;
    writeln!(io::stdout().lock(), "{}", rendered.display()).map_err(InfraError::from)?;
    Ok(())
}

fn run_mimebundle(
    backend: Backend,
    settings: &Settings,
    args: MimeBundleArgs,
) -> Result<(), AppError> {
    let engine = args
        .engine
        .unwrap_or_else(|| settings.render.default_engine.clone());
    let source = Source::from_file(&args.file)
        .map_err(|err| {
            InfraError::input(format!("cannot read {}: {err}", args.file.display()))
        })?
        .with_engine(engine)
        .with_quiet(args.quiet || settings.render.quiet)
        .with_backend(backend);

    let include = args.include.iter().map(String::as_str).collect::<Vec<_>>();
    let exclude = args.exclude.iter().map(String::as_str).collect::<Vec<_>>();
    let bundle = build_representation_bundle(
        &source,
        (!include.is_empty()).then_some(include.as_slice()),
        Some(exclude.as_slice()),
    )?;

    let json = serde_json::to_string_pretty(&bundle).map_err(InfraError::from)?;
    writeln!(io::stdout().lock(), "{json}").map_err(InfraError::from)?;
    Ok(())
}
