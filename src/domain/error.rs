use std::{io, path::PathBuf};

use thiserror::Error;

use super::command::CommandLine;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("missing required argument: {message}")]
    MissingRequiredArgument { message: String },
    #[error(
        "failed to execute {command}, make sure the Graphviz executables are on your system's PATH"
    )]
    ExecutableNotFound {
        command: CommandLine,
        #[source]
        source: io::Error,
    },
    #[error("{command} returned non-zero exit status {}: {stderr}", display_exit_code(.exit_code))]
    Process {
        command: CommandLine,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("output of format `{format}` is not valid UTF-8")]
    InvalidOutput { format: String },
    #[error("failed to save DOT source to {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to run {command}: {source}")]
    Io {
        command: CommandLine,
        #[source]
        source: io::Error,
    },
}

impl RenderError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn missing_required_argument(message: impl Into<String>) -> Self {
        Self::MissingRequiredArgument {
            message: message.into(),
        }
    }

    /// True when the caller supplied bad input and no process was started.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::MissingRequiredArgument { .. }
        )
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Process { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

fn display_exit_code(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => code.to_string(),
        None => "(terminated by signal)".to_string(),
    }
}
