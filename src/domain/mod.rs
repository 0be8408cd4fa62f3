//! Pure value logic: known-value registries, command construction and format inference.

pub mod command;
pub mod error;
pub mod format;
pub mod parameters;

pub use command::{CommandLine, CommandSpec, DEFAULT_PROGRAM};
pub use error::RenderError;
pub use format::infer_format;
pub use parameters::Parameters;
