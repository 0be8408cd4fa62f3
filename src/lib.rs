//! Drive the Graphviz layout tool: build validated command lines, render DOT
//! files next to their sources, and assemble notebook mimebundles.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

pub use application::{
    Backend, MimeBundle, MimeContent, MimeRepresentations, MimeType, PipeRequest, RenderRequest,
    Source, build_representation_bundle, format_to_mimetype, mimetype_to_format,
};
pub use domain::{CommandLine, Parameters, RenderError, infer_format};
