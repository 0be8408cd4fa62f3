//! Render orchestration and notebook display support.

pub mod jupyter;
pub mod pipe;
pub mod render;
pub mod source;

pub use jupyter::{
    DEFAULT_JUPYTER_FORMAT, JUPYTER_FORMATS, MimeBundle, MimeContent, MimeRepresentations,
    MimeType, Representation, build_representation_bundle, format_to_mimetype,
    mimetype_to_format,
};
pub use pipe::PipeRequest;
pub use render::{Backend, RenderPlan, RenderRequest};
pub use source::Source;
