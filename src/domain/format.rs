use std::path::Path;

use super::{error::RenderError, parameters::Parameters};

/// Derive the output format from the suffix of `rendered_filename`.
///
/// The suffix is lower-cased before it is checked against `params`.
pub fn infer_format(params: &Parameters, rendered_filename: &Path) -> Result<String, RenderError> {
    let suffix = rendered_filename
        .extension()
        .map(|ext| ext.to_string_lossy())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| {
            RenderError::invalid_argument(format!(
                "cannot infer rendering format from rendered_filename without suffix: {}",
                rendered_filename.display()
            ))
        })?;

    let format = suffix.to_lowercase();
    if !params.is_format(&format) {
        return Err(RenderError::invalid_argument(format!(
            "cannot infer rendering format from rendered_filename suffix: '{}'",
            rendered_filename.display()
        )));
    }

    Ok(format)
}
