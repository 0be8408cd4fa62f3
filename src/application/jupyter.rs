//! Notebook display support: format/mimetype mapping and mimebundle assembly.
//!
//! Front-ends ask for a set of mimetypes; an object that can render itself
//! exposes one optional retrieval per mimetype and the bundle is built from
//! whichever of those it actually offers.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::domain::RenderError;

const IMAGE_JPEG: &str = "image/jpeg";

/// Notebook formats in declaration order; reverse lookup returns the first match.
pub const JUPYTER_FORMATS: [(&str, &str); 4] = [
    ("jpeg", IMAGE_JPEG),
    ("jpg", IMAGE_JPEG),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
];

pub const DEFAULT_JUPYTER_FORMAT: &str = "svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MimeType {
    ImageJpeg,
    ImagePng,
    ImageSvgXml,
}

impl MimeType {
    /// Enumeration order used when assembling a bundle.
    pub const ALL: [MimeType; 3] = [
        MimeType::ImageJpeg,
        MimeType::ImagePng,
        MimeType::ImageSvgXml,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::ImageJpeg => IMAGE_JPEG,
            MimeType::ImagePng => "image/png",
            MimeType::ImageSvgXml => "image/svg+xml",
        }
    }

    pub fn default_mimetype() -> Self {
        MimeType::ImageSvgXml
    }
}

impl TryFrom<&str> for MimeType {
    type Error = RenderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MimeType::ALL
            .into_iter()
            .find(|mimetype| mimetype.as_str() == value)
            .ok_or_else(|| {
                RenderError::invalid_argument(format!("unsupported mimetype: '{value}'"))
            })
    }
}

pub fn format_to_mimetype(format: &str) -> Result<&'static str, RenderError> {
    JUPYTER_FORMATS
        .iter()
        .find(|(name, _)| *name == format)
        .map(|(_, mimetype)| *mimetype)
        .ok_or_else(|| {
            RenderError::invalid_argument(format!("unknown jupyter_format: '{format}'"))
        })
}

/// Map a supported mimetype back to a format name.
///
/// Fails for mimetypes outside the supported set; `Ok(None)` means supported
/// but no format maps to it.
pub fn mimetype_to_format(mimetype: &str) -> Result<Option<&'static str>, RenderError> {
    MimeType::try_from(mimetype)?;
    Ok(JUPYTER_FORMATS
        .iter()
        .find(|(_, candidate)| *candidate == mimetype)
        .map(|(format, _)| *format))
}

/// Rendered content for one mimetype: text for SVG, bytes otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimeContent {
    Binary(Vec<u8>),
    Text(String),
}

pub type Representation<'a> = Box<dyn FnOnce() -> Result<MimeContent, RenderError> + 'a>;

/// Capability probe for objects that can render themselves for notebook display.
pub trait MimeRepresentations {
    /// Retrieval for `mimetype`, or `None` when this object does not offer it.
    fn representation(&self, mimetype: MimeType) -> Option<Representation<'_>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeBundle(BTreeMap<MimeType, MimeContent>);

impl MimeBundle {
    pub fn get(&self, mimetype: MimeType) -> Option<&MimeContent> {
        self.0.get(&mimetype)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MimeType, &MimeContent)> {
        self.0.iter().map(|(mimetype, content)| (*mimetype, content))
    }
}

/// Serialises as `{mimetype: content}` with binary content base64-encoded.
impl Serialize for MimeBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use base64::{Engine as _, engine::general_purpose::STANDARD};

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (mimetype, content) in &self.0 {
            match content {
                MimeContent::Text(text) => map.serialize_entry(mimetype.as_str(), text)?,
                MimeContent::Binary(bytes) => {
                    map.serialize_entry(mimetype.as_str(), &STANDARD.encode(bytes))?
                }
            }
        }
        map.end()
    }
}

/// Build the mimebundle `target` offers for `include` minus `exclude`.
///
/// `include` defaults to the SVG mimetype. Unknown mimetypes and mimetypes the
/// target does not offer are skipped; only a failing retrieval is an error.
pub fn build_representation_bundle<T>(
    target: &T,
    include: Option<&[&str]>,
    exclude: Option<&[&str]>,
) -> Result<MimeBundle, RenderError>
where
    T: MimeRepresentations + ?Sized,
{
    let wanted = |mimetype: MimeType| {
        let included = match include {
            Some(include) => include.contains(&mimetype.as_str()),
            None => mimetype == MimeType::default_mimetype(),
        };
        let excluded = exclude.is_some_and(|exclude| exclude.contains(&mimetype.as_str()));
        included && !excluded
    };

    let mut bundle = BTreeMap::new();
    for mimetype in MimeType::ALL.into_iter().filter(|m| wanted(*m)) {
        if let Some(retrieve) = target.representation(mimetype) {
            bundle.insert(mimetype, retrieve()?);
        }
    }
    Ok(MimeBundle(bundle))
}
