//! Output nodes produced by the directive and consumed by renderers.

use std::path::Path;

use crate::options::{ImageOptions, make_id};
use crate::target::Reference;

/// Image produced by one directive invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNode {
    /// Source URI, whitespace removed.
    pub uri: String,
    pub options: ImageOptions,
    /// Identifiers derived from the `name` option.
    pub ids: Vec<String>,
    /// Names as written in the `name` option, whitespace collapsed.
    pub names: Vec<String>,
    /// Classes from the `class` option.
    pub classes: Vec<String>,
}

impl ImageNode {
    /// Build a node from a normalized URI and validated options.
    #[must_use]
    pub fn new(uri: impl Into<String>, options: ImageOptions) -> Self {
        let mut node = Self {
            uri: uri.into(),
            ids: Vec::new(),
            names: Vec::new(),
            classes: options.classes().to_vec(),
            options,
        };

        if let Some(name) = node.options.name() {
            let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
            let id = make_id(&name);
            if !id.is_empty() {
                node.ids.push(id);
            }
            if !name.is_empty() {
                node.names.push(name);
            }
        }

        node
    }
}

/// Directive output.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Image(ImageNode),
    /// Image wrapped in a hyperlink from the `target` option.
    Reference {
        reference: Reference,
        image: ImageNode,
    },
}

impl Node {
    /// The image, whether or not it is wrapped.
    #[must_use]
    pub fn image(&self) -> &ImageNode {
        match self {
            Self::Image(image) | Self::Reference { image, .. } => image,
        }
    }
}

/// How an image URI is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageKind {
    /// `.svg` / `.svgz`: plain `<img>`, optionally inside an aligned `<div>`.
    Vector,
    /// `.swf`: `<object>` with fallback content.
    Object,
    Raster,
}

impl ImageKind {
    /// MIME type for [`ImageKind::Object`] embeds.
    pub const OBJECT_TYPE: &'static str = "application/x-shockwave-flash";

    /// Classify a URI by its extension, case-insensitively.
    ///
    /// ```
    /// use css3image::node::ImageKind;
    ///
    /// assert_eq!(ImageKind::classify("logo.SVG"), ImageKind::Vector);
    /// assert_eq!(ImageKind::classify("intro.swf"), ImageKind::Object);
    /// assert_eq!(ImageKind::classify("photo.jpg"), ImageKind::Raster);
    /// ```
    #[must_use]
    pub fn classify(uri: &str) -> Self {
        let lower = uri.to_lowercase();
        if lower.ends_with(".svg") || lower.ends_with(".svgz") {
            return Self::Vector;
        }
        let extension = Path::new(&lower)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if extension == "swf" {
            Self::Object
        } else {
            Self::Raster
        }
    }
}
