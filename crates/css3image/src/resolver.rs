//! Translation of validated options into element attributes and inline style.
//!
//! The resolver is pure apart from the optional [`DimensionLookup`] probe and
//! produces the same output for the same input. Declarations are emitted in a
//! fixed order:
//!
//! 1. `width`, `height` (after scaling)
//! 2. plain and vendor-prefixed declarations, in option table order
//! 3. one combined `transform` per vendor prefix, functions in table order
//!
//! # Example
//!
//! ```
//! use css3image::node::ImageNode;
//! use css3image::options::{AlignContext, OptionTable};
//! use css3image::resolver::{ResolveInput, StyleResolver};
//!
//! let raw = vec![("rotate".to_owned(), "45".to_owned())];
//! let options = OptionTable::extended().validate(&raw, AlignContext::Block).unwrap();
//! let node = ImageNode::new("photo.jpg", options);
//!
//! let resolved = StyleResolver::default().resolve(&node, &ResolveInput::new("photo.jpg"));
//! assert_eq!(resolved.styles.len(), 4);
//! assert_eq!(resolved.styles[0].to_string(), "transform: rotate(45deg);");
//! assert_eq!(resolved.styles[3].to_string(), "-webkit-transform: rotate(45deg);");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::dimensions::DimensionLookup;
use crate::node::{ImageKind, ImageNode};
use crate::options::{Align, Length, OptionRole};

/// Prefixes repeated on `transform` and `transform-origin`.
pub const DEFAULT_VENDOR_PREFIXES: [&str; 4] = ["", "-ms-", "-moz-", "-webkit-"];

/// One `property: value;` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StyleDeclaration {
    pub property: String,
    pub value: String,
}

impl StyleDeclaration {
    fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property, self.value)
    }
}

/// Per-call inputs that do not come from the directive options.
#[derive(Clone, Copy)]
pub struct ResolveInput<'a> {
    /// URI to emit, after any output rewrite.
    pub uri: &'a str,
    /// Source file probed for intrinsic size.
    pub source_path: Option<&'a Path>,
    /// Image sits in running text or inside a hyperlink.
    pub parent_inline: bool,
    pub dimensions: Option<&'a dyn DimensionLookup>,
}

impl<'a> ResolveInput<'a> {
    /// Block-level input without dimension lookup.
    #[must_use]
    pub fn new(uri: &'a str) -> Self {
        Self {
            uri,
            source_path: None,
            parent_inline: false,
            dimensions: None,
        }
    }

    #[must_use]
    pub fn inline(mut self, parent_inline: bool) -> Self {
        self.parent_inline = parent_inline;
        self
    }

    #[must_use]
    pub fn with_dimensions(
        mut self,
        source_path: &'a Path,
        dimensions: &'a dyn DimensionLookup,
    ) -> Self {
        self.source_path = Some(source_path);
        self.dimensions = Some(dimensions);
        self
    }
}

impl fmt::Debug for ResolveInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveInput")
            .field("uri", &self.uri)
            .field("source_path", &self.source_path)
            .field("parent_inline", &self.parent_inline)
            .field("dimensions", &self.dimensions.is_some())
            .finish()
    }
}

/// Resolver output for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResolvedImage {
    pub kind: ImageKind,
    /// Element attributes other than `style`, sorted by name.
    pub attributes: BTreeMap<String, String>,
    pub styles: Vec<StyleDeclaration>,
    /// Alignment of the wrapping block container (vector images only).
    pub container: Option<Align>,
    /// Fallback body of an `<object>` element.
    pub content: Option<String>,
    /// Emitted after the element: `"\n"` in block context, empty inline.
    ///
    /// Always empty for [`ImageKind::Vector`]: the renderer's closing
    /// `</div>` carries the newline instead.
    pub suffix: &'static str,
}

impl ResolvedImage {
    /// Declarations joined into a `style` attribute value.
    #[must_use]
    pub fn style_attribute(&self) -> Option<String> {
        if self.styles.is_empty() {
            return None;
        }
        Some(
            self.styles
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

/// Computes attributes and style declarations from validated options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleResolver {
    vendor_prefixes: Vec<String>,
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new(DEFAULT_VENDOR_PREFIXES.iter().map(|p| (*p).to_owned()))
    }
}

impl StyleResolver {
    #[must_use]
    pub fn new(vendor_prefixes: impl IntoIterator<Item = String>) -> Self {
        Self {
            vendor_prefixes: vendor_prefixes.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn vendor_prefixes(&self) -> &[String] {
        &self.vendor_prefixes
    }

    /// Resolve one image.
    #[must_use]
    pub fn resolve(&self, node: &ImageNode, input: &ResolveInput<'_>) -> ResolvedImage {
        let kind = ImageKind::classify(input.uri);
        match kind {
            ImageKind::Vector => Self::resolve_vector(node, input),
            ImageKind::Object | ImageKind::Raster => self.resolve_embedded(kind, node, input),
        }
    }

    fn resolve_vector(node: &ImageNode, input: &ResolveInput<'_>) -> ResolvedImage {
        let options = &node.options;
        let mut attributes = identity_attributes(node);
        attributes.insert("src".to_owned(), input.uri.to_owned());
        if let Some(width) = options.width() {
            attributes.insert("width".to_owned(), width.to_string());
        }
        if let Some(height) = options.height() {
            attributes.insert("height".to_owned(), height.to_string());
        }
        if let Some(alt) = options.alt() {
            attributes.insert("alt".to_owned(), alt.to_owned());
        }

        ResolvedImage {
            kind: ImageKind::Vector,
            attributes,
            styles: Vec::new(),
            container: options.align(),
            content: None,
            suffix: "",
        }
    }

    fn resolve_embedded(
        &self,
        kind: ImageKind,
        node: &ImageNode,
        input: &ResolveInput<'_>,
    ) -> ResolvedImage {
        let options = &node.options;
        let mut attributes = identity_attributes(node);
        let mut content = None;

        if kind == ImageKind::Object {
            attributes.insert("data".to_owned(), input.uri.to_owned());
            attributes.insert("type".to_owned(), ImageKind::OBJECT_TYPE.to_owned());
            content = Some(options.alt().unwrap_or(input.uri).to_owned());
        } else {
            attributes.insert("src".to_owned(), input.uri.to_owned());
            attributes.insert(
                "alt".to_owned(),
                options.alt().unwrap_or(input.uri).to_owned(),
            );
        }

        let (width, height) = Self::dimensions(node, input);
        let mut styles = Vec::new();
        if let Some(width) = width {
            styles.push(StyleDeclaration::new("width", width.to_css()));
        }
        if let Some(height) = height {
            styles.push(StyleDeclaration::new("height", height.to_css()));
        }

        let mut transforms = Vec::new();
        for (spec, value) in options.iter() {
            let Some(css) = value.to_css() else {
                continue;
            };
            match spec.role {
                OptionRole::Declaration(property) => {
                    styles.push(StyleDeclaration::new(property, css));
                }
                OptionRole::PrefixedDeclaration(property) => {
                    styles.extend(self.prefixed(property, &css));
                }
                OptionRole::Transform(function) => {
                    transforms.push(format!("{function}({css})"));
                }
                _ => {}
            }
        }
        if !transforms.is_empty() {
            styles.extend(self.prefixed("transform", &transforms.join(" ")));
        }

        if let Some(align) = options.align() {
            push_class(&mut attributes, &align.class_name());
        }

        ResolvedImage {
            kind,
            attributes,
            styles,
            container: None,
            content,
            suffix: if input.parent_inline { "" } else { "\n" },
        }
    }

    /// Width and height after filling from the lookup and applying `scale`.
    fn dimensions(node: &ImageNode, input: &ResolveInput<'_>) -> (Option<Length>, Option<Length>) {
        let options = &node.options;
        let mut width = options.width().cloned();
        let mut height = options.height().cloned();

        let Some(scale) = options.scale() else {
            return (width, height);
        };

        if width.is_none() || height.is_none() {
            let intrinsic = input
                .source_path
                .zip(input.dimensions)
                .and_then(|(path, lookup)| lookup.lookup(path));
            if let Some((w, h)) = intrinsic {
                width.get_or_insert_with(|| Length::pixels(w));
                height.get_or_insert_with(|| Length::pixels(h));
            }
        }

        let percent = scale.value();
        let scale_one = |length: Length| {
            let scaled = length.scaled(percent);
            if scaled.is_none() {
                tracing::debug!(
                    length = %length,
                    scale = %scale,
                    "Dropped overflowing scaled size"
                );
            }
            scaled
        };
        (width.and_then(&scale_one), height.and_then(&scale_one))
    }

    fn prefixed<'a>(
        &'a self,
        property: &'a str,
        value: &'a str,
    ) -> impl Iterator<Item = StyleDeclaration> + 'a {
        self.vendor_prefixes
            .iter()
            .map(move |prefix| StyleDeclaration::new(format!("{prefix}{property}"), value))
    }
}

/// `id` and `class` attributes carried by every kind.
fn identity_attributes(node: &ImageNode) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    if let Some(id) = node.ids.first() {
        attributes.insert("id".to_owned(), id.clone());
    }
    if !node.classes.is_empty() {
        attributes.insert("class".to_owned(), node.classes.join(" "));
    }
    attributes
}

fn push_class(attributes: &mut BTreeMap<String, String>, class: &str) {
    attributes
        .entry("class".to_owned())
        .and_modify(|existing| {
            existing.push(' ');
            existing.push_str(class);
        })
        .or_insert_with(|| class.to_owned());
}
