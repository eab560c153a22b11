//! HTML rendering of directive nodes.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::node::{ImageKind, ImageNode, Node};
use crate::options::make_id;
use crate::registry::RenderContext;
use crate::resolver::{ResolveInput, ResolvedImage};
use crate::target::Reference;

/// Render a node as an HTML fragment.
///
/// A [`Node::Reference`] wraps the image in `<a>`; the image itself is then in
/// inline context and the closing tag carries the block suffix instead.
#[must_use]
pub fn render_html(node: &Node, ctx: &RenderContext<'_>) -> String {
    match node {
        Node::Image(image) => render_image(image, ctx, ctx.inline),
        Node::Reference { reference, image } => {
            let (class, href) = match reference {
                Reference::Uri { uri } => ("reference external image-reference", uri.clone()),
                Reference::Name { refname, .. } => (
                    "reference internal image-reference",
                    format!("#{}", make_id(refname)),
                ),
            };
            let mut html = format!(r#"<a class="{class}" href="{}">"#, escape_html(&href));
            html.push_str(&render_image(image, ctx, true));
            html.push_str("</a>");
            if !ctx.inline {
                html.push('\n');
            }
            html
        }
    }
}

fn render_image(image: &ImageNode, ctx: &RenderContext<'_>, parent_inline: bool) -> String {
    let uri = ctx.environment.output_uri(&image.uri);
    let source_path = ctx.environment.source_path(&image.uri);

    let mut input = ResolveInput::new(&uri).inline(parent_inline);
    if let Some(lookup) = ctx.dimensions {
        input = input.with_dimensions(&source_path, lookup);
    }

    render_resolved(&ctx.resolver.resolve(image, &input))
}

/// Render resolver output as markup.
///
/// ```
/// use css3image::html::render_resolved;
/// use css3image::node::ImageNode;
/// use css3image::options::ImageOptions;
/// use css3image::resolver::{ResolveInput, StyleResolver};
///
/// let node = ImageNode::new("a.png", ImageOptions::default());
/// let resolved = StyleResolver::default().resolve(&node, &ResolveInput::new("a.png"));
/// assert_eq!(render_resolved(&resolved), "<img alt=\"a.png\" src=\"a.png\" />\n");
/// ```
#[must_use]
pub fn render_resolved(resolved: &ResolvedImage) -> String {
    let mut attributes = resolved.attributes.clone();
    if let Some(style) = resolved.style_attribute() {
        attributes.insert("style".to_owned(), style);
    }
    let attrs = format_attributes(&attributes);
    let suffix = resolved.suffix;

    match resolved.kind {
        ImageKind::Vector => {
            let img = format!("<img{attrs} />{suffix}");
            match resolved.container {
                Some(align) => format!(
                    "<div align=\"{align}\" class=\"{}\">{img}</div>\n",
                    align.class_name()
                ),
                None => img,
            }
        }
        ImageKind::Object => {
            let content = resolved.content.as_deref().unwrap_or_default();
            format!(
                "<object{attrs}>{suffix}{}</object>{suffix}",
                escape_html(content)
            )
        }
        ImageKind::Raster => format!("<img{attrs} />{suffix}"),
    }
}

/// Attributes in sorted order, each preceded by a space.
fn format_attributes(attributes: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (name, value) in attributes {
        let _ = write!(out, r#" {name}="{}""#, escape_html(value));
    }
    out
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
