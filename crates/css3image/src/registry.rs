//! Extension registration: the directive plus one renderer per output format.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use css3image_config::Config;

use crate::dimensions::DimensionLookup;
use crate::directive::Css3ImageDirective;
use crate::environment::ImageEnvironment;
use crate::html::render_html;
use crate::node::Node;
use crate::options::OptionTable;
use crate::resolver::StyleResolver;

/// Output format a renderer is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Html,
    Text,
}

impl OutputFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized output format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format \"{0}\"")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Self::Html),
            "text" => Ok(Self::Text),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

/// Everything a renderer needs besides the node.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub environment: &'a ImageEnvironment,
    pub resolver: &'a StyleResolver,
    pub dimensions: Option<&'a dyn DimensionLookup>,
    /// Node sits in running text rather than at block level.
    pub inline: bool,
}

/// Renderer for one output format.
pub type RenderFn = fn(&Node, &RenderContext<'_>) -> String;

/// Plain-text output drops images.
fn render_text(_node: &Node, _ctx: &RenderContext<'_>) -> String {
    String::new()
}

/// Registered directive with its renderers and image environment.
pub struct Extension {
    directive: Css3ImageDirective,
    renderers: HashMap<OutputFormat, RenderFn>,
    environment: ImageEnvironment,
    resolver: StyleResolver,
    dimension_lookup: bool,
}

impl Extension {
    #[must_use]
    pub fn directive(&self) -> &Css3ImageDirective {
        &self.directive
    }

    #[must_use]
    pub fn environment(&self) -> &ImageEnvironment {
        &self.environment
    }

    #[must_use]
    pub fn resolver(&self) -> &StyleResolver {
        &self.resolver
    }

    #[must_use]
    pub fn renderer(&self, format: OutputFormat) -> Option<RenderFn> {
        self.renderers.get(&format).copied()
    }

    /// Register or replace the renderer for `format`.
    #[must_use]
    pub fn with_renderer(mut self, format: OutputFormat, render: RenderFn) -> Self {
        self.renderers.insert(format, render);
        self
    }

    /// Render with the configured dimension lookup.
    ///
    /// Returns `None` when no renderer is registered for `format`.
    #[must_use]
    pub fn render(&self, node: &Node, format: OutputFormat, inline: bool) -> Option<String> {
        #[cfg(feature = "dimensions")]
        let lookup = crate::dimensions::ImageFileDimensions;
        #[cfg(feature = "dimensions")]
        let dimensions: Option<&dyn DimensionLookup> = self
            .dimension_lookup
            .then_some(&lookup as &dyn DimensionLookup);
        #[cfg(not(feature = "dimensions"))]
        let dimensions: Option<&dyn DimensionLookup> = None;

        self.render_with(node, format, inline, dimensions)
    }

    /// Render with an explicit dimension lookup.
    #[must_use]
    pub fn render_with(
        &self,
        node: &Node,
        format: OutputFormat,
        inline: bool,
        dimensions: Option<&dyn DimensionLookup>,
    ) -> Option<String> {
        let render = self.renderer(format)?;
        let ctx = RenderContext {
            environment: &self.environment,
            resolver: &self.resolver,
            dimensions,
            inline,
        };
        Some(render(node, &ctx))
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<_> = self.renderers.keys().map(|f| f.as_str()).collect();
        formats.sort_unstable();
        f.debug_struct("Extension")
            .field("directive", &self.directive)
            .field("formats", &formats)
            .field("environment", &self.environment)
            .field("resolver", &self.resolver)
            .field("dimension_lookup", &self.dimension_lookup)
            .finish()
    }
}

/// Build the extension from configuration.
///
/// # Example
///
/// ```
/// use css3image::registry::{OutputFormat, register};
/// use css3image_config::Config;
///
/// let extension = register(&Config::default());
/// assert_eq!(extension.directive().name(), "css3image");
/// assert!(extension.renderer(OutputFormat::Html).is_some());
/// ```
#[must_use]
pub fn register(config: &Config) -> Extension {
    let table = OptionTable::from_profile(config.directive.profile);
    let directive = Css3ImageDirective::new(config.directive.name.clone(), table);

    let mut renderers: HashMap<OutputFormat, RenderFn> = HashMap::new();
    renderers.insert(OutputFormat::Html, render_html);
    renderers.insert(OutputFormat::Text, render_text);

    tracing::debug!(
        directive = %config.directive.name,
        options = table.specs().len(),
        "Registered image directive"
    );

    Extension {
        directive,
        renderers,
        environment: ImageEnvironment::from_config(&config.images_resolved),
        resolver: StyleResolver::new(config.style.vendor_prefixes.iter().cloned()),
        dimension_lookup: config.images_resolved.dimension_lookup,
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::directive::{DirectiveArgs, DirectiveContext};
    use css3image_config::Profile;
    use pretty_assertions::assert_eq;

    fn photo_node(extension: &Extension) -> Node {
        let args = DirectiveArgs::new("photo.jpg").with_option("rotate", "45");
        extension
            .directive()
            .run(&args, &DirectiveContext::default())
            .unwrap()
            .nodes
            .remove(0)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("html".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!(
            "latex".parse::<OutputFormat>(),
            Err(UnknownFormat("latex".to_owned()))
        );
    }

    #[test]
    fn test_text_renders_nothing() {
        let extension = register(&Config::default());
        let node = photo_node(&extension);
        assert_eq!(
            extension.render(&node, OutputFormat::Text, false),
            Some(String::new())
        );
    }

    #[test]
    fn test_html_renders_image() {
        let extension = register(&Config::default());
        let node = photo_node(&extension);
        let html = extension
            .render_with(&node, OutputFormat::Html, false, None)
            .unwrap();
        assert!(html.starts_with("<img alt=\"photo.jpg\" src=\"photo.jpg\""));
        assert!(html.contains("-webkit-transform: rotate(45deg);"));
    }

    #[test]
    fn test_config_drives_name_profile_and_prefixes() {
        let mut config = Config::default();
        config.directive.name = "figure3d".to_owned();
        config.directive.profile = Profile::Minimal;
        config.style.vendor_prefixes = vec![String::new()];

        let extension = register(&config);
        assert_eq!(extension.directive().name(), "figure3d");
        assert_eq!(extension.directive().table(), OptionTable::minimal());
        assert_eq!(extension.resolver().vendor_prefixes(), [String::new()]);
    }

    #[test]
    fn test_custom_renderer_replaces_builtin() {
        fn shout(node: &Node, _ctx: &RenderContext<'_>) -> String {
            node.image().uri.to_uppercase()
        }

        let extension = register(&Config::default()).with_renderer(OutputFormat::Text, shout);
        let node = photo_node(&extension);
        assert_eq!(
            extension.render(&node, OutputFormat::Text, false).as_deref(),
            Some("PHOTO.JPG")
        );
    }

    #[test]
    fn test_render_with_lookup() {
        let extension = register(&Config::default());
        let args = DirectiveArgs::new("photo.jpg").with_option("scale", "50");
        let node = extension
            .directive()
            .run(&args, &DirectiveContext::default())
            .unwrap()
            .nodes
            .remove(0);
        let lookup = |_: &Path| Some((640_u32, 480_u32));

        let html = extension
            .render_with(&node, OutputFormat::Html, false, Some(&lookup))
            .unwrap();
        assert!(html.contains("style=\"width: 320px; height: 240px;\""));
    }
}
