//! Enhanced image directive for documentation builds.
//!
//! Translates directive options (alignment, scale, margins, rotation,
//! translation) into HTML attributes and an ordered inline style. The pipeline:
//!
//! 1. [`directive::Css3ImageDirective::run`] validates the option pairs against
//!    an [`options::OptionTable`] and returns a [`node::Node`]
//! 2. [`resolver::StyleResolver`] turns the node into attributes and style
//!    declarations, probing a [`dimensions::DimensionLookup`] when `scale`
//!    needs a missing size
//! 3. a renderer registered for an [`registry::OutputFormat`] writes markup
//!
//! [`registry::register`] wires all three from a `css3image.toml`
//! configuration.
//!
//! # Example
//!
//! ```
//! use css3image::{DirectiveArgs, DirectiveContext, OutputFormat, register};
//! use css3image_config::Config;
//!
//! let extension = register(&Config::default());
//! let args = DirectiveArgs::new("photo.jpg")
//!     .with_option("width", "200")
//!     .with_option("scale", "50");
//! let result = extension
//!     .directive()
//!     .run(&args, &DirectiveContext::default())
//!     .unwrap();
//!
//! let html = extension
//!     .render_with(&result.nodes[0], OutputFormat::Html, false, None)
//!     .unwrap();
//! assert_eq!(
//!     html,
//!     "<img alt=\"photo.jpg\" src=\"photo.jpg\" style=\"width: 100px;\" />\n"
//! );
//! ```
//!
//! # Features
//!
//! - `dimensions` (default): [`dimensions::ImageFileDimensions`], reading
//!   intrinsic sizes with the `image` crate
//! - `serde`: `Serialize` for resolver output

pub mod dimensions;
pub mod directive;
pub mod environment;
pub mod error;
pub mod html;
pub mod node;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod target;

pub use directive::{Css3ImageDirective, DirectiveArgs, DirectiveContext, DirectiveResult};
pub use error::{DirectiveError, OptionError};
pub use node::{ImageKind, ImageNode, Node};
pub use options::{OptionTable, make_id};
pub use registry::{Extension, OutputFormat, register};
pub use resolver::{ResolvedImage, StyleDeclaration, StyleResolver};
