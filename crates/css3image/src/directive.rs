//! The image directive: validates one invocation and builds its output node.
//!
//! The host parses the markup and hands over the directive argument (the image
//! URI) and the raw option pairs. Validation is eager: any invalid option fails
//! the whole invocation and no node is produced. A malformed `target` is the
//! exception, reported as a diagnostic while the image is still rendered.
//!
//! # Example
//!
//! ```
//! use css3image::directive::{Css3ImageDirective, DirectiveArgs, DirectiveContext};
//! use css3image::node::Node;
//! use css3image::options::OptionTable;
//!
//! let directive = Css3ImageDirective::new("css3image", OptionTable::extended());
//! let args = DirectiveArgs::new("photo.jpg")
//!     .with_option("width", "200")
//!     .with_option("target", "https://example.com/photo-large.jpg");
//!
//! let result = directive.run(&args, &DirectiveContext::default()).unwrap();
//! assert!(result.messages.is_empty());
//! assert!(matches!(result.nodes[0], Node::Reference { .. }));
//! ```

use crate::error::{DirectiveError, OptionError};
use crate::node::{ImageNode, Node};
use crate::options::{AlignContext, OptionTable};
use crate::target::{DefaultTargetResolver, TargetResolver};

/// Option name used when reporting problems with the directive argument.
const URI_OPTION: &str = "uri";

/// Host-supplied arguments of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// The directive argument: image URI, possibly wrapped over lines.
    pub argument: String,
    /// Option pairs in source order.
    pub options: Vec<(String, String)>,
}

impl DirectiveArgs {
    #[must_use]
    pub fn new(argument: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }
}

/// Where the directive was invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveContext {
    /// Line number for error reports.
    pub line: usize,
    /// Invoked inside a substitution definition.
    pub in_substitution: bool,
}

impl DirectiveContext {
    #[must_use]
    pub fn at_line(line: usize) -> Self {
        Self {
            line,
            in_substitution: false,
        }
    }

    #[must_use]
    pub fn in_substitution(mut self) -> Self {
        self.in_substitution = true;
        self
    }
}

/// Successful directive output.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveResult {
    /// Always one node: the image, or a reference wrapping it.
    pub nodes: Vec<Node>,
    /// Non-fatal diagnostics, such as a malformed target.
    pub messages: Vec<DirectiveError>,
}

/// The enhanced image directive.
#[derive(Debug, Clone)]
pub struct Css3ImageDirective<R = DefaultTargetResolver> {
    name: String,
    table: OptionTable,
    targets: R,
}

impl Css3ImageDirective {
    #[must_use]
    pub fn new(name: impl Into<String>, table: OptionTable) -> Self {
        Self {
            name: name.into(),
            table,
            targets: DefaultTargetResolver,
        }
    }
}

impl<R: TargetResolver> Css3ImageDirective<R> {
    /// Replace the parser used for the `target` option.
    #[must_use]
    pub fn with_target_resolver<T: TargetResolver>(self, targets: T) -> Css3ImageDirective<T> {
        Css3ImageDirective {
            name: self.name,
            table: self.table,
            targets,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn table(&self) -> OptionTable {
        self.table
    }

    /// Run one invocation.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError`] for a missing URI or the first invalid,
    /// unknown or repeated option.
    pub fn run(
        &self,
        args: &DirectiveArgs,
        ctx: &DirectiveContext,
    ) -> Result<DirectiveResult, DirectiveError> {
        let uri: String = args.argument.split_whitespace().collect();
        if uri.is_empty() {
            return Err(self.error(URI_OPTION, OptionError::MissingUri, ctx));
        }

        let options = self
            .table
            .validate(
                &args.options,
                AlignContext::from_substitution(ctx.in_substitution),
            )
            .map_err(|rejected| self.error(&rejected.name, rejected.error, ctx))?;

        let mut messages = Vec::new();
        let reference = match options.target().map(|t| self.targets.resolve(t)) {
            Some(Ok(reference)) => Some(reference),
            Some(Err(kind)) => {
                tracing::warn!(
                    directive = %self.name,
                    line = ctx.line,
                    error = %kind,
                    "Ignoring image target"
                );
                messages.push(self.error("target", kind, ctx));
                None
            }
            None => None,
        };

        let image = ImageNode::new(uri, options);
        let node = match reference {
            Some(reference) => Node::Reference { reference, image },
            None => Node::Image(image),
        };

        Ok(DirectiveResult {
            nodes: vec![node],
            messages,
        })
    }

    fn error(&self, option: &str, kind: OptionError, ctx: &DirectiveContext) -> DirectiveError {
        DirectiveError {
            directive: self.name.clone(),
            option: option.to_owned(),
            line: ctx.line,
            kind,
        }
    }
}
