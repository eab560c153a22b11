//! Hyperlink targets for the `target` option.
//!
//! A target is either an external URI or a reference to a name defined
//! elsewhere in the document (`name_` or `` `some phrase`_ ``). Resolving the
//! named reference to a concrete location is left to the host.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::OptionError;

/// `simplename_` or `` `phrase`_ ``, after surrounding whitespace is trimmed.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([^\W_]+(?:[-._+:][^\W_]+)*)_|`([^`]+)`_)$").unwrap()
});

/// Parsed `target` option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum Reference {
    /// External link, whitespace removed.
    Uri { uri: String },
    /// Reference by name.
    Name {
        /// Lowercased, whitespace-collapsed lookup key.
        refname: String,
        /// Name as written, whitespace collapsed.
        name: String,
    },
}

/// Parses the raw `target` option.
pub trait TargetResolver {
    /// Turn raw option text into a [`Reference`].
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::MalformedTarget`] when the text cannot be a
    /// target. The directive reports it as a diagnostic and renders the image
    /// without a link.
    fn resolve(&self, target: &str) -> Result<Reference, OptionError>;
}

/// Default target syntax.
///
/// Text ending in an unescaped `_` must be a valid reference name; anything
/// else is a URI.
///
/// # Example
///
/// ```
/// use css3image::target::{DefaultTargetResolver, Reference, TargetResolver};
///
/// let resolver = DefaultTargetResolver;
/// assert_eq!(
///     resolver.resolve("https://example.com/ big.png").unwrap(),
///     Reference::Uri { uri: "https://example.com/big.png".to_owned() }
/// );
/// assert!(matches!(
///     resolver.resolve("`Full Size`_").unwrap(),
///     Reference::Name { .. }
/// ));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTargetResolver;

impl TargetResolver for DefaultTargetResolver {
    fn resolve(&self, target: &str) -> Result<Reference, OptionError> {
        let trimmed = collapse_whitespace(target);
        if trimmed.is_empty() {
            return Err(malformed(target, "empty target"));
        }

        if trimmed.ends_with('_') && !trimmed.ends_with("\\_") {
            let caps = REFERENCE_RE
                .captures(&trimmed)
                .ok_or_else(|| malformed(target, "malformed hyperlink target"))?;
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| collapse_whitespace(m.as_str()))
                .unwrap_or_default();
            return Ok(Reference::Name {
                refname: name.to_lowercase(),
                name,
            });
        }

        let uri: String = target
            .split_whitespace()
            .collect::<String>()
            .replace("\\_", "_");
        Ok(Reference::Uri { uri })
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn malformed(target: &str, message: &str) -> OptionError {
    OptionError::MalformedTarget {
        target: target.to_owned(),
        message: message.to_owned(),
    }
}
