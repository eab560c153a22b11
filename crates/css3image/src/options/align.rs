//! Alignment option and the context rule choosing its legal values.

use std::fmt;

use crate::error::OptionError;

/// Image alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Align {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

impl Align {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Top => "top",
            Self::Middle => "middle",
            Self::Bottom => "bottom",
        }
    }

    /// Class name carried by aligned output: `align-<value>`.
    #[must_use]
    pub fn class_name(self) -> String {
        format!("align-{}", self.as_str())
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the directive was invoked.
///
/// Inside a substitution definition the image sits in running text and only
/// vertical alignment makes sense; everywhere else only horizontal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignContext {
    #[default]
    Block,
    Substitution,
}

impl AlignContext {
    #[must_use]
    pub fn from_substitution(in_substitution: bool) -> Self {
        if in_substitution {
            Self::Substitution
        } else {
            Self::Block
        }
    }

    /// Legal values, in definition order.
    #[must_use]
    pub fn allowed(self) -> &'static [Align] {
        match self {
            Self::Block => &[Align::Left, Align::Center, Align::Right],
            Self::Substitution => &[Align::Top, Align::Middle, Align::Bottom],
        }
    }
}

/// Validate an alignment value against the context's enum.
///
/// # Example
///
/// ```
/// use css3image::options::{Align, AlignContext, validate_alignment};
///
/// assert_eq!(validate_alignment("left", AlignContext::Block), Ok(Align::Left));
/// assert!(validate_alignment("left", AlignContext::Substitution).is_err());
/// ```
pub fn validate_alignment(raw: &str, context: AlignContext) -> Result<Align, OptionError> {
    let value = raw.trim();
    context
        .allowed()
        .iter()
        .copied()
        .find(|align| align.as_str() == value)
        .ok_or_else(|| OptionError::InvalidAlignment {
            value: raw.to_owned(),
            allowed: context.allowed().iter().map(|a| a.as_str()).collect(),
            in_substitution: context == AlignContext::Substitution,
        })
}
