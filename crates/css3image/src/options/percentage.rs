//! Percentage options (`scale`, `scaleX`, `scaleY`).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::length::format_number;
use crate::error::OptionError;

static PERCENTAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?) *%?$").unwrap());

/// A validated, non-negative percentage. Displays with a trailing `%`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Percentage {
    number: String,
    value: f64,
}

impl Percentage {
    /// Percentage value (`50` for `50%`).
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Multiplier: `value / 100`.
    #[must_use]
    pub fn factor(&self) -> f64 {
        self.value / 100.0
    }

    /// Multiplier rendered for a CSS function argument.
    #[must_use]
    pub fn factor_css(&self) -> String {
        format_number(self.factor())
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.number)
    }
}

/// Validate a number with an optional trailing `%`.
///
/// # Example
///
/// ```
/// use css3image::options::validate_percentage;
///
/// assert_eq!(validate_percentage("50").unwrap().factor(), 0.5);
/// assert_eq!(validate_percentage("150 %").unwrap().to_string(), "150%");
/// ```
pub fn validate_percentage(raw: &str) -> Result<Percentage, OptionError> {
    let invalid = || OptionError::InvalidPercentage {
        value: raw.to_owned(),
    };

    let caps = PERCENTAGE_RE.captures(raw.trim()).ok_or_else(invalid)?;
    let number = &caps[1];
    let value: f64 = number.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }

    Ok(Percentage {
        number: number.to_owned(),
        value,
    })
}
