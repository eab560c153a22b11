//! Length and length-list options.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::OptionError;

/// Signed number, optional run of spaces, optional unit.
static LENGTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([+-]?[0-9]+(?:\.[0-9]+)?) *(em|ex|ch|rem|vw|vh|vmin|vmax|px|in|cm|mm|pt|pc|Q|%)?$",
    )
    .unwrap()
});

/// Digits kept after the decimal point in computed magnitudes.
const PRECISION: usize = 6;

/// CSS length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Unit {
    /// No unit: pixels when emitted as a style declaration.
    None,
    Em,
    Ex,
    Ch,
    Rem,
    Vw,
    Vh,
    Vmin,
    Vmax,
    Px,
    In,
    Cm,
    Mm,
    Pt,
    Pc,
    Q,
    Percent,
}

impl Unit {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "" => Self::None,
            "em" => Self::Em,
            "ex" => Self::Ex,
            "ch" => Self::Ch,
            "rem" => Self::Rem,
            "vw" => Self::Vw,
            "vh" => Self::Vh,
            "vmin" => Self::Vmin,
            "vmax" => Self::Vmax,
            "px" => Self::Px,
            "in" => Self::In,
            "cm" => Self::Cm,
            "mm" => Self::Mm,
            "pt" => Self::Pt,
            "pc" => Self::Pc,
            "Q" => Self::Q,
            "%" => Self::Percent,
            _ => return None,
        })
    }

    /// Unit suffix as written in CSS (empty for [`Unit::None`]).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Em => "em",
            Self::Ex => "ex",
            Self::Ch => "ch",
            Self::Rem => "rem",
            Self::Vw => "vw",
            Self::Vh => "vh",
            Self::Vmin => "vmin",
            Self::Vmax => "vmax",
            Self::Px => "px",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::Q => "Q",
            Self::Percent => "%",
        }
    }
}

/// A validated length: magnitude as written plus unit.
///
/// The numeric text is kept verbatim so a normalized length fed back through
/// [`validate_length`] comes out identical.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Length {
    number: String,
    value: f64,
    unit: Unit,
}

impl Length {
    /// Unit-less length from an intrinsic pixel size.
    #[must_use]
    pub fn pixels(size: u32) -> Self {
        Self {
            number: size.to_string(),
            value: f64::from(size),
            unit: Unit::None,
        }
    }

    /// Numeric magnitude.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Scale the magnitude by `percent` / 100, keeping the unit.
    ///
    /// Returns `None` when the product overflows.
    #[must_use]
    pub fn scaled(&self, percent: f64) -> Option<Self> {
        let value = self.value * percent / 100.0;
        if !value.is_finite() {
            return None;
        }
        let number = format_number(value);
        Some(Self {
            value: number.parse().unwrap_or(value),
            number,
            unit: self.unit,
        })
    }

    /// Value for a style declaration: unit-less lengths become pixels.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self.unit {
            Unit::None => format!("{}px", self.number),
            unit => format!("{}{}", self.number, unit.as_str()),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.unit.as_str())
    }
}

/// Render a computed float rounded to [`PRECISION`] decimals, without
/// trailing zeros.
pub(crate) fn format_number(value: f64) -> String {
    let text = format!("{value:.prec$}", prec = PRECISION);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_owned(),
        text => text.to_owned(),
    }
}

/// Validate a length that may carry any recognized unit, including `%`.
///
/// Spaces between number and unit are dropped.
///
/// # Example
///
/// ```
/// use css3image::options::validate_length;
///
/// assert_eq!(validate_length("12 em").unwrap().to_string(), "12em");
/// assert_eq!(validate_length("50%").unwrap().to_string(), "50%");
/// assert!(validate_length("wide").is_err());
/// ```
pub fn validate_length(raw: &str) -> Result<Length, OptionError> {
    let invalid = || OptionError::InvalidLength {
        value: raw.to_owned(),
    };

    let caps = LENGTH_RE.captures(raw.trim()).ok_or_else(invalid)?;
    let number = &caps[1];
    let value: f64 = number.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    let unit = Unit::parse(caps.get(2).map_or("", |m| m.as_str())).ok_or_else(invalid)?;

    Ok(Length {
        number: number.to_owned(),
        value,
        unit,
    })
}

/// Validate a length that must not be a percentage.
pub fn validate_length_or_unitless(raw: &str) -> Result<Length, OptionError> {
    let length = validate_length(raw)?;
    if length.unit == Unit::Percent {
        return Err(OptionError::InvalidLength {
            value: raw.to_owned(),
        });
    }
    Ok(length)
}

/// Validate an unsigned `width` or `height`.
///
/// `%` is accepted only when `allow_percent` is set.
///
/// ```
/// use css3image::options::validate_size;
///
/// assert_eq!(validate_size("40%", true).unwrap().to_string(), "40%");
/// assert!(validate_size("40%", false).is_err());
/// assert!(validate_size("-200", true).is_err());
/// ```
pub fn validate_size(raw: &str, allow_percent: bool) -> Result<Length, OptionError> {
    let length = if allow_percent {
        validate_length(raw)?
    } else {
        validate_length_or_unitless(raw)?
    };
    if length.number.starts_with(['+', '-']) {
        return Err(OptionError::InvalidLength {
            value: raw.to_owned(),
        });
    }
    Ok(length)
}

/// Validated list of lengths, e.g. a `margin` shorthand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LengthList {
    parts: Vec<Length>,
    separator: &'static str,
}

impl LengthList {
    #[must_use]
    pub fn parts(&self) -> &[Length] {
        &self.parts
    }

    /// Value for a style declaration, unit-less parts as pixels.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.parts
            .iter()
            .map(Length::to_css)
            .collect::<Vec<_>>()
            .join(self.separator)
    }
}

impl fmt::Display for LengthList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.parts.iter().enumerate() {
            if idx > 0 {
                f.write_str(self.separator)?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// Validate up to `max_count` lengths.
///
/// The string is split on commas when it contains one, otherwise on
/// whitespace. Normalized parts are joined with `separator`.
///
/// # Example
///
/// ```
/// use css3image::options::validate_length_list;
///
/// let list = validate_length_list("1 2em 3", 4, " ").unwrap();
/// assert_eq!(list.to_string(), "1 2em 3");
/// assert_eq!(list.to_css(), "1px 2em 3px");
/// ```
pub fn validate_length_list(
    raw: &str,
    max_count: usize,
    separator: &'static str,
) -> Result<LengthList, OptionError> {
    let pieces: Vec<&str> = if raw.contains(',') {
        raw.split(',').map(str::trim).collect()
    } else {
        raw.split_whitespace().collect()
    };

    if pieces.is_empty() {
        return Err(OptionError::InvalidLength {
            value: raw.to_owned(),
        });
    }
    if pieces.len() > max_count {
        return Err(OptionError::InvalidLengthList {
            value: raw.to_owned(),
            count: pieces.len(),
            max: max_count,
        });
    }

    let parts = pieces
        .into_iter()
        .map(validate_length)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LengthList { parts, separator })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unitless() {
        let length = validate_length("200").unwrap();
        assert_eq!(length.to_string(), "200");
        assert_eq!(length.unit(), Unit::None);
        assert_eq!(length.to_css(), "200px");
    }

    #[test]
    fn test_units_preserved() {
        for raw in ["10px", "1.5em", "3rem", "2cm", "12pt", "40vw", "50%"] {
            assert_eq!(validate_length(raw).unwrap().to_string(), raw);
        }
    }

    #[test]
    fn test_space_before_unit_removed() {
        assert_eq!(validate_length("10 px").unwrap().to_string(), "10px");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        assert_eq!(validate_length("  7mm ").unwrap().to_string(), "7mm");
    }

    #[test]
    fn test_overflowing_number_rejected() {
        let raw = "9".repeat(400);
        assert_eq!(
            validate_length(&raw),
            Err(OptionError::InvalidLength { value: raw.clone() })
        );
        assert!(validate_length(&format!("{raw}px")).is_err());
    }

    #[test]
    fn test_signed_values() {
        assert_eq!(validate_length("-4px").unwrap().value(), -4.0);
        assert_eq!(validate_length("+4").unwrap().to_string(), "+4");
    }

    #[test]
    fn test_numeric_portion_round_trips() {
        let length = validate_length("0.250in").unwrap();
        assert_eq!(length.to_string(), "0.250in");
        assert_eq!(length.value(), 0.25);
    }

    #[test]
    fn test_idempotent() {
        let once = validate_length("3 pc").unwrap().to_string();
        let twice = validate_length(&once).unwrap().to_string();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_lengths() {
        for raw in [
            "",
            "px",
            "abc",
            "1.2.3",
            ".",
            "1.",
            ".5",
            "1.px",
            "-.5em",
            "10 parsecs",
            "10px 20px",
        ] {
            assert_eq!(
                validate_length(raw),
                Err(OptionError::InvalidLength {
                    value: raw.to_owned()
                }),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_percentage_rejected_when_unitless_required() {
        assert!(validate_length_or_unitless("50%").is_err());
        assert!(validate_length_or_unitless("50px").is_ok());
    }

    #[test]
    fn test_size_is_unsigned() {
        for raw in ["-200", "-1px", "+5", "-0"] {
            assert_eq!(
                validate_size(raw, true),
                Err(OptionError::InvalidLength {
                    value: raw.to_owned()
                }),
                "{raw:?} should be rejected"
            );
        }
        assert_eq!(validate_size("0", false).unwrap().to_css(), "0px");
        assert_eq!(validate_size("12.5em", false).unwrap().to_string(), "12.5em");
        assert!(validate_size("50%", false).is_err());
    }

    #[test]
    fn test_scaled_keeps_unit() {
        let length = validate_length("200").unwrap().scaled(50.0).unwrap();
        assert_eq!(length.to_string(), "100");
        assert_eq!(length.to_css(), "100px");

        let length = validate_length("3em").unwrap().scaled(150.0).unwrap();
        assert_eq!(length.to_string(), "4.5em");

        let length = validate_length("50%").unwrap().scaled(50.0).unwrap();
        assert_eq!(length.to_string(), "25%");
    }

    #[test]
    fn test_scaled_rounds_float_noise() {
        let length = validate_length("7").unwrap().scaled(10.0).unwrap();
        assert_eq!(length.to_css(), "0.7px");
        assert_eq!(length.value(), 0.7);

        let length = validate_length("1").unwrap().scaled(100.0 / 3.0).unwrap();
        assert_eq!(length.to_string(), "0.333333");
    }

    #[test]
    fn test_scaled_overflow() {
        let length = validate_length(&format!("1{}", "0".repeat(300))).unwrap();
        assert_eq!(length.scaled(1e300), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.000_000_1), "0");
    }

    #[test]
    fn test_pixels() {
        assert_eq!(Length::pixels(640).to_css(), "640px");
    }

    #[test]
    fn test_list_whitespace_separated() {
        let list = validate_length_list("1 2 3", 4, " ").unwrap();
        assert_eq!(list.parts().len(), 3);
        assert_eq!(list.to_css(), "1px 2px 3px");
    }

    #[test]
    fn test_list_comma_separated() {
        let list = validate_length_list("10px, 20%", 2, ", ").unwrap();
        assert_eq!(list.to_string(), "10px, 20%");
        assert_eq!(list.to_css(), "10px, 20%");
    }

    #[test]
    fn test_list_comma_wins_over_whitespace() {
        // "1 2" is one comma-separated part, and not a valid length
        assert!(validate_length_list("1 2, 3", 4, " ").is_err());
    }

    #[test]
    fn test_list_too_many_components() {
        assert_eq!(
            validate_length_list("1 2 3 4 5", 4, " "),
            Err(OptionError::InvalidLengthList {
                value: "1 2 3 4 5".to_owned(),
                count: 5,
                max: 4,
            })
        );
    }

    #[test]
    fn test_list_invalid_component() {
        assert_eq!(
            validate_length_list("1px x", 4, " "),
            Err(OptionError::InvalidLength {
                value: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_list_empty() {
        assert!(validate_length_list("   ", 4, " ").is_err());
        assert!(validate_length_list("1,,2", 4, " ").is_err());
    }

    #[test]
    fn test_list_idempotent() {
        let once = validate_length_list("1,2em", 2, ", ").unwrap().to_string();
        let twice = validate_length_list(&once, 2, ", ").unwrap().to_string();
        assert_eq!(once, "1, 2em");
        assert_eq!(once, twice);
    }
}
