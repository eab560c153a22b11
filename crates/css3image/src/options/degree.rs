//! Angle options.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::OptionError;

static DEGREE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]?)([0-9]+(?:\.[0-9]+)?) *(deg)?$").unwrap());

/// A validated angle, always rendered with the `deg` suffix.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Degree {
    sign: String,
    number: String,
    value: f64,
}

impl Degree {
    /// Signed angle in degrees.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}deg", self.sign, self.number)
    }
}

/// Validate an angle given in degrees, with or without the `deg` unit.
///
/// # Example
///
/// ```
/// use css3image::options::validate_degree;
///
/// assert_eq!(validate_degree("45").unwrap().to_string(), "45deg");
/// assert_eq!(validate_degree("-12.5 deg").unwrap().to_string(), "-12.5deg");
/// assert!(validate_degree("quarter").is_err());
/// ```
pub fn validate_degree(raw: &str) -> Result<Degree, OptionError> {
    let invalid = || OptionError::InvalidDegree {
        value: raw.to_owned(),
    };

    let caps = DEGREE_RE.captures(raw.trim()).ok_or_else(invalid)?;
    let number = &caps[2];
    let magnitude: f64 = number.parse().map_err(|_| invalid())?;
    if !magnitude.is_finite() {
        return Err(invalid());
    }
    let sign = &caps[1];
    let value = if sign == "-" { -magnitude } else { magnitude };

    Ok(Degree {
        sign: sign.to_owned(),
        number: number.to_owned(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_suffix_appended() {
        assert_eq!(validate_degree("45").unwrap().to_string(), "45deg");
    }

    #[test]
    fn test_suffix_kept() {
        assert_eq!(validate_degree("90deg").unwrap().to_string(), "90deg");
    }

    #[test]
    fn test_space_before_suffix_removed() {
        assert_eq!(validate_degree("30   deg").unwrap().to_string(), "30deg");
    }

    #[test]
    fn test_sign_preserved() {
        let degree = validate_degree("-7.5").unwrap();
        assert_eq!(degree.to_string(), "-7.5deg");
        assert_eq!(degree.value(), -7.5);
        assert_eq!(validate_degree("+3").unwrap().to_string(), "+3deg");
    }

    #[test]
    fn test_numeric_prefix_parses_as_input() {
        for raw in ["0", "12.25", "-180", "360 deg", "0.5deg"] {
            let out = validate_degree(raw).unwrap().to_string();
            assert!(out.ends_with("deg"));
            let prefix: f64 = out.trim_end_matches("deg").parse().unwrap();
            let input: f64 = raw.trim_end_matches("deg").trim().parse().unwrap();
            assert_eq!(prefix, input);
        }
    }

    #[test]
    fn test_idempotent() {
        let once = validate_degree("-15 deg").unwrap().to_string();
        assert_eq!(validate_degree(&once).unwrap().to_string(), once);
    }

    #[test]
    fn test_invalid() {
        let huge = "9".repeat(400);
        for raw in [
            "",
            "deg",
            "abc",
            "1.2.3",
            "45rad",
            "45 degrees",
            "--4",
            ".",
            "1.",
            "1.deg",
            ".5deg",
            "-.5",
            huge.as_str(),
        ] {
            assert_eq!(
                validate_degree(raw),
                Err(OptionError::InvalidDegree {
                    value: raw.to_owned()
                }),
                "{raw:?} should be rejected"
            );
        }
    }
}
