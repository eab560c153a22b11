//! Directive options: validators and the table of recognized options.
//!
//! Every recognized option has exactly one [`OptionKind`] (how the raw string
//! is validated) and one [`OptionRole`] (what the resolver does with it). The
//! order of an [`OptionTable`] is the order style declarations are emitted in,
//! which keeps rendering deterministic.
//!
//! Two tables ship:
//! - [`OptionTable::minimal`]: size, scale, align, rotate, translation and the
//!   per-side margins
//! - [`OptionTable::extended`]: adds the margin shorthand, `border-radius`,
//!   `transform-origin`, `translate`, 3D rotations and axis scaling
//!
//! # Example
//!
//! ```
//! use css3image::options::{AlignContext, OptionTable};
//!
//! let raw = vec![
//!     ("width".to_owned(), "200".to_owned()),
//!     ("rotate".to_owned(), "45".to_owned()),
//! ];
//! let options = OptionTable::extended()
//!     .validate(&raw, AlignContext::Block)
//!     .unwrap();
//! assert_eq!(options.width().unwrap().to_string(), "200");
//! ```

mod align;
mod degree;
mod length;
mod percentage;

use std::sync::LazyLock;

use regex::Regex;

use css3image_config::Profile;

use crate::error::OptionError;

pub use align::{Align, AlignContext, validate_alignment};
pub use degree::{Degree, validate_degree};
pub use length::{
    Length, LengthList, Unit, validate_length, validate_length_list, validate_length_or_unitless,
    validate_size,
};
pub use percentage::{Percentage, validate_percentage};

static NON_ID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static NON_ID_AT_ENDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-0-9]+|-+$").unwrap());

/// How a raw option string is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Taken as-is.
    Text,
    /// Taken as-is, must not be empty.
    RequiredText,
    /// Unsigned width or height; `%` only when `percent` is set.
    Size { percent: bool },
    /// Signed length without `%`.
    LengthOrUnitless,
    /// Up to `max` lengths joined with `separator`.
    LengthList {
        max: usize,
        separator: &'static str,
    },
    Degree,
    Percentage,
    /// Horizontal or vertical alignment depending on context.
    Align,
    /// Whitespace-separated class names.
    Class,
}

/// What the resolver does with a validated option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRole {
    Alt,
    Width,
    Height,
    Scale,
    Align,
    /// Becomes the node id.
    Name,
    /// Wraps the image in a hyperlink.
    Target,
    Class,
    /// One `<property>: <value>;` declaration.
    Declaration(&'static str),
    /// One declaration per configured vendor prefix.
    PrefixedDeclaration(&'static str),
    /// One call of the given CSS function inside the combined `transform`.
    Transform(&'static str),
}

/// A recognized option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub role: OptionRole,
}

const fn spec(name: &'static str, kind: OptionKind, role: OptionRole) -> OptionSpec {
    OptionSpec { name, kind, role }
}

const MINIMAL_OPTIONS: &[OptionSpec] = &[
    spec("alt", OptionKind::Text, OptionRole::Alt),
    spec("height", OptionKind::Size { percent: false }, OptionRole::Height),
    spec("width", OptionKind::Size { percent: true }, OptionRole::Width),
    spec("scale", OptionKind::Percentage, OptionRole::Scale),
    spec("align", OptionKind::Align, OptionRole::Align),
    spec("name", OptionKind::Text, OptionRole::Name),
    spec("target", OptionKind::RequiredText, OptionRole::Target),
    spec("class", OptionKind::Class, OptionRole::Class),
    spec(
        "margin-left",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-left"),
    ),
    spec(
        "margin-right",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-right"),
    ),
    spec(
        "margin-bottom",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-bottom"),
    ),
    spec(
        "margin-top",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-top"),
    ),
    spec("rotate", OptionKind::Degree, OptionRole::Transform("rotate")),
    spec(
        "translationX",
        OptionKind::LengthOrUnitless,
        OptionRole::Transform("translateX"),
    ),
    spec(
        "translationY",
        OptionKind::LengthOrUnitless,
        OptionRole::Transform("translateY"),
    ),
];

const EXTENDED_OPTIONS: &[OptionSpec] = &[
    spec("alt", OptionKind::Text, OptionRole::Alt),
    spec("height", OptionKind::Size { percent: false }, OptionRole::Height),
    spec("width", OptionKind::Size { percent: true }, OptionRole::Width),
    spec("scale", OptionKind::Percentage, OptionRole::Scale),
    spec("align", OptionKind::Align, OptionRole::Align),
    spec("name", OptionKind::Text, OptionRole::Name),
    spec("target", OptionKind::RequiredText, OptionRole::Target),
    spec("class", OptionKind::Class, OptionRole::Class),
    spec(
        "margin",
        OptionKind::LengthList {
            max: 4,
            separator: " ",
        },
        OptionRole::Declaration("margin"),
    ),
    spec(
        "margin-top",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-top"),
    ),
    spec(
        "margin-right",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-right"),
    ),
    spec(
        "margin-bottom",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-bottom"),
    ),
    spec(
        "margin-left",
        OptionKind::LengthOrUnitless,
        OptionRole::Declaration("margin-left"),
    ),
    spec(
        "border-radius",
        OptionKind::LengthList {
            max: 4,
            separator: " ",
        },
        OptionRole::Declaration("border-radius"),
    ),
    spec(
        "transform-origin",
        OptionKind::LengthList {
            max: 3,
            separator: " ",
        },
        OptionRole::PrefixedDeclaration("transform-origin"),
    ),
    spec(
        "translate",
        OptionKind::LengthList {
            max: 2,
            separator: ", ",
        },
        OptionRole::Transform("translate"),
    ),
    spec(
        "translationX",
        OptionKind::LengthOrUnitless,
        OptionRole::Transform("translateX"),
    ),
    spec(
        "translationY",
        OptionKind::LengthOrUnitless,
        OptionRole::Transform("translateY"),
    ),
    spec("rotate", OptionKind::Degree, OptionRole::Transform("rotate")),
    spec("rotateX", OptionKind::Degree, OptionRole::Transform("rotateX")),
    spec("rotateY", OptionKind::Degree, OptionRole::Transform("rotateY")),
    spec("rotateZ", OptionKind::Degree, OptionRole::Transform("rotateZ")),
    spec("scaleX", OptionKind::Percentage, OptionRole::Transform("scaleX")),
    spec("scaleY", OptionKind::Percentage, OptionRole::Transform("scaleY")),
];

/// Ordered set of recognized options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionTable {
    specs: &'static [OptionSpec],
}

impl Default for OptionTable {
    fn default() -> Self {
        Self::extended()
    }
}

impl OptionTable {
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            specs: MINIMAL_OPTIONS,
        }
    }

    #[must_use]
    pub fn extended() -> Self {
        Self {
            specs: EXTENDED_OPTIONS,
        }
    }

    #[must_use]
    pub fn from_profile(profile: Profile) -> Self {
        match profile {
            Profile::Minimal => Self::minimal(),
            Profile::Extended => Self::extended(),
        }
    }

    #[must_use]
    pub fn specs(&self) -> &'static [OptionSpec] {
        self.specs
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }

    /// Validate raw `(name, value)` pairs.
    ///
    /// Pairs are checked in the order given and the first failure is returned,
    /// so the same input always reports the same error.
    pub fn validate(
        &self,
        raw: &[(String, String)],
        context: AlignContext,
    ) -> Result<ImageOptions, RejectedOption> {
        let mut values: Vec<Option<OptionValue>> = vec![None; self.specs.len()];

        for (name, value) in raw {
            let reject = |error| RejectedOption {
                name: name.clone(),
                error,
            };
            let idx = self
                .position(name)
                .ok_or_else(|| reject(OptionError::UnknownOption))?;
            if values[idx].is_some() {
                return Err(reject(OptionError::DuplicateOption));
            }
            let parsed = validate_value(self.specs[idx].kind, value, context).map_err(reject)?;
            values[idx] = Some(parsed);
        }

        Ok(ImageOptions {
            table: *self,
            values,
        })
    }
}

/// An option the table refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOption {
    pub name: String,
    pub error: OptionError,
}

fn validate_value(
    kind: OptionKind,
    raw: &str,
    context: AlignContext,
) -> Result<OptionValue, OptionError> {
    Ok(match kind {
        OptionKind::Text => OptionValue::Text(raw.to_owned()),
        OptionKind::RequiredText => {
            if raw.trim().is_empty() {
                return Err(OptionError::MissingValue);
            }
            OptionValue::Text(raw.to_owned())
        }
        OptionKind::Size { percent } => OptionValue::Length(validate_size(raw, percent)?),
        OptionKind::LengthOrUnitless => OptionValue::Length(validate_length_or_unitless(raw)?),
        OptionKind::LengthList { max, separator } => {
            OptionValue::LengthList(validate_length_list(raw, max, separator)?)
        }
        OptionKind::Degree => OptionValue::Degree(validate_degree(raw)?),
        OptionKind::Percentage => OptionValue::Percentage(validate_percentage(raw)?),
        OptionKind::Align => OptionValue::Align(validate_alignment(raw, context)?),
        OptionKind::Class => OptionValue::Classes(validate_classes(raw)?),
    })
}

/// A validated option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Length(Length),
    LengthList(LengthList),
    Degree(Degree),
    Percentage(Percentage),
    Align(Align),
    Classes(Vec<String>),
}

impl OptionValue {
    /// Value as it appears in a style declaration or transform function.
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self {
            Self::Length(length) => Some(length.to_css()),
            Self::LengthList(list) => Some(list.to_css()),
            Self::Degree(degree) => Some(degree.to_string()),
            Self::Percentage(percentage) => Some(percentage.factor_css()),
            Self::Text(_) | Self::Align(_) | Self::Classes(_) => None,
        }
    }
}

/// Validated options of one directive invocation, indexed by table position.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    table: OptionTable,
    values: Vec<Option<OptionValue>>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        let table = OptionTable::default();
        Self {
            values: vec![None; table.specs.len()],
            table,
        }
    }
}

impl ImageOptions {
    /// Present options in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static OptionSpec, &OptionValue)> {
        self.table
            .specs
            .iter()
            .zip(&self.values)
            .filter_map(|(spec, value)| value.as_ref().map(|v| (spec, v)))
    }

    fn by_role(&self, role: OptionRole) -> Option<&OptionValue> {
        self.iter()
            .find(|(spec, _)| spec.role == role)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        let idx = self.table.position(name)?;
        self.values[idx].as_ref()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn alt(&self) -> Option<&str> {
        match self.by_role(OptionRole::Alt)? {
            OptionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn width(&self) -> Option<&Length> {
        match self.by_role(OptionRole::Width)? {
            OptionValue::Length(length) => Some(length),
            _ => None,
        }
    }

    #[must_use]
    pub fn height(&self) -> Option<&Length> {
        match self.by_role(OptionRole::Height)? {
            OptionValue::Length(length) => Some(length),
            _ => None,
        }
    }

    #[must_use]
    pub fn scale(&self) -> Option<&Percentage> {
        match self.by_role(OptionRole::Scale)? {
            OptionValue::Percentage(percentage) => Some(percentage),
            _ => None,
        }
    }

    #[must_use]
    pub fn align(&self) -> Option<Align> {
        match self.by_role(OptionRole::Align)? {
            OptionValue::Align(align) => Some(*align),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self.by_role(OptionRole::Name)? {
            OptionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self.by_role(OptionRole::Target)? {
            OptionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        match self.by_role(OptionRole::Class) {
            Some(OptionValue::Classes(classes)) => classes,
            _ => &[],
        }
    }
}

/// Normalize a name into an identifier usable as an HTML id or class.
///
/// Lowercases, collapses runs of characters outside `[a-z0-9]` into `-`, and
/// strips leading digits/hyphens and trailing hyphens.
///
/// ```
/// use css3image::options::make_id;
///
/// assert_eq!(make_id("Hero Image"), "hero-image");
/// assert_eq!(make_id("2nd_figure!"), "nd-figure");
/// ```
#[must_use]
pub fn make_id(name: &str) -> String {
    let lowered = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let dashed = NON_ID_CHARS_RE.replace_all(&lowered, "-");
    NON_ID_AT_ENDS_RE.replace_all(&dashed, "").into_owned()
}

/// Validate a whitespace-separated list of class names.
fn validate_classes(raw: &str) -> Result<Vec<String>, OptionError> {
    if raw.trim().is_empty() {
        return Err(OptionError::MissingValue);
    }
    raw.split_whitespace()
        .map(|name| {
            let id = make_id(name);
            if id.is_empty() {
                Err(OptionError::InvalidClass {
                    value: name.to_owned(),
                })
            } else {
                Ok(id)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_every_option_has_one_spec() {
        for table in [OptionTable::minimal(), OptionTable::extended()] {
            let mut names: Vec<_> = table.specs().iter().map(|s| s.name).collect();
            let total = names.len();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), total);
        }
    }

    #[test]
    fn test_extended_is_superset_of_minimal() {
        let extended = OptionTable::extended();
        for spec in OptionTable::minimal().specs() {
            let other = extended
                .specs()
                .iter()
                .find(|s| s.name == spec.name)
                .unwrap();
            assert_eq!(other.kind, spec.kind);
            assert_eq!(other.role, spec.role);
        }
    }

    #[test]
    fn test_margin_bottom_is_a_real_property() {
        for table in [OptionTable::minimal(), OptionTable::extended()] {
            let spec = table
                .specs()
                .iter()
                .find(|s| s.name == "margin-bottom")
                .unwrap();
            assert_eq!(spec.role, OptionRole::Declaration("margin-bottom"));
        }
    }

    #[test]
    fn test_from_profile() {
        assert_eq!(OptionTable::from_profile(Profile::Minimal), OptionTable::minimal());
        assert_eq!(
            OptionTable::from_profile(Profile::Extended),
            OptionTable::extended()
        );
    }

    #[test]
    fn test_validate_typed_accessors() {
        let options = OptionTable::extended()
            .validate(
                &raw(&[
                    ("alt", "A photo"),
                    ("width", "50%"),
                    ("height", "120"),
                    ("scale", "80"),
                    ("align", "center"),
                    ("class", "Hero wide"),
                ]),
                AlignContext::Block,
            )
            .unwrap();

        assert_eq!(options.alt(), Some("A photo"));
        assert_eq!(options.width().unwrap().to_string(), "50%");
        assert_eq!(options.height().unwrap().to_string(), "120");
        assert_eq!(options.scale().unwrap().value(), 80.0);
        assert_eq!(options.align(), Some(Align::Center));
        assert_eq!(options.classes(), ["hero", "wide"]);
        assert_eq!(options.target(), None);
    }

    #[test]
    fn test_iter_follows_table_order() {
        let options = OptionTable::extended()
            .validate(
                &raw(&[("rotate", "10"), ("margin", "1"), ("alt", "x")]),
                AlignContext::Block,
            )
            .unwrap();
        let names: Vec<_> = options.iter().map(|(spec, _)| spec.name).collect();
        assert_eq!(names, vec!["alt", "margin", "rotate"]);
    }

    #[test]
    fn test_unknown_option_rejected() {
        let err = OptionTable::minimal()
            .validate(&raw(&[("margin", "1 2")]), AlignContext::Block)
            .unwrap_err();
        assert_eq!(
            err,
            RejectedOption {
                name: "margin".to_owned(),
                error: OptionError::UnknownOption,
            }
        );
    }

    #[test]
    fn test_duplicate_option_rejected() {
        let err = OptionTable::extended()
            .validate(
                &raw(&[("width", "10"), ("width", "20")]),
                AlignContext::Block,
            )
            .unwrap_err();
        assert_eq!(err.error, OptionError::DuplicateOption);
    }

    #[test]
    fn test_first_failure_reported() {
        let err = OptionTable::extended()
            .validate(
                &raw(&[("rotate", "x"), ("width", "y")]),
                AlignContext::Block,
            )
            .unwrap_err();
        assert_eq!(err.name, "rotate");
    }

    #[test]
    fn test_align_uses_context() {
        let table = OptionTable::extended();
        let pairs = raw(&[("align", "middle")]);
        assert!(table.validate(&pairs, AlignContext::Block).is_err());
        assert!(table.validate(&pairs, AlignContext::Substitution).is_ok());
    }

    #[test]
    fn test_height_rejects_percentage() {
        let err = OptionTable::extended()
            .validate(&raw(&[("height", "50%")]), AlignContext::Block)
            .unwrap_err();
        assert!(matches!(err.error, OptionError::InvalidLength { .. }));
    }

    #[test]
    fn test_negative_size_rejected() {
        for name in ["width", "height"] {
            let err = OptionTable::minimal()
                .validate(&raw(&[(name, "-200")]), AlignContext::Block)
                .unwrap_err();
            assert_eq!(err.name, name);
            assert_eq!(
                err.error,
                OptionError::InvalidLength {
                    value: "-200".to_owned()
                }
            );
        }
    }

    #[test]
    fn test_margins_stay_signed() {
        let options = OptionTable::extended()
            .validate(
                &raw(&[("margin-left", "-4"), ("translationX", "-2em")]),
                AlignContext::Block,
            )
            .unwrap();
        assert_eq!(options.iter().count(), 2);
    }

    #[test]
    fn test_overflowing_scale_rejected() {
        let huge = "9".repeat(400);
        let err = OptionTable::extended()
            .validate(&raw(&[("scale", huge.as_str())]), AlignContext::Block)
            .unwrap_err();
        assert_eq!(err.name, "scale");
        assert!(matches!(err.error, OptionError::InvalidPercentage { .. }));
    }

    #[test]
    fn test_empty_target_rejected() {
        let err = OptionTable::extended()
            .validate(&raw(&[("target", "  ")]), AlignContext::Block)
            .unwrap_err();
        assert_eq!(err.error, OptionError::MissingValue);
    }

    #[test]
    fn test_margin_list_limit() {
        let err = OptionTable::extended()
            .validate(&raw(&[("margin", "1 2 3 4 5")]), AlignContext::Block)
            .unwrap_err();
        assert!(matches!(
            err.error,
            OptionError::InvalidLengthList { count: 5, max: 4, .. }
        ));
    }

    #[test]
    fn test_to_css() {
        let options = OptionTable::extended()
            .validate(
                &raw(&[
                    ("translate", "10, 5%"),
                    ("rotateX", "30"),
                    ("scaleY", "150"),
                ]),
                AlignContext::Block,
            )
            .unwrap();
        assert_eq!(
            options.get("translate").and_then(OptionValue::to_css),
            Some("10px, 5%".to_owned())
        );
        assert_eq!(
            options.get("rotateX").and_then(OptionValue::to_css),
            Some("30deg".to_owned())
        );
        assert_eq!(
            options.get("scaleY").and_then(OptionValue::to_css),
            Some("1.5".to_owned())
        );
    }

    #[test]
    fn test_make_id() {
        assert_eq!(make_id("Figure One"), "figure-one");
        assert_eq!(make_id("  spaced   out "), "spaced-out");
        assert_eq!(make_id("--x--"), "x");
        assert_eq!(make_id("42"), "");
    }

    #[test]
    fn test_invalid_class() {
        assert_eq!(
            validate_classes("ok 123"),
            Err(OptionError::InvalidClass {
                value: "123".to_owned()
            })
        );
        assert_eq!(validate_classes(""), Err(OptionError::MissingValue));
    }
}
