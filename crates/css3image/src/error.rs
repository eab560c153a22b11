//! Error types for option validation and directive processing.

/// Why a single option value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("\"{value}\" is not a valid length")]
    InvalidLength { value: String },
    #[error("\"{value}\" has {count} components, at most {max} allowed")]
    InvalidLengthList {
        value: String,
        count: usize,
        max: usize,
    },
    #[error("\"{value}\" is not a valid angle in degrees")]
    InvalidDegree { value: String },
    #[error(
        "\"{value}\" is not a valid value for the \"align\" option{}.  Valid values for \"align\" are: {}",
        context_note(.in_substitution),
        quote_list(.allowed)
    )]
    InvalidAlignment {
        value: String,
        /// Legal values for the active context, in definition order.
        allowed: Vec<&'static str>,
        in_substitution: bool,
    },
    #[error("\"{value}\" is not a valid percentage")]
    InvalidPercentage { value: String },
    #[error("\"{value}\" is not a valid class name")]
    InvalidClass { value: String },
    #[error("malformed target \"{target}\": {message}")]
    MalformedTarget { target: String, message: String },
    #[error("option value required")]
    MissingValue,
    #[error("unknown option")]
    UnknownOption,
    #[error("duplicate option")]
    DuplicateOption,
    #[error("image URI required")]
    MissingUri,
}

/// Option error attributed to a directive invocation.
///
/// Carries everything the host needs to report the problem at the
/// markup location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: error in \"{directive}\" directive, option \"{option}\": {kind}")]
pub struct DirectiveError {
    /// Name the directive was invoked under.
    pub directive: String,
    /// Offending option name (`uri` for the directive argument).
    pub option: String,
    /// Line number supplied by the host (1-indexed).
    pub line: usize,
    pub kind: OptionError,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn context_note(in_substitution: &bool) -> &'static str {
    if *in_substitution {
        " within a substitution definition"
    } else {
        ""
    }
}

fn quote_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
