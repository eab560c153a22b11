//! Environment variable expansion for path-like settings.
//!
//! Only the braced forms are recognized:
//! - `${VAR}` - value of VAR, error when unset
//! - `${VAR:-default}` - value of VAR, or `default` when unset

use std::convert::Infallible;

use crate::ConfigError;

/// Expand `${...}` references in `value`.
///
/// `field` names the setting (e.g. `images.source_dir`) for error messages.
/// Strings without `${` are returned as-is; bare `$VAR` is left alone.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    if let Some(name) = required_vars(value).find(|name| std::env::var(name).is_err()) {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{name}}} not set"),
        });
    }

    let expanded = shellexpand::env_with_context(value, |var| -> Result<Option<String>, Infallible> {
        Ok(std::env::var(var).ok())
    })
    .unwrap_or_else(|e| match e.cause {});

    Ok(expanded.into_owned())
}

/// Names referenced as `${VAR}` without a `:-` default.
fn required_vars(value: &str) -> impl Iterator<Item = &str> {
    value.split("${").skip(1).filter_map(|chunk| {
        let inner = &chunk[..chunk.find('}')?];
        (!inner.contains(":-")).then_some(inner)
    })
}
