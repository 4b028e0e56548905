//! `${VAR}` and `${VAR:-default}` references in path settings.

use crate::ConfigError;

/// Name of a referenced variable that has no value and no default.
struct Unset(String);

/// Expand references against the process environment.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).ok())
}

/// Expand references, resolving names through `lookup`.
///
/// Only the braced form is recognized; `docs/$draft` stays as written.
fn expand_with(
    value: &str,
    field: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context(value, |name| {
        lookup(name).map(Some).ok_or_else(|| Unset(name.to_owned()))
    })
    .map_err(|e| ConfigError::MissingEnvVar {
        field: field.to_owned(),
        var: e.cause.0,
    })?;
    Ok(expanded.into_owned())
}
