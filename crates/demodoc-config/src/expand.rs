//! Environment variable and home directory expansion for configuration paths.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand `${VAR}` references, then a leading `~`.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    let expanded = expand_env(value, field)?;
    Ok(shellexpand::tilde(&expanded).into_owned())
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DEMODOC_TEST_SIMPLE", "site");
        }
        let result = expand_env("${DEMODOC_TEST_SIMPLE}", "docs.output_dir").unwrap();
        assert_eq!(result, "site");
        unsafe {
            std::env::remove_var("DEMODOC_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DEMODOC_TEST_UNSET");
        }
        let result = expand_env("build/${DEMODOC_TEST_UNSET:-dist}", "docs.output_dir").unwrap();
        assert_eq!(result, "build/dist");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DEMODOC_TEST_MISSING");
        }
        let err = expand_env("${DEMODOC_TEST_MISSING}", "docs.source_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("DEMODOC_TEST_MISSING"));
        assert!(err.to_string().contains("docs.source_dir"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("$VAR/docs", "docs.source_dir").unwrap();
        assert_eq!(result, "$VAR/docs");
    }

    #[test]
    fn test_expand_path_tilde() {
        let result = expand_path("~/docs", "docs.source_dir").unwrap();
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("/docs"));
    }

    #[test]
    fn test_expand_path_relative_unchanged() {
        let result = expand_path("docs/components", "docs.source_dir").unwrap();
        assert_eq!(result, "docs/components");
    }
}
