//! Configuration management for demodoc.
//!
//! Parses `demodoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Path Expansion
//!
//! `docs.source_dir` and `docs.output_dir` support:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//! - a leading `~` for the home directory
//!
//! Relative paths are resolved against the directory of the config file.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub source_dir: Option<PathBuf>,
    /// Override HTML output directory.
    pub output_dir: Option<PathBuf>,
    /// Override heading anchors flag.
    pub anchors_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "demodoc.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation paths (relative strings from TOML).
    docs: DocsConfigRaw,
    /// Markdown rendering options.
    pub render: RenderConfig,
    /// Heading anchor options.
    pub anchors: AnchorsConfig,
    /// Demo widget markup.
    pub demo: DemoConfig,
    /// Plain class containers.
    pub containers: ContainersConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    output_dir: Option<String>,
}

/// Resolved documentation paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Directory scanned for markdown files.
    pub source_dir: PathBuf,
    /// Directory receiving rendered HTML.
    pub output_dir: PathBuf,
}

/// Markdown rendering options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Class added to markdown tables; empty for none.
    pub table_class: String,
    /// Render fences with `v-pre` so the page framework leaves them alone.
    pub raw_fences: bool,
    /// Mark fences for client-side syntax highlighting.
    pub highlight: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            table_class: "table".to_owned(),
            raw_fences: true,
            highlight: true,
        }
    }
}

/// Heading anchor options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnchorsConfig {
    pub enabled: bool,
    /// Minimum heading level that gets an anchor.
    pub level: u8,
    pub permalink: bool,
    pub permalink_before: bool,
    pub permalink_symbol: String,
}

impl Default for AnchorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: 2,
            permalink: true,
            permalink_before: true,
            permalink_symbol: "¶".to_owned(),
        }
    }
}

/// Demo widget markup.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Custom element name of the widget.
    pub element: String,
    /// Class attribute of the widget element.
    pub class: String,
    /// Attribute carrying the serialized payload.
    pub payload_attr: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            element: "demo-block".to_owned(),
            class: "demo-box".to_owned(),
            payload_attr: ":jsfiddle".to_owned(),
        }
    }
}

/// Plain class containers (`::: tip` renders `<div class="tip">`).
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContainersConfig {
    pub classes: Vec<String>,
}

impl Default for ContainersConfig {
    fn default() -> Self {
        Self {
            classes: vec!["tip".to_owned(), "warning".to_owned()],
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`docs.output_dir`").
        field: String,
        /// Error message (e.g., "${`SITE_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a markup name: ASCII letter first, then letters, digits, `-` or `_`.
fn require_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    let mut chars = value.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(ConfigError::Validation(format!(
            "{field} must start with a letter and contain only letters, digits, '-' or '_' (got {value:?})"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `demodoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.docs_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(enabled) = settings.anchors_enabled {
            self.anchors.enabled = enabled;
        }
    }

    /// Table class, or `None` when disabled with an empty string.
    #[must_use]
    pub fn table_class(&self) -> Option<&str> {
        Some(self.render.table_class.as_str()).filter(|class| !class.is_empty())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            render: RenderConfig::default(),
            anchors: AnchorsConfig::default(),
            demo: DemoConfig::default(),
            containers: ContainersConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                output_dir: base.join("dist"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand before path resolution
        config.expand_paths()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_anchors()?;
        self.validate_demo()?;
        self.validate_containers()?;
        Ok(())
    }

    fn validate_anchors(&self) -> Result<(), ConfigError> {
        if !(1..=6).contains(&self.anchors.level) {
            return Err(ConfigError::Validation(format!(
                "anchors.level must be between 1 and 6 (got {})",
                self.anchors.level
            )));
        }
        if self.anchors.permalink {
            require_non_empty(&self.anchors.permalink_symbol, "anchors.permalink_symbol")?;
        }
        Ok(())
    }

    fn validate_demo(&self) -> Result<(), ConfigError> {
        require_name(&self.demo.element, "demo.element")?;
        // Custom elements need a dash
        if !self.demo.element.contains('-') {
            return Err(ConfigError::Validation(format!(
                "demo.element must contain '-' to be a custom element (got {:?})",
                self.demo.element
            )));
        }
        require_non_empty(&self.demo.class, "demo.class")?;

        let attr = &self.demo.payload_attr;
        require_non_empty(attr, "demo.payload_attr")?;
        if attr
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '=' | '<' | '>' | '/'))
        {
            return Err(ConfigError::Validation(format!(
                "demo.payload_attr is not a valid attribute name (got {attr:?})"
            )));
        }
        Ok(())
    }

    fn validate_containers(&self) -> Result<(), ConfigError> {
        for (idx, class) in self.containers.classes.iter().enumerate() {
            require_name(class, "containers.classes")?;
            if class == "demo" {
                return Err(ConfigError::Validation(
                    "containers.classes cannot contain \"demo\"".to_owned(),
                ));
            }
            if self.containers.classes[..idx].contains(class) {
                return Err(ConfigError::Validation(format!(
                    "containers.classes lists {class:?} more than once"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variables and `~` in configured paths.
    fn expand_paths(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_path(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = self.docs.output_dir {
            self.docs.output_dir = Some(expand::expand_path(dir, "docs.output_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
            output_dir: resolve(self.docs.output_dir.as_deref(), "dist"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/test/dist"));
        assert!(config.render.gfm);
        assert_eq!(config.table_class(), Some("table"));
        assert!(config.render.raw_fences);
        assert!(config.render.highlight);
        assert!(config.anchors.enabled);
        assert_eq!(config.anchors.level, 2);
        assert_eq!(config.anchors.permalink_symbol, "¶");
        assert_eq!(config.demo.element, "demo-block");
        assert_eq!(config.demo.class, "demo-box");
        assert_eq!(config.demo.payload_attr, ":jsfiddle");
        assert_eq!(config.containers.classes, vec!["tip", "warning"]);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.anchors.enabled);
        assert_eq!(config.demo.element, "demo-block");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r##"
[docs]
source_dir = "documentation"
output_dir = "site"

[render]
gfm = false
table_class = ""
raw_fences = false
highlight = false

[anchors]
enabled = true
level = 3
permalink = false
permalink_before = false
permalink_symbol = "#"

[demo]
element = "live-demo"
class = "example"
payload_attr = "data-payload"

[containers]
classes = ["tip", "danger"]
"##;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/documentation")
        );
        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/project/site"));
        assert!(!config.render.gfm);
        assert_eq!(config.table_class(), None);
        assert!(!config.render.raw_fences);
        assert_eq!(config.anchors.level, 3);
        assert!(!config.anchors.permalink);
        assert_eq!(config.demo.element, "live-demo");
        assert_eq!(config.demo.payload_attr, "data-payload");
        assert_eq!(config.containers.classes, vec!["tip", "danger"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let toml = r#"
[anchors]
level = 1
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.anchors.level, 1);
        assert!(config.anchors.permalink);
        assert_eq!(config.anchors.permalink_symbol, "¶");
    }

    #[test]
    fn test_unknown_field_type_is_parse_error() {
        let result: Result<Config, _> = toml::from_str("[anchors]\nlevel = \"two\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/tmp/out")),
            anchors_enabled: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.docs_resolved.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert!(!config.anchors.enabled);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert!(config.anchors.enabled);
    }

    #[test]
    fn test_expand_paths() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DEMODOC_TEST_SITE", "public");
        }

        let toml = r#"
[docs]
output_dir = "${DEMODOC_TEST_SITE}/components"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_paths().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.output_dir,
            PathBuf::from("/project/public/components")
        );

        unsafe {
            std::env::remove_var("DEMODOC_TEST_SITE");
        }
    }

    #[test]
    fn test_expand_paths_missing_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DEMODOC_TEST_MISSING_SRC");
        }

        let toml = r#"
[docs]
source_dir = "${DEMODOC_TEST_MISSING_SRC}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_paths().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("docs.source_dir"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[docs]\nsource_dir = \"src/docs\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("src/docs"));
        assert_eq!(config.docs_resolved.output_dir, dir.path().join("dist"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_applies_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let settings = CliSettings {
            source_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[demo\nelement = ").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[anchors]\nlevel = 7\n").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_anchor_level() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.anchors.level = 0;
        assert_validation_error(&config, &["anchors.level", "between 1 and 6"]);
        config.anchors.level = 7;
        assert_validation_error(&config, &["anchors.level"]);
    }

    #[test]
    fn test_validate_permalink_symbol_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.anchors.permalink_symbol = String::new();
        assert_validation_error(&config, &["permalink_symbol", "empty"]);

        config.anchors.permalink = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_demo_element_needs_dash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.demo.element = "demo".to_owned();
        assert_validation_error(&config, &["demo.element", "'-'"]);
    }

    #[test]
    fn test_validate_demo_element_name() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.demo.element = "demo block".to_owned();
        assert_validation_error(&config, &["demo.element", "letter"]);
    }

    #[test]
    fn test_validate_payload_attr() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.demo.payload_attr = "data=x".to_owned();
        assert_validation_error(&config, &["demo.payload_attr"]);

        config.demo.payload_attr = "v-bind:demo".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_container_classes() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.containers.classes = vec!["tip".to_owned(), "demo".to_owned()];
        assert_validation_error(&config, &["demo"]);

        config.containers.classes = vec![String::new()];
        assert_validation_error(&config, &["containers.classes", "empty"]);

        config.containers.classes = vec!["tip".to_owned(), "tip".to_owned()];
        assert_validation_error(&config, &["more than once"]);

        config.containers.classes = vec!["1st".to_owned()];
        assert_validation_error(&config, &["containers.classes", "letter"]);
    }
}
