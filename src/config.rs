//! Adapter options and the `dynbind.toml` configuration file.
//!
//! [`AdapterConfig`] is what the library needs; [`DynbindConfig`] is the file the CLI reads, which carries an
//! `[adapter]` table with the same fields plus a `[logging]` table:
//!
//! ```toml
//! [adapter]
//! name_matching = "ignore-case"   # or "exact" (default)
//! provisioning = "lenient"        # or "strict" (default)
//!
//! [logging]
//! level = "dynbind=debug,info"    # an EnvFilter directive; RUST_LOG still wins
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Adapter options
// ============================================================================

/// How method names in a call or a binding are matched against the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameMatching {
    #[default]
    Exact,
    /// ASCII case-insensitive, the way scripted objects were looked up by lowercased key.
    IgnoreCase,
}

impl NameMatching {
    pub fn matches(self, declared: &str, candidate: &str) -> bool {
        match self {
            NameMatching::Exact => declared == candidate,
            NameMatching::IgnoreCase => declared.eq_ignore_ascii_case(candidate),
        }
    }
}

/// What construction does about required methods the binding does not provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provisioning {
    /// Fail construction, naming every missing method.
    #[default]
    Strict,
    /// Construct anyway; calling a missing method fails with `UnboundMethod`.
    Lenient,
}

/// Options for [`crate::Adapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    pub name_matching: NameMatching,
    pub provisioning: Provisioning,
}

impl AdapterConfig {
    /// Create a config with default settings (exact names, strict provisioning).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how names are matched
    pub fn with_name_matching(mut self, matching: NameMatching) -> Self {
        self.name_matching = matching;
        self
    }

    /// Set what happens to missing methods
    pub fn with_provisioning(mut self, provisioning: Provisioning) -> Self {
        self.provisioning = provisioning;
        self
    }

    pub fn ignore_case(self) -> Self {
        self.with_name_matching(NameMatching::IgnoreCase)
    }

    pub fn lenient(self) -> Self {
        self.with_provisioning(Provisioning::Lenient)
    }
}

// ============================================================================
// Configuration file
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

/// Contents of a `dynbind.toml` file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DynbindConfig {
    pub adapter: AdapterConfig,
    pub logging: LoggingConfig,
}

impl DynbindConfig {
    /// Read, parse and validate a configuration file.
    ///
    /// ## Errors
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML for this schema, or fails validation.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), adapter = ?config.adapter, "loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                message: "must not be empty".into(),
            });
        }
        tracing_subscriber::EnvFilter::try_new(&self.logging.level).map_err(|e| ConfigError::Invalid {
            field: "logging.level",
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Adapter options
    // ========================================

    #[test]
    fn test_default_adapter_config() {
        let config = AdapterConfig::default();
        assert_eq!(config.name_matching, NameMatching::Exact);
        assert_eq!(config.provisioning, Provisioning::Strict);
        assert_eq!(AdapterConfig::new(), config);
    }

    #[test]
    fn test_builder_methods() {
        let config = AdapterConfig::new().ignore_case().lenient();
        assert_eq!(config.name_matching, NameMatching::IgnoreCase);
        assert_eq!(config.provisioning, Provisioning::Lenient);
    }

    #[test]
    fn test_name_matching() {
        assert!(NameMatching::Exact.matches("varArgs", "varArgs"));
        assert!(!NameMatching::Exact.matches("varArgs", "varargs"));
        assert!(NameMatching::IgnoreCase.matches("varArgs", "VARARGS"));
        assert!(!NameMatching::IgnoreCase.matches("varArgs", "varArg"));
    }

    // ========================================
    // File loading
    // ========================================

    #[test]
    fn test_empty_file_is_default() {
        let config = DynbindConfig::from_toml_str("").unwrap();
        assert_eq!(config, DynbindConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_full_file() {
        let config = DynbindConfig::from_toml_str(
            r#"
            [adapter]
            name_matching = "ignore-case"
            provisioning = "lenient"

            [logging]
            level = "dynbind=debug,warn"
            "#,
        )
        .unwrap();
        assert_eq!(config.adapter, AdapterConfig::new().ignore_case().lenient());
        assert_eq!(config.logging.level, "dynbind=debug,warn");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = DynbindConfig::from_toml_str("[adapter]\nstrictness = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let err = DynbindConfig::from_toml_str("[adapter]\nprovisioning = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err}");
    }

    #[test]
    fn test_empty_log_level_is_invalid() {
        let err = DynbindConfig::from_toml_str("[logging]\nlevel = \"  \"\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field: "logging.level", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = DynbindConfig::load("/definitely/not/here/dynbind.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile(_)));
    }
}
