//! Configuration loading and validation for the fieldcrypt service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is invalid.

use anyhow::{Context, Result};
use fieldcrypt::KeySettings;
use serde::Deserialize;

/// Validated service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 64-hex-character master key. Required when `APP_ENV` or `NODE_ENV` is
    /// `production`.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Deployment mode label.
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// Deployment label used by older deployments; `production` here also
    /// makes a missing key fatal.
    #[serde(default)]
    pub node_env: Option<String>,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}
fn default_app_env() -> String {
    "development".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Key settings handed to the key provider.
    pub fn key_settings(&self) -> KeySettings {
        KeySettings {
            encryption_key: self.encryption_key.clone(),
            app_env: self.app_env.clone(),
            node_env: self.node_env.clone(),
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    ///
    /// Key format is checked by the key provider, not here.
    fn validate(&self) -> Result<()> {
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        if self.app_env.trim().is_empty() {
            anyhow::bail!("APP_ENV must not be empty");
        }
        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen_port", &self.listen_port)
            .field("log_level", &self.log_level)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "[REDACTED]"))
            .field("app_env", &self.app_env)
            .field("node_env", &self.node_env)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            listen_port: default_listen_port(),
            log_level: default_log_level(),
            encryption_key: None,
            app_env: default_app_env(),
            node_env: None,
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_listen_port(), 8080);
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_app_env(), "development");
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let cfg = Config {
            listen_port: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_app_env() {
        let cfg = Config {
            app_env: "  ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn key_settings_carry_key_and_mode() {
        let cfg = Config {
            encryption_key: Some("ab".repeat(32)),
            app_env: "production".into(),
            ..valid()
        };
        let settings = cfg.key_settings();
        assert_eq!(settings.encryption_key.as_deref(), Some("ab".repeat(32).as_str()));
        assert_eq!(settings.app_env, "production");
    }

    #[test]
    fn key_settings_carry_node_env() {
        let cfg = Config {
            node_env: Some("production".into()),
            ..valid()
        };
        let provider = fieldcrypt::KeyProvider::new(cfg.key_settings());
        assert!(provider.mode().is_production());
        assert!(matches!(
            provider.resolve(),
            Err(fieldcrypt::ConfigError::MissingInProduction)
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let cfg = Config {
            encryption_key: Some("cd".repeat(32)),
            ..valid()
        };
        assert!(!format!("{cfg:?}").contains(&"cd".repeat(32)));
    }
}
