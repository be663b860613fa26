//! Master key resolution and validation.
//!
//! # Lifecycle
//!
//! 1. [`KeySettings`] is read once from the environment (`ENCRYPTION_KEY`,
//!    `APP_ENV`, `NODE_ENV`) or built by the host application.
//! 2. [`KeyProvider::resolve`] validates the configured hex key, or falls back
//!    to a deterministic development key outside production.
//! 3. The resulting [`MasterKey`] is cached and handed out as an `Arc` for the
//!    rest of the process lifetime.
//!
//! # Security invariants
//!
//! - The key is never logged, included in errors, or serialised.
//! - A missing key in production is fatal; encryption is never silently
//!   disabled or weakened.

pub mod master;

pub use master::MasterKey;

use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::crypto::{kdf, EnvelopeCipher, KEY_LEN};
use crate::error::ConfigError;

/// Password and salt of the development fallback key. Not secret.
const DEV_KEY_PASSWORD: &[u8] = b"dev-encryption-key-not-for-production";
const DEV_KEY_SALT: &[u8] = b"salt";

/// Deployment mode, taken from `APP_ENV` and `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    /// A missing key is fatal.
    Production,
    /// Local development; the fallback key is permitted.
    Development,
    /// Test runs; the fallback key is permitted.
    Test,
}

impl DeploymentMode {
    /// Parse a deployment label. Anything other than `production` or `test`
    /// (case-insensitive) is treated as development.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "production" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Lowercase label as reported in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Test => "test",
        }
    }

    /// Returns `true` for [`DeploymentMode::Production`].
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw key configuration, as read from the environment.
#[derive(Clone, Deserialize)]
pub struct KeySettings {
    /// 64 hex characters encoding the 256-bit master key.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Deployment mode label.
    #[serde(default = "default_app_env")]
    pub app_env: String,

    /// Deployment label used by older deployments. `production` here is
    /// production regardless of `app_env`.
    #[serde(default)]
    pub node_env: Option<String>,
}

fn default_app_env() -> String {
    "development".into()
}

impl KeySettings {
    /// Read `ENCRYPTION_KEY`, `APP_ENV` and `NODE_ENV` from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Source`] if the environment cannot be read or
    /// deserialised.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// The configured key, treating an empty value as absent.
    fn configured_key(&self) -> Option<&str> {
        self.encryption_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for KeySettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySettings")
            .field(
                "encryption_key",
                &self.configured_key().map(|_| "[REDACTED]"),
            )
            .field("app_env", &self.app_env)
            .field("node_env", &self.node_env)
            .finish()
    }
}

/// Resolves the master key once and hands out shared references to it.
#[derive(Debug)]
pub struct KeyProvider {
    settings: KeySettings,
    resolved: OnceLock<Arc<MasterKey>>,
}

impl KeyProvider {
    /// Create a provider over explicit settings.
    pub fn new(settings: KeySettings) -> Self {
        Self {
            settings,
            resolved: OnceLock::new(),
        }
    }

    /// Create a provider over settings read from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Source`] if the environment cannot be read.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(KeySettings::from_env()?))
    }

    /// Deployment mode derived from the settings.
    ///
    /// Production in either `app_env` or `node_env` wins, so a missing key
    /// fails closed whichever variable the deployment sets.
    pub fn mode(&self) -> DeploymentMode {
        let node_mode = self.settings.node_env.as_deref().map(DeploymentMode::from_label);
        if node_mode.is_some_and(DeploymentMode::is_production) {
            return DeploymentMode::Production;
        }
        DeploymentMode::from_label(&self.settings.app_env)
    }

    /// `true` if a non-empty key value was supplied.
    pub fn key_configured(&self) -> bool {
        self.settings.configured_key().is_some()
    }

    /// Resolve the master key, caching it on first success.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingInProduction`] if no key is configured in
    /// production, [`ConfigError::InvalidFormat`] if the configured key is not
    /// 64 hex characters, and [`ConfigError::Derivation`] if the development
    /// key cannot be derived.
    pub fn resolve(&self) -> Result<Arc<MasterKey>, ConfigError> {
        if let Some(key) = self.resolved.get() {
            return Ok(Arc::clone(key));
        }
        let key = Arc::new(self.load()?);
        Ok(Arc::clone(self.resolved.get_or_init(|| key)))
    }

    /// Resolve the key and build an [`EnvelopeCipher`] over it.
    ///
    /// # Errors
    ///
    /// Same as [`KeyProvider::resolve`].
    pub fn cipher(&self) -> Result<EnvelopeCipher, ConfigError> {
        Ok(EnvelopeCipher::new(self.resolve()?))
    }

    fn load(&self) -> Result<MasterKey, ConfigError> {
        if let Some(hex_key) = self.settings.configured_key() {
            let key = parse_hex_key(hex_key)?;
            info!(mode = %self.mode(), "master encryption key loaded");
            return Ok(key);
        }

        let mode = self.mode();
        if mode.is_production() {
            return Err(ConfigError::MissingInProduction);
        }

        warn!(
            mode = %mode,
            "ENCRYPTION_KEY not set; using temporary development key (not for production)"
        );
        development_key()
    }
}

/// Validate and decode a 64-character hex key.
fn parse_hex_key(hex_key: &str) -> Result<MasterKey, ConfigError> {
    if hex_key.len() != KEY_LEN * 2 || !hex_key.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidFormat);
    }
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    hex::decode_to_slice(hex_key, &mut bytes[..]).map_err(|_| ConfigError::InvalidFormat)?;
    Ok(MasterKey::configured(bytes))
}

fn development_key() -> Result<MasterKey, ConfigError> {
    let bytes = kdf::derive_key(DEV_KEY_PASSWORD, DEV_KEY_SALT).map_err(|_| ConfigError::Derivation)?;
    Ok(MasterKey::development(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn settings(key: Option<&str>, env: &str) -> KeySettings {
        KeySettings {
            encryption_key: key.map(str::to_owned),
            app_env: env.into(),
            node_env: None,
        }
    }

    #[test]
    fn accepts_lowercase_hex() {
        let provider = KeyProvider::new(settings(Some(HEX_KEY), "production"));
        let key = provider.resolve().unwrap();
        assert_eq!(key.len(), KEY_LEN);
        assert!(!key.is_development());
        assert_eq!(key.expose()[1], 0x01);
        assert_eq!(key.expose()[31], 0x1f);
    }

    #[test]
    fn accepts_uppercase_hex() {
        let upper = HEX_KEY.to_ascii_uppercase();
        let provider = KeyProvider::new(settings(Some(&upper), "production"));
        let key = provider.resolve().unwrap();
        assert_eq!(key.expose()[31], 0x1f);
    }

    #[test]
    fn rejects_short_key() {
        let provider = KeyProvider::new(settings(Some(&HEX_KEY[..62]), "development"));
        assert!(matches!(provider.resolve(), Err(ConfigError::InvalidFormat)));
    }

    #[test]
    fn rejects_non_hex_key() {
        let bad = format!("{}zz", &HEX_KEY[..62]);
        let provider = KeyProvider::new(settings(Some(&bad), "development"));
        assert!(matches!(provider.resolve(), Err(ConfigError::InvalidFormat)));
    }

    #[test]
    fn missing_key_is_fatal_in_production() {
        let provider = KeyProvider::new(settings(None, "production"));
        assert!(matches!(
            provider.resolve(),
            Err(ConfigError::MissingInProduction)
        ));
    }

    #[test]
    fn node_env_production_without_key_is_fatal() {
        let provider = KeyProvider::new(KeySettings {
            node_env: Some("production".into()),
            ..settings(None, "development")
        });
        assert_eq!(provider.mode(), DeploymentMode::Production);
        assert!(matches!(
            provider.resolve(),
            Err(ConfigError::MissingInProduction)
        ));
    }

    #[test]
    fn node_env_non_production_defers_to_app_env() {
        let provider = KeyProvider::new(KeySettings {
            node_env: Some("development".into()),
            ..settings(None, "production")
        });
        assert_eq!(provider.mode(), DeploymentMode::Production);

        let provider = KeyProvider::new(KeySettings {
            node_env: Some("test".into()),
            ..settings(None, "development")
        });
        assert_eq!(provider.mode(), DeploymentMode::Development);
        assert!(provider.resolve().unwrap().is_development());
    }

    #[test]
    fn empty_key_counts_as_missing() {
        let provider = KeyProvider::new(settings(Some(""), "Production"));
        assert!(!provider.key_configured());
        assert!(matches!(
            provider.resolve(),
            Err(ConfigError::MissingInProduction)
        ));
    }

    #[test]
    fn missing_key_falls_back_outside_production() {
        let provider = KeyProvider::new(settings(None, "development"));
        let key = provider.resolve().unwrap();
        assert!(key.is_development());
        assert!(!provider.key_configured());
    }

    #[test]
    fn development_key_is_deterministic() {
        let a = KeyProvider::new(settings(None, "development")).resolve().unwrap();
        let b = KeyProvider::new(settings(None, "test")).resolve().unwrap();
        assert_eq!(a.expose(), b.expose());
    }

    #[test]
    fn development_key_matches_known_bytes() {
        let key = development_key().unwrap();
        assert_eq!(
            hex::encode(key.expose()),
            "f2a5c7d50d4aa39f13bb8d50f8473b64d8f6595c61f15e686532bfc6e24afd70"
        );
    }

    #[test]
    fn resolve_returns_same_instance() {
        let provider = KeyProvider::new(settings(Some(HEX_KEY), "production"));
        let a = provider.resolve().unwrap();
        let b = provider.resolve().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn mode_labels() {
        assert_eq!(DeploymentMode::from_label("PRODUCTION"), DeploymentMode::Production);
        assert_eq!(DeploymentMode::from_label("test"), DeploymentMode::Test);
        assert_eq!(DeploymentMode::from_label("staging"), DeploymentMode::Development);
        assert_eq!(DeploymentMode::Production.to_string(), "production");
        assert_eq!(default_app_env(), "development");
    }

    #[test]
    fn settings_debug_hides_key() {
        let s = settings(Some(HEX_KEY), "production");
        let out = format!("{s:?}");
        assert!(!out.contains(HEX_KEY));
        assert!(out.contains("REDACTED"));
    }
}
