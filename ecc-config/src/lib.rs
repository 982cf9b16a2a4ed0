//! Configuration management for the libecc tools
//!
//! Values come from built-in defaults, then an optional `.env` file and
//! `ECC_*` environment variables (or TOML text when embedding).

use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use config::builder::DefaultState;
use serde::Deserialize;

pub const DEFAULT_KEY_BITS: u32 = 256;
pub const DEFAULT_DEMO_PASSPHRASE: &str = "abc";
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub use ecc_logging::LogFormat;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Key strength used by the driver
    pub key_bits: u32,
    /// Passphrase the driver encrypts its private key PEM with
    pub demo_passphrase: String,
    /// PBKDF2 work factor for encrypted private keys
    pub pbkdf2_iterations: u32,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Self::build(
            Self::defaults()?.add_source(Environment::with_prefix("ECC").try_parsing(true)),
        )
    }

    /// Load configuration from TOML text layered over the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::build(Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("key_bits", DEFAULT_KEY_BITS)?
            .set_default("demo_passphrase", DEFAULT_DEMO_PASSPHRASE)?
            .set_default("pbkdf2_iterations", DEFAULT_PBKDF2_ITERATIONS)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .set_default("log_format", "console")
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pbkdf2_iterations == 0 {
            return Err(ConfigError::Message(
                "pbkdf2_iterations must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Get log level, defaulting to "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
