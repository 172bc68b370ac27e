use std::path::PathBuf;

use zeroize::Zeroizing;

use crate::domain::errors::ConfigError;

/// Environment variable holding the Binance API key
pub const API_KEY_VAR: &str = "BINANCE_APIKEY";
/// Misspelled name used by older `.env` files, still honoured
pub const LEGACY_API_KEY_VAR: &str = "BINANACE_APIKEY";
/// Optional override of the output spreadsheet path
pub const OUTPUT_PATH_VAR: &str = "EXCHANGES_OUTPUT_PATH";

pub const DEFAULT_OUTPUT_PATH: &str = "exchanges.xlsx";

/// Run configuration, built once at startup and passed down explicitly
#[derive(Clone)]
pub struct ExportConfig {
    /// Sent as `X-MBX-APIKEY` on every request
    pub api_key: Zeroizing<String>,
    pub output_path: PathBuf,
}

impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("api_key", &"<redacted>")
            .field("output_path", &self.output_path)
            .finish()
    }
}

impl ExportConfig {
    pub fn new(api_key: &str, output_path: impl Into<PathBuf>) -> Self {
        Self {
            api_key: Zeroizing::new(api_key.to_string()),
            output_path: output_path.into(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<ExportConfig, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup, then validate it
    pub fn from_lookup<F>(lookup: F) -> Result<ExportConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = match lookup(API_KEY_VAR) {
            Some(key) => key,
            None => match lookup(LEGACY_API_KEY_VAR) {
                Some(key) => {
                    tracing::warn!(
                        "{} is deprecated, rename it to {}",
                        LEGACY_API_KEY_VAR,
                        API_KEY_VAR
                    );
                    key
                }
                None => String::new(),
            },
        };

        let output_path = lookup(OUTPUT_PATH_VAR)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());

        let config = ExportConfig {
            api_key: Zeroizing::new(api_key.trim().to_string()),
            output_path: PathBuf::from(output_path),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject a run that would only fail later with a remote 401
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey(API_KEY_VAR));
        }
        Ok(())
    }
}
