//! Application settings configuration
//!
//! Defines inspection, probe and server settings.

use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Certificate inspection settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspectionSettings {
    /// Path or name of the OpenSSL binary
    pub openssl_path: String,
    /// Outer process-kill timeout for a single handshake
    pub handshake_timeout_secs: u64,
    /// Command-level `timeout` wrapper bound; 0 runs OpenSSL directly
    pub wrapper_timeout_secs: u64,
    /// Program used as the command-level wrapper
    pub timeout_program: String,
    /// Number of concurrent handshakes in a batch
    pub parallel: usize,
    /// Overall budget for a batch run; 0 disables the deadline
    pub batch_timeout_secs: u64,
    /// Certificates expiring within this many days are reported as warnings
    pub expiry_warning_days: i64,
}

impl Default for InspectionSettings {
    fn default() -> Self {
        Self {
            openssl_path: "openssl".to_string(),
            handshake_timeout_secs: 10,
            wrapper_timeout_secs: 15,
            timeout_program: "timeout".to_string(),
            parallel: 4,
            batch_timeout_secs: 30,
            expiry_warning_days: 30,
        }
    }
}

impl InspectionSettings {
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn wrapper_timeout(&self) -> Option<Duration> {
        (self.wrapper_timeout_secs > 0).then(|| Duration::from_secs(self.wrapper_timeout_secs))
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        (self.batch_timeout_secs > 0).then(|| Duration::from_secs(self.batch_timeout_secs))
    }
}

/// HTTP liveness probe settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Cert-Health-Checker/1.0".to_string(),
        }
    }
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// API server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    /// Exact origins allowed by CORS
    pub allowed_origins: Vec<String>,
    /// HTTPS origins whose host ends with one of these suffixes are allowed
    pub allowed_origin_suffixes: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:5174".to_string(),
                "http://localhost:3000".to_string(),
            ],
            allowed_origin_suffixes: vec![
                ".app.github.dev".to_string(),
                ".githubpreview.dev".to_string(),
            ],
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub inspection: InspectionSettings,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.inspection.parallel == 0 {
            return Err(ConfigError::InvalidValue {
                key: "inspection.parallel".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.inspection.handshake_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "inspection.handshake_timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
