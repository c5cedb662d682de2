//! Configuration management for the notifier
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer defaults, a `notifier.toml` file,
//! `NOTIFIER_`-prefixed environment variables and command-line overrides.

use crate::cli::Cli;
use crate::content::{is_valid_timestamp_format, DEFAULT_SIGNATURE, DEFAULT_TIMESTAMP_FORMAT};
use crate::error::NotifierError;
use crate::notification::LogFormat;
use crate::observable::ObserverFailurePolicy;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// The file read when no `--config` is given. Missing is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "notifier.toml";

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Which observers to subscribe and how they behave.
    pub observers: ObserverConfig,
    /// Which delivery channels to register on the engine.
    pub delivery: DeliveryConfig,
    /// Settings for the content decorators.
    pub decoration: DecorationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ObserverConfig {
    /// Subscribe the logger ahead of the notification engine.
    pub logger: bool,
    pub failure_policy: ObserverFailurePolicy,
    pub log_format: LogFormat,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DeliveryConfig {
    /// Per-strategy timeout in milliseconds. `0` disables the timeout.
    pub timeout_ms: u64,
    /// Register the pop-up channel.
    pub popup: bool,
    pub email: Option<EmailConfig>,
    pub sms: Option<SmsConfig>,
}

impl DeliveryConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EmailConfig {
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SmsConfig {
    pub number: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DecorationConfig {
    pub signature: String,
    /// A chrono `strftime` layout.
    pub timestamp_format: String,
}

impl Config {
    /// Loads the configuration by layering defaults, the TOML file, the
    /// environment (e.g. `NOTIFIER_DELIVERY__TIMEOUT_MS=100`) and `cli`.
    pub fn load(cli: &Cli) -> Result<Self, NotifierError> {
        let path = match &cli.config {
            Some(path) if !path.exists() => {
                return Err(NotifierError::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.clone(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("NOTIFIER_").split("__"))
            .merge(cli.clone())
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), NotifierError> {
        if let Some(email) = &self.delivery.email {
            if !email.address.contains('@') {
                return Err(NotifierError::InvalidConfig(format!(
                    "email address '{}' is missing '@'",
                    email.address
                )));
            }
        }
        if let Some(sms) = &self.delivery.sms {
            if sms.number.trim().is_empty() {
                return Err(NotifierError::InvalidConfig(
                    "sms number must not be empty".to_string(),
                ));
            }
        }
        if !is_valid_timestamp_format(&self.decoration.timestamp_format) {
            return Err(NotifierError::InvalidConfig(format!(
                "invalid timestamp format '{}'",
                self.decoration.timestamp_format
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            observers: ObserverConfig {
                logger: true,
                failure_policy: ObserverFailurePolicy::FailFast,
                log_format: LogFormat::PlainText,
            },
            delivery: DeliveryConfig {
                timeout_ms: 5000,
                popup: true,
                email: None,
                sms: None,
            },
            decoration: DecorationConfig {
                signature: DEFAULT_SIGNATURE.to_string(),
                timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delivery.timeout(), Some(Duration::from_millis(5000)));
        assert_eq!(config.observers.failure_policy, ObserverFailurePolicy::FailFast);
        assert_eq!(config.observers.failure_policy, ObserverFailurePolicy::default());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let mut config = Config::default();
        config.delivery.timeout_ms = 0;
        assert_eq!(config.delivery.timeout(), None);
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let mut config = Config::default();
        config.delivery.email = Some(EmailConfig {
            address: "not-an-address".to_string(),
        });
        assert!(matches!(
            config.validate(),
            Err(NotifierError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_sms_number() {
        let mut config = Config::default();
        config.delivery.sms = Some(SmsConfig {
            number: "  ".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_timestamp_format() {
        let mut config = Config::default();
        config.decoration.timestamp_format = String::new();
        assert!(config.validate().is_err());
    }
}
