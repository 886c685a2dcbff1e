// ⚙️ Configuration - Environment driven
//
// BUNDLE_CATALOG             product CSV            (data/products.csv)
// BUNDLE_DISCOUNT_THRESHOLD  distinct products       (3)
// BUNDLE_DISCOUNT_RATE       fraction of subtotal    (0.30)
// BUNDLE_SERVER_ADDR         API listen address      (0.0.0.0:3000)
// BUNDLE_LOG_LEVEL           tracing filter          (info)

use crate::error::{BundleError, Result};
use crate::pricing::{PricingConfig, DEFAULT_DISCOUNT_RATE, DEFAULT_DISCOUNT_THRESHOLD};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CATALOG_PATH: &str = "data/products.csv";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub pricing: PricingConfig,
    pub server_addr: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            pricing: PricingConfig::default(),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pricing = PricingConfig {
            discount_threshold: parse_or(
                &lookup,
                "BUNDLE_DISCOUNT_THRESHOLD",
                DEFAULT_DISCOUNT_THRESHOLD,
            )?,
            discount_rate: parse_or(&lookup, "BUNDLE_DISCOUNT_RATE", DEFAULT_DISCOUNT_RATE)?,
        };

        let config = Config {
            catalog_path: lookup("BUNDLE_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            pricing,
            server_addr: lookup("BUNDLE_SERVER_ADDR")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string()),
            log_level: lookup("BUNDLE_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.pricing.validate().map_err(|err| match err {
            BundleError::InvalidConfig { variable, reason } => BundleError::InvalidConfig {
                variable: format!("BUNDLE_{}", variable.to_uppercase()),
                reason,
            },
            other => other,
        })?;

        if self.server_addr.trim().is_empty() {
            return Err(BundleError::invalid_config("BUNDLE_SERVER_ADDR", "is empty"));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| BundleError::invalid_config(key, format!("'{}': {}", raw, e))),
    }
}
