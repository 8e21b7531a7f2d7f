use std::{
    path::Path,
    sync::{Arc, LazyLock},
};

use arc_swap::ArcSwap;
use eyre::{Context as _, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::selector::Framing;

pub const DEFAULT_SHARE_HOST: &str = "tapcard.app";
pub const DEFAULT_CACHE_CAPACITY: u32 = 16;

pub static CONFIG: LazyLock<ArcSwap<TapCardConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(TapCardConfig::default()));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default, rename_all = "camelCase")]
pub struct TapCardConfig {
    /// Host the card urls point at, `https://<host>/share/<id>`
    pub share_host: String,
    pub framing: Framing,
    /// Number of encoded cards kept around, 0 disables the cache
    pub cache_capacity: u32,
}

impl Default for TapCardConfig {
    fn default() -> Self {
        Self {
            share_host: DEFAULT_SHARE_HOST.to_string(),
            framing: Framing::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
#[uniffi::export(Display)]
pub enum ConfigError {
    #[error("unable to parse config: {0}")]
    Parse(String),
}

impl TapCardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    /// Read a json config file, missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("unable to read config file {}", path.display()))?;

        let config = Self::from_json(&json)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;

        Ok(config)
    }
}

/// Snapshot of the process wide config
pub fn current() -> Arc<TapCardConfig> {
    CONFIG.load_full()
}

/// Replace the process wide config, objects created afterwards pick it up
pub fn set(config: TapCardConfig) {
    info!("updating config, share host: {}", config.share_host);
    CONFIG.store(Arc::new(config));
}

mod ffi {
    use super::*;

    #[uniffi::export]
    fn tapcard_config() -> TapCardConfig {
        current().as_ref().clone()
    }

    #[uniffi::export]
    fn set_tapcard_config(config: TapCardConfig) {
        set(config);
    }

    #[uniffi::export]
    fn tapcard_config_from_json(json: String) -> Result<TapCardConfig, ConfigError> {
        TapCardConfig::from_json(&json)
    }

    #[uniffi::export]
    fn default_tapcard_config() -> TapCardConfig {
        TapCardConfig::default()
    }
}
