use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{StorefrontError, StorefrontResult};
use crate::format::CurrencyFormat;
use crate::notifications::DEFAULT_MAX_NOTIFICATIONS;

pub const STOREFRONT_CONFIG_FILENAME: &str = "storefront.json";
pub const STOREFRONT_CONFIG_VERSION: &str = "1.0.0";
/// Snapshots live in this subdirectory of a config directory, never next to
/// `storefront.json`.
pub const SNAPSHOTS_DIRNAME: &str = "snapshots";

pub const ENV_STORAGE_DIR: &str = "STOREFRONT_STORAGE_DIR";
pub const ENV_KEY_PREFIX: &str = "STOREFRONT_KEY_PREFIX";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontConfig {
    pub version: String,
    /// Snapshot directory. `None` means the platform data directory.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    /// Prepended to every snapshot key.
    #[serde(default)]
    pub key_prefix: String,
    #[serde(default)]
    pub currency: CurrencyFormat,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    #[serde(default)]
    pub orders: OrderPreferences,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub max_entries: usize,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_NOTIFICATIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderPreferences {
    pub default_shipping_fee: f64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            version: STOREFRONT_CONFIG_VERSION.to_string(),
            storage_dir: None,
            key_prefix: String::new(),
            currency: CurrencyFormat::default(),
            notifications: NotificationPreferences::default(),
            orders: OrderPreferences::default(),
        }
    }
}

impl StorefrontConfig {
    /// Overlay `STOREFRONT_STORAGE_DIR` and `STOREFRONT_KEY_PREFIX`.
    pub fn apply_env(mut self) -> Self {
        self.apply_overrides(
            std::env::var(ENV_STORAGE_DIR).ok(),
            std::env::var(ENV_KEY_PREFIX).ok(),
        );
        self
    }

    fn apply_overrides(&mut self, storage_dir: Option<String>, key_prefix: Option<String>) {
        if let Some(dir) = storage_dir.filter(|dir| !dir.trim().is_empty()) {
            self.storage_dir = Some(PathBuf::from(dir));
        }
        if let Some(prefix) = key_prefix {
            self.key_prefix = prefix;
        }
    }

    /// The configured directory, else `<data dir>/storefront`. `None` when
    /// the platform has no data directory.
    pub fn resolved_storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("storefront")))
    }
}

pub fn load_or_create_config(dir: &Path) -> StorefrontResult<StorefrontConfig> {
    std::fs::create_dir_all(dir).map_err(|error| {
        StorefrontError::Config(format!(
            "failed to create config directory {}: {error}",
            dir.display()
        ))
    })?;

    let path = config_path(dir);
    if !path.exists() {
        let config = StorefrontConfig::default();
        write_config(&path, &config)?;
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path).map_err(|error| {
        StorefrontError::Config(format!(
            "failed to read storefront config {}: {error}",
            path.display()
        ))
    })?;
    let config: StorefrontConfig = serde_json::from_str(&data).map_err(|error| {
        StorefrontError::Config(format!(
            "failed to parse storefront config {}: {error}",
            path.display()
        ))
    })?;

    if config.version != STOREFRONT_CONFIG_VERSION {
        return Err(StorefrontError::Config(format!(
            "unsupported storefront config version {} in {}",
            config.version,
            path.display()
        )));
    }

    Ok(config)
}

/// Load `storefront.json` from `dir` and, unless the config names its own
/// storage directory, keep snapshots in `<dir>/snapshots`.
pub fn load_config_dir(dir: &Path) -> StorefrontResult<StorefrontConfig> {
    let mut config = load_or_create_config(dir)?;
    if config.storage_dir.is_none() {
        config.storage_dir = Some(dir.join(SNAPSHOTS_DIRNAME));
    }
    Ok(config)
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(STOREFRONT_CONFIG_FILENAME)
}

fn write_config(path: &Path, config: &StorefrontConfig) -> StorefrontResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| {
        StorefrontError::Config(format!(
            "failed to serialize storefront config {}: {error}",
            path.display()
        ))
    })?;
    std::fs::write(path, data).map_err(|error| {
        StorefrontError::Config(format!(
            "failed to write storefront config {}: {error}",
            path.display()
        ))
    })?;
    Ok(())
}
