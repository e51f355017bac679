//! Bridge settings management
//!
//! Stores non-sensitive configuration in a plain JSON file. Nothing secret
//! ever lands here; the wallet session itself lives only in memory.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Environment variable that switches native keyring integration off
pub const NO_NATIVE_ENV: &str = "KEYRING_BRIDGE_NO_NATIVE";

const SETTINGS_FILE: &str = "settings.json";

/// Bridge settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Settings file version
    pub version: u32,
    /// Folder/application name entries are filed under in the wallet
    pub application_name: String,
    /// Wallet opened when kwalletd cannot report its local wallet
    pub default_local_wallet: String,
    /// D-Bus command line client used to reach kwalletd
    pub qdbus_program: String,
    /// Never touch a native keyring
    pub disable_native: bool,
    /// Backend preference, first enabled wins
    pub providers: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            application_name: "keyring-bridge".to_string(),
            default_local_wallet: "kdewallet".to_string(),
            qdbus_program: "qdbus".to_string(),
            disable_native: false,
            providers: vec!["kwallet".to_string(), "keychain".to_string()],
        }
    }
}

impl Settings {
    /// Whether native integration is switched off, by settings or by the
    /// environment. Read on every call so the override can change at runtime.
    pub fn native_disabled(&self) -> bool {
        self.disable_native || env_flag(NO_NATIVE_ENV)
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Load settings from the platform config directory
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "symbia", "keyring-bridge").ok_or_else(|| {
            BridgeError::SettingsError("Could not determine config directory".to_string())
        })?;
        Self::with_dir(dirs.config_dir())
    }

    /// Load settings from an explicit directory
    pub fn with_dir(config_dir: &Path) -> Result<Self> {
        let settings_file = config_dir.join(SETTINGS_FILE);
        let settings = Self::load_from_file(&settings_file)?;

        Ok(Self {
            settings_file,
            settings,
        })
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.settings)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Path of the backing settings file
    pub fn path(&self) -> &Path {
        &self.settings_file
    }

    /// Get current settings
    pub fn get(&self) -> &Settings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}
