//! OS Keychain provider
//!
//! Uses the system keychain through the `keyring` crate:
//! - macOS: Keychain
//! - Windows: Credential Manager (DPAPI)
//! - Linux: Secret Service (GNOME Keyring, KeePassXC)

use keyring::Entry;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::KeyringProvider;
use crate::error::{BridgeError, Result};
use crate::secret::SecretBytes;
use crate::settings::Settings;

/// Account used to check whether the keychain answers at all
const CHECK_ACCOUNT: &str = "__keyring_bridge_check__";

/// OS Keychain provider; entries are filed under the application name
pub struct KeychainProvider {
    settings: Settings,
}

impl KeychainProvider {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    fn service(&self) -> &str {
        &self.settings.application_name
    }

    fn get_entry(&self, key: &str) -> Result<Entry> {
        Entry::new(self.service(), key).map_err(|e| BridgeError::KeychainError(e.to_string()))
    }

    /// Read-only check: a missing entry still proves the keychain is reachable
    fn test_availability(&self) -> bool {
        let entry = match self.get_entry(CHECK_ACCOUNT) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Keychain not available: {}", e);
                return false;
            }
        };

        match entry.get_password() {
            Ok(_) | Err(keyring::Error::NoEntry) => true,
            Err(e) => {
                debug!("Keychain not available: {}", e);
                false
            }
        }
    }

    fn try_read(&self, key: &str) -> Result<Option<SecretBytes>> {
        let entry = self.get_entry(key)?;

        match entry.get_password() {
            Ok(encoded) => {
                let encoded = Zeroizing::new(encoded);
                let decoded = base64_decode(&encoded)?;
                debug!("Retrieved key from keychain: {}", key);
                Ok(Some(SecretBytes::new(decoded)))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("Key not found in keychain: {}", key);
                Ok(None)
            }
            Err(e) => Err(BridgeError::KeychainError(e.to_string())),
        }
    }

    fn try_save(&self, key: &str, secret: &SecretBytes) -> Result<()> {
        let entry = self.get_entry(key)?;

        // Store as base64-encoded string (keychain stores strings)
        let encoded = Zeroizing::new(base64_encode(secret.expose()));

        entry
            .set_password(&encoded)
            .map_err(|e| BridgeError::KeychainError(e.to_string()))?;

        debug!("Stored key in keychain: {}", key);
        Ok(())
    }

    fn try_delete(&self, key: &str) -> Result<()> {
        let entry = self.get_entry(key)?;

        match entry.delete_password() {
            Ok(()) => {
                debug!("Deleted key from keychain: {}", key);
                Ok(())
            }
            // Key doesn't exist, that's fine
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(BridgeError::KeychainError(e.to_string())),
        }
    }
}

impl KeyringProvider for KeychainProvider {
    fn enabled(&self) -> bool {
        if self.settings.native_disabled() {
            debug!("native keyring integration disabled");
            return false;
        }
        self.test_availability()
    }

    fn read(&self, key: &str) -> Option<SecretBytes> {
        match self.try_read(key) {
            Ok(secret) => secret,
            Err(e) => {
                warn!("Something went wrong: read action failed: {}", e);
                None
            }
        }
    }

    /// The keychain entry has no description attribute; `_description` is dropped.
    fn save(&self, key: &str, secret: &SecretBytes, _description: &str) {
        if let Err(e) = self.try_save(key, secret) {
            warn!("Something went wrong: save action failed: {}", e);
        }
    }

    fn delete(&self, key: &str) {
        if let Err(e) = self.try_delete(key) {
            warn!("Something went wrong: delete action failed: {}", e);
        }
    }

    fn backend_name(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS Keychain";

        #[cfg(target_os = "windows")]
        return "Windows Credential Manager";

        #[cfg(target_os = "linux")]
        return "Linux Secret Service";

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        return "System Keychain";
    }
}

/// Base64 encode bytes
fn base64_encode(data: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Base64 decode string
fn base64_decode(encoded: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| BridgeError::KeychainError(format!("Base64 decode error: {}", e)))
}
