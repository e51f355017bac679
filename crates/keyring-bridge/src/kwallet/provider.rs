//! KDE Wallet provider

use std::sync::Arc;
use tracing::{debug, warn};

use super::bridge::ProtocolBridge;
use super::command::Operation;
use super::runner::{CommandRunner, QdbusRunner};
use super::session::{SessionManager, SessionState};
use crate::error::BridgeError;
use crate::secret::SecretBytes;
use crate::settings::Settings;
use crate::storage::KeyringProvider;

/// Credentials in KDE Wallet, filed under the application's folder.
///
/// Secrets are handed to `qdbus` as command line arguments; they leave
/// wipeable memory for the lifetime of that child process.
pub struct KWalletProvider {
    settings: Settings,
    sessions: SessionManager,
}

impl KWalletProvider {
    /// Provider talking to kwalletd through the configured qdbus binary
    pub fn new(settings: Settings) -> Self {
        let runner = Arc::new(QdbusRunner::new(settings.qdbus_program.clone()));
        Self::with_runner(settings, runner)
    }

    pub fn with_runner(settings: Settings, runner: Arc<dyn CommandRunner>) -> Self {
        let sessions = SessionManager::new(
            ProtocolBridge::new(runner),
            settings.application_name.clone(),
            settings.default_local_wallet.clone(),
        );
        Self { settings, sessions }
    }

    pub fn session_state(&self) -> SessionState {
        self.sessions.state()
    }

    fn bridge(&self) -> &ProtocolBridge {
        self.sessions.bridge()
    }

    fn application_name(&self) -> &str {
        self.sessions.application_name()
    }

    fn handle(&self) -> Option<String> {
        match self.sessions.ensure_valid_handle() {
            Ok(handle) => Some(handle),
            Err(e) => {
                debug!("No wallet handle: {}", e);
                None
            }
        }
    }
}

impl KeyringProvider for KWalletProvider {
    fn enabled(&self) -> bool {
        if self.settings.native_disabled() {
            debug!("native keyring integration disabled");
            return false;
        }

        let result = self.bridge().invoke(Operation::IsEnabled, &[]);
        if result.is_true() {
            return self.handle().is_some();
        }
        false
    }

    fn read(&self, key: &str) -> Option<SecretBytes> {
        let handle = self.handle()?;
        let app = self.application_name();

        let result = self
            .bridge()
            .invoke(Operation::ReadPassword, &[handle.as_str(), app, key, app]);
        if !result.succeeded() {
            warn!("Something went wrong: read action returned not 0 exitCode");
        }

        let value = result.take_stdout();
        if value.is_empty() {
            None
        } else {
            Some(SecretBytes::from(value))
        }
    }

    /// kwalletd has no field for a description, so `_description` is dropped.
    fn save(&self, key: &str, secret: &SecretBytes, _description: &str) {
        let Some(handle) = self.handle() else {
            return;
        };
        let Some(password) = secret.as_str() else {
            warn!("Something went wrong: save action failed: {}", BridgeError::SecretNotUtf8);
            return;
        };
        let app = self.application_name();

        let result = self.bridge().invoke(
            Operation::WritePassword,
            &[handle.as_str(), app, key, password, app],
        );
        if result.is_failure() {
            warn!("Something went wrong: save action failed");
        }
    }

    fn delete(&self, key: &str) {
        let Some(handle) = self.handle() else {
            return;
        };
        let app = self.application_name();

        let result = self
            .bridge()
            .invoke(Operation::RemoveEntry, &[handle.as_str(), app, key, app]);
        if result.is_failure() {
            warn!("Something went wrong: delete action failed");
        }
    }

    fn backend_name(&self) -> &'static str {
        "KDE Wallet"
    }
}
