//! Wallet session handle management
//!
//! kwalletd identifies an opened wallet by a numeric handle that has to be
//! passed to every subsequent call. The manager opens the local wallet
//! lazily, re-checks the cached handle before each use and gives up for
//! the rest of the process once kwalletd has timed out on `open`.

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::bridge::ProtocolBridge;
use super::command::{CommandResult, Operation};
use crate::error::{BridgeError, Result};

/// Handle value meaning "nothing opened yet"
pub const NO_HANDLE: &str = "0";

/// Window id passed to `open`; 0 means no parent window for the prompt
const NO_WINDOW_ID: &str = "0";

/// Older kdelibs report the local wallet by its D-Bus `.service` name;
/// opening a wallet under that name never works.
const BUGGY_WALLET_MARKER: &str = ".service";

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoHandle,
    HandleCached,
    /// Terminal for the process lifetime
    PermanentlyDisabled,
}

#[derive(Debug)]
struct WalletSession {
    handle: String,
    valid: bool,
    permanently_disabled: bool,
}

impl Default for WalletSession {
    fn default() -> Self {
        Self {
            handle: NO_HANDLE.to_string(),
            valid: false,
            permanently_disabled: false,
        }
    }
}

/// Owner of the single wallet session of this process
pub struct SessionManager {
    bridge: ProtocolBridge,
    application_name: String,
    default_local_wallet: String,
    session: Mutex<WalletSession>,
}

impl SessionManager {
    pub fn new(
        bridge: ProtocolBridge,
        application_name: impl Into<String>,
        default_local_wallet: impl Into<String>,
    ) -> Self {
        Self {
            bridge,
            application_name: application_name.into(),
            default_local_wallet: default_local_wallet.into(),
            session: Mutex::new(WalletSession::default()),
        }
    }

    pub fn bridge(&self) -> &ProtocolBridge {
        &self.bridge
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn state(&self) -> SessionState {
        let session = self.session.lock();
        if session.permanently_disabled {
            SessionState::PermanentlyDisabled
        } else if session.valid {
            SessionState::HandleCached
        } else {
            SessionState::NoHandle
        }
    }

    /// Return a handle to an open wallet, opening it if needed.
    ///
    /// The lock is held for the whole check-and-open sequence, so at most
    /// one `open` is in flight per process.
    pub fn ensure_valid_handle(&self) -> Result<String> {
        let mut session = self.session.lock();

        if session.permanently_disabled {
            return Err(BridgeError::PermanentlyDisabled);
        }

        if session.handle.is_empty() {
            session.handle = NO_HANDLE.to_string();
        }

        let result = self.bridge.invoke(Operation::IsOpen, &[session.handle.as_str()]);
        if result.is_true() {
            session.valid = true;
            return Ok(session.handle.clone());
        }
        session.valid = false;

        let wallet_name = self.local_wallet_name();
        if wallet_name.contains(BUGGY_WALLET_MARKER) {
            debug!("Local wallet is reported as '{}', not opening it", wallet_name);
            return Err(BridgeError::BuggyWalletName(wallet_name));
        }

        let result = self.bridge.invoke(
            Operation::Open,
            &[wallet_name.as_str(), NO_WINDOW_ID, self.application_name.as_str()],
        );

        if result.exit_code() == CommandResult::TIMEOUT_EXIT_CODE {
            // kwalletd keeps timing out once this happened
            // (https://bugs.kde.org/show_bug.cgi?id=259229)
            warn!("Something went wrong: time out happened while accessing KWallet");
            session.permanently_disabled = true;
            return Err(BridgeError::OpenTimeout);
        }

        if result.is_failure() {
            warn!("Something went wrong: failed to access KWallet");
            return Err(BridgeError::OpenFailed {
                exit_code: result.exit_code(),
                reply: result.stdout().to_string(),
            });
        }

        session.handle = result.take_stdout();
        session.valid = true;
        debug!("Opened wallet '{}'", wallet_name);
        Ok(session.handle.clone())
    }

    fn local_wallet_name(&self) -> String {
        let result = self.bridge.invoke(Operation::LocalWallet, &[]);
        if result.succeeded() {
            result.take_stdout()
        } else {
            self.default_local_wallet.clone()
        }
    }
}
