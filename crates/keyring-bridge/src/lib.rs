//! # keyring-bridge
//!
//! Credential store bridge for desktop applications:
//! - KDE Wallet access over `qdbus` with kwalletd6 / kwalletd5 / unversioned fallback
//! - Lazily opened wallet session with a process-lifetime timeout latch
//! - OS keychain backend through the `keyring` crate
//! - A single `KeyringProvider` contract that never fails the caller

pub mod error;
pub mod kwallet;
pub mod secret;
pub mod settings;
pub mod storage;

pub use error::{BridgeError, Result};
pub use kwallet::{
    CallStatus, CommandResult, CommandRunner, DbusCall, KWalletProvider, Operation,
    ProtocolBridge, QdbusRunner, ServiceVersion, SessionManager, SessionState,
};
pub use secret::SecretBytes;
pub use settings::{Settings, SettingsManager};
pub use storage::{BackendKind, KeychainProvider, KeyringProvider, ProviderRegistry};
