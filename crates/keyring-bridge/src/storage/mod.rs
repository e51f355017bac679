//! Credential store providers
//!
//! This module provides the provider contract and its backends:
//! 1. KDE Wallet (see [`crate::kwallet`])
//! 2. OS Keychain through the `keyring` crate
//!
//! plus the registry that picks the first usable one.

mod keychain;
mod registry;
mod traits;

pub use keychain::KeychainProvider;
pub use registry::{BackendKind, ProviderRegistry};
pub use traits::KeyringProvider;
