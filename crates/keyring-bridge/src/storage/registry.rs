//! Backend selection

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{KeychainProvider, KeyringProvider};
use crate::kwallet::KWalletProvider;
use crate::settings::Settings;

/// Known backend kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    KWallet,
    Keychain,
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::KWallet => "kwallet",
            Self::Keychain => "keychain",
        }
    }

    /// Build a provider of this kind from settings
    pub fn build(&self, settings: &Settings) -> Arc<dyn KeyringProvider> {
        match self {
            Self::KWallet => Arc::new(KWalletProvider::new(settings.clone())),
            Self::Keychain => Arc::new(KeychainProvider::new(settings.clone())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kwallet" => Ok(Self::KWallet),
            "keychain" => Ok(Self::Keychain),
            other => Err(format!("Unknown keyring backend: {}", other)),
        }
    }
}

/// Providers in preference order
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn KeyringProvider>>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn KeyringProvider>>) -> Self {
        Self { providers }
    }

    /// Providers named in `settings.providers`, unknown names skipped
    pub fn from_settings(settings: &Settings) -> Self {
        let providers = settings
            .providers
            .iter()
            .filter_map(|name| match name.parse::<BackendKind>() {
                Ok(kind) => Some(kind.build(settings)),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            })
            .collect();
        Self::new(providers)
    }

    /// A registry holding just one backend
    pub fn single(kind: BackendKind, settings: &Settings) -> Self {
        Self::new(vec![kind.build(settings)])
    }

    pub fn providers(&self) -> &[Arc<dyn KeyringProvider>] {
        &self.providers
    }

    /// First provider that reports itself enabled
    pub fn select(&self) -> Option<Arc<dyn KeyringProvider>> {
        for provider in &self.providers {
            if provider.enabled() {
                info!("Using {} for credentials", provider.backend_name());
                return Some(provider.clone());
            }
            debug!("{} is not available", provider.backend_name());
        }
        None
    }
}
