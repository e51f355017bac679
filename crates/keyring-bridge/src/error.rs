//! Error types for keyring-bridge

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Bridge error types
///
/// These never reach callers of [`crate::KeyringProvider`]; the providers
/// log them and degrade to `false` / `None`.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to run {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("KWallet access disabled after a service timeout")]
    PermanentlyDisabled,

    #[error("Wallet name '{0}' comes from a buggy kwalletd, not opening it")]
    BuggyWalletName(String),

    #[error("Time out happened while opening KWallet")]
    OpenTimeout,

    #[error("Failed to open KWallet (exit code {exit_code}, reply '{reply}')")]
    OpenFailed { exit_code: i32, reply: String },

    #[error("Secret is not valid UTF-8 and cannot be passed to qdbus")]
    SecretNotUtf8,

    #[error("Keychain error: {0}")]
    KeychainError(String),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
