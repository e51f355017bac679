//! Provider trait definition

use crate::secret::SecretBytes;

/// A credential store backend.
///
/// Every method is total: backend trouble is logged and surfaces only as
/// `false`, `None` or a no-op, never as an error or a panic.
pub trait KeyringProvider: Send + Sync {
    /// Whether this backend is usable right now
    fn enabled(&self) -> bool;

    /// Retrieve the secret stored under `key`
    fn read(&self, key: &str) -> Option<SecretBytes>;

    /// Store `secret` under `key`. Backends without a description field
    /// drop `description`.
    fn save(&self, key: &str, secret: &SecretBytes, description: &str);

    /// Remove the entry stored under `key`
    fn delete(&self, key: &str);

    /// Get a human-readable name for this backend
    fn backend_name(&self) -> &'static str;
}
