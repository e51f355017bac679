//! KDE Wallet backend
//!
//! kwalletd is only reachable over D-Bus, so every operation runs `qdbus`
//! against the newest daemon that answers:
//! 1. Protocol bridge (version fallback, result capture)
//! 2. Session manager (wallet handle, timeout latch)
//! 3. Provider (the `KeyringProvider` facade)

mod bridge;
mod command;
mod provider;
mod runner;
mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::ProtocolBridge;
pub use command::{CallStatus, CommandResult, DbusCall, Operation, ServiceVersion};
pub use provider::KWalletProvider;
pub use runner::{CommandRunner, QdbusRunner};
pub use session::{SessionManager, SessionState, NO_HANDLE};
