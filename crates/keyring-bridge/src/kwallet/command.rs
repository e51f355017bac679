//! KWallet D-Bus call definitions

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// D-Bus service name prefix of the wallet daemon
pub const SERVICE_BASE: &str = "org.kde.kwalletd";
/// Object path prefix of the wallet daemon
pub const OBJECT_PATH_BASE: &str = "/modules/kwalletd";
/// Interface every wallet method lives on
pub const INTERFACE: &str = "org.kde.KWallet";

/// Wallet methods the bridge calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    IsEnabled,
    IsOpen,
    Open,
    ReadPassword,
    WritePassword,
    RemoveEntry,
    LocalWallet,
}

impl Operation {
    /// D-Bus method name
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::IsEnabled => "isEnabled",
            Self::IsOpen => "isOpen",
            Self::Open => "open",
            Self::ReadPassword => "readPassword",
            Self::WritePassword => "writePassword",
            Self::RemoveEntry => "removeEntry",
            Self::LocalWallet => "localWallet",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

/// One addressing scheme for kwalletd: `kwalletd6`, `kwalletd5` or plain `kwalletd`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceVersion(Option<u32>);

impl ServiceVersion {
    pub const KF6: Self = Self(Some(6));
    pub const KF5: Self = Self(Some(5));
    pub const UNVERSIONED: Self = Self(None);

    /// Fallback order: newest daemon first, unversioned last
    pub const FALLBACK_ORDER: [Self; 3] = [Self::KF6, Self::KF5, Self::UNVERSIONED];

    /// Suffix appended to service name and object path
    pub fn suffix(&self) -> String {
        self.0.map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn service_name(&self) -> String {
        format!("{}{}", SERVICE_BASE, self.suffix())
    }

    pub fn object_path(&self) -> String {
        format!("{}{}", OBJECT_PATH_BASE, self.suffix())
    }

    /// Exact stderr qdbus prints when this daemon is not running
    pub fn missing_service_message(&self) -> String {
        format!("Service '{}' does not exist.", self.service_name())
    }
}

/// A fully addressed wallet call
#[derive(Debug, Clone, Copy)]
pub struct DbusCall<'a> {
    pub version: ServiceVersion,
    pub operation: Operation,
    /// Ordered text arguments; may contain secrets, never log them
    pub args: &'a [&'a str],
}

impl DbusCall<'_> {
    pub fn service_name(&self) -> String {
        self.version.service_name()
    }

    pub fn object_path(&self) -> String {
        self.version.object_path()
    }

    /// Fully qualified method, e.g. `org.kde.KWallet.isOpen`
    pub fn method(&self) -> String {
        format!("{}.{}", INTERFACE, self.operation.method_name())
    }
}

/// How the external call itself went, independent of the wallet's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallStatus {
    /// The process ran to completion
    #[default]
    Completed,
    /// The process could not be launched or its output could not be read
    LaunchFailed,
}

/// Exit code, trimmed stdout and trimmed stderr of one call.
///
/// Output is wiped on drop since `readPassword` replies carry secrets.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CommandResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
    #[zeroize(skip)]
    status: CallStatus,
}

impl CommandResult {
    /// Exit code qdbus reports when the wallet daemon timed out
    pub const TIMEOUT_EXIT_CODE: i32 = 2;
    /// Textual reply kwalletd uses for a logical failure
    pub const FAILURE_REPLY: &'static str = "-1";

    pub fn new(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            exit_code,
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
            status: CallStatus::Completed,
        }
    }

    /// Success-shaped empty result used when the call machinery failed.
    ///
    /// Callers cannot tell this apart from an empty reply by exit code or
    /// output; `status()` keeps the difference for diagnostics.
    pub fn degraded() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            status: CallStatus::LaunchFailed,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Reply is the literal `true`
    pub fn is_true(&self) -> bool {
        self.stdout == "true"
    }

    /// Non-zero exit or the `-1` reply
    pub fn is_failure(&self) -> bool {
        !self.succeeded() || self.stdout == Self::FAILURE_REPLY
    }

    /// Move the reply out without leaving a copy behind
    pub fn take_stdout(mut self) -> String {
        std::mem::take(&mut self.stdout)
    }
}

impl fmt::Debug for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandResult")
            .field("exit_code", &self.exit_code)
            .field("stdout", &"[REDACTED]")
            .field("stderr", &self.stderr)
            .field("status", &self.status)
            .finish()
    }
}
