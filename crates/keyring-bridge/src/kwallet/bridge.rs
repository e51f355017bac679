//! Version-fallback protocol bridge to kwalletd

use std::sync::Arc;
use tracing::debug;

use super::command::{CommandResult, DbusCall, Operation, ServiceVersion};
use super::runner::CommandRunner;

/// Issues wallet operations against kwalletd, trying daemon versions in a
/// fixed order. Holds no session state of its own.
#[derive(Clone)]
pub struct ProtocolBridge {
    runner: Arc<dyn CommandRunner>,
    versions: Vec<ServiceVersion>,
}

impl ProtocolBridge {
    /// Bridge trying kwalletd6, kwalletd5, then unversioned kwalletd
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_versions(runner, ServiceVersion::FALLBACK_ORDER.to_vec())
    }

    pub fn with_versions(runner: Arc<dyn CommandRunner>, versions: Vec<ServiceVersion>) -> Self {
        Self { runner, versions }
    }

    pub fn versions(&self) -> &[ServiceVersion] {
        &self.versions
    }

    /// Run `operation` with `args`, one version at a time.
    ///
    /// Stops at the first version that exits 0 without reporting itself
    /// missing. When every version is exhausted the last result is returned
    /// as is, even if it failed.
    pub fn invoke(&self, operation: Operation, args: &[&str]) -> CommandResult {
        let mut last = None;

        for &version in &self.versions {
            let result = self.invoke_version(version, operation, args);
            if result.succeeded() && result.stderr() != version.missing_service_message() {
                return result;
            }
            debug!(
                "{} via {} gave exit code {}, trying next version",
                operation,
                version.service_name(),
                result.exit_code()
            );
            last = Some(result);
        }

        last.unwrap_or_else(CommandResult::degraded)
    }

    fn invoke_version(
        &self,
        version: ServiceVersion,
        operation: Operation,
        args: &[&str],
    ) -> CommandResult {
        let call = DbusCall {
            version,
            operation,
            args,
        };

        match self.runner.run(&call) {
            Ok(result) => result,
            Err(e) => {
                // Same shape as an empty successful reply
                debug!("exception thrown while invoking {}: {}", call.method(), e);
                CommandResult::degraded()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::kwallet::command::CallStatus;
    use crate::kwallet::testing::{reply, FakeRunner};

    #[test]
    fn test_first_present_version_wins() {
        let runner = FakeRunner::new(|_| reply(0, "true", ""));
        let bridge = ProtocolBridge::new(runner.clone());

        let result = bridge.invoke(Operation::IsEnabled, &[]);
        assert!(result.is_true());
        assert_eq!(runner.call_count(), 1);
        assert_eq!(runner.calls()[0].service, "org.kde.kwalletd6");
        assert_eq!(runner.calls()[0].path, "/modules/kwalletd6");
        assert_eq!(runner.calls()[0].method, "org.kde.KWallet.isEnabled");
    }

    #[test]
    fn test_missing_service_falls_through() {
        let runner = FakeRunner::new(|call| match call.service.as_str() {
            "org.kde.kwalletd6" => reply(0, "", "Service 'org.kde.kwalletd6' does not exist."),
            _ => reply(0, "true", ""),
        });
        let bridge = ProtocolBridge::new(runner.clone());

        let result = bridge.invoke(Operation::IsEnabled, &[]);
        assert!(result.is_true());
        assert_eq!(runner.services(), vec!["org.kde.kwalletd6", "org.kde.kwalletd5"]);
    }

    #[test]
    fn test_other_stderr_is_final_answer() {
        let runner =
            FakeRunner::new(|_| reply(0, "", "Service 'org.kde.kwalletd5' does not exist."));
        let bridge = ProtocolBridge::new(runner.clone());

        // kwalletd6 prints a message for another version: not a match for v6
        bridge.invoke(Operation::IsEnabled, &[]);
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn test_exhausted_versions_return_last_result() {
        let runner = FakeRunner::new(|call| {
            let message = format!("Service '{}' does not exist.", call.service);
            reply(1, "", &message)
        });
        let bridge = ProtocolBridge::new(runner.clone());

        let result = bridge.invoke(Operation::LocalWallet, &[]);
        assert_eq!(runner.call_count(), 3);
        assert_eq!(result.exit_code(), 1);
        assert_eq!(result.stderr(), "Service 'org.kde.kwalletd' does not exist.");
        assert_eq!(runner.calls()[2].path, "/modules/kwalletd");
    }

    #[test]
    fn test_arguments_are_passed_in_order() {
        let runner = FakeRunner::new(|_| reply(0, "0", ""));
        let bridge = ProtocolBridge::new(runner.clone());

        bridge.invoke(Operation::Open, &["kdewallet", "0", "JOSM"]);
        assert_eq!(runner.calls()[0].args, vec!["kdewallet", "0", "JOSM"]);
    }

    #[test]
    fn test_launch_failure_degrades_to_empty_success() {
        let runner = FakeRunner::failing(|| BridgeError::Launch {
            program: "qdbus".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        });
        let bridge = ProtocolBridge::new(runner.clone());

        let result = bridge.invoke(Operation::IsEnabled, &[]);
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.stdout(), "");
        assert_eq!(result.status(), CallStatus::LaunchFailed);
        // A degraded result counts as an answer, no further versions tried
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn test_custom_version_order() {
        let runner = FakeRunner::new(|call| {
            let message = format!("Service '{}' does not exist.", call.service);
            reply(0, "", &message)
        });
        let bridge =
            ProtocolBridge::with_versions(runner.clone(), vec![ServiceVersion::UNVERSIONED]);

        assert_eq!(bridge.versions(), &[ServiceVersion::UNVERSIONED]);
        bridge.invoke(Operation::IsEnabled, &[]);
        assert_eq!(runner.services(), vec!["org.kde.kwalletd"]);
    }

    #[test]
    fn test_default_version_order() {
        let runner = FakeRunner::new(|_| reply(0, "", ""));
        let bridge = ProtocolBridge::new(runner);

        assert_eq!(
            bridge.versions(),
            &[
                ServiceVersion::KF6,
                ServiceVersion::KF5,
                ServiceVersion::UNVERSIONED
            ]
        );
    }
}
