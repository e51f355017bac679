//! Execution of wallet calls as external processes

use std::process::Command;
use tracing::debug;
use zeroize::Zeroize;

use super::command::{CommandResult, DbusCall};
use crate::error::{BridgeError, Result};

/// Executes one addressed wallet call and captures its outcome.
///
/// Implementations block until the call finishes.
pub trait CommandRunner: Send + Sync {
    fn run(&self, call: &DbusCall<'_>) -> Result<CommandResult>;
}

/// Runs calls through the `qdbus` command line client:
/// `qdbus <service> <path> <interface.method> <args...>`
#[derive(Debug, Clone)]
pub struct QdbusRunner {
    program: String,
}

impl QdbusRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for QdbusRunner {
    fn default() -> Self {
        Self::new("qdbus")
    }
}

impl CommandRunner for QdbusRunner {
    fn run(&self, call: &DbusCall<'_>) -> Result<CommandResult> {
        let service = call.service_name();
        let path = call.object_path();
        let method = call.method();

        debug!(
            "executing {} {} {} {} with {} argument(s)",
            self.program,
            service,
            path,
            method,
            call.args.len()
        );

        // Arguments are copied into the child's argv here. That copy is the
        // one place a secret leaves a wipeable buffer.
        let mut output = Command::new(&self.program)
            .arg(&service)
            .arg(&path)
            .arg(&method)
            .args(call.args)
            .output()
            .map_err(|source| BridgeError::Launch {
                program: self.program.clone(),
                source,
            })?;

        // Killed by a signal: no code, report a generic failure
        let exit_code = output.status.code().unwrap_or(-1);
        let result = CommandResult::new(
            exit_code,
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
        );
        output.stdout.zeroize();
        output.stderr.zeroize();

        debug!(
            "{} exited with code {} for {}; stderr: {}",
            self.program,
            exit_code,
            method,
            result.stderr()
        );

        Ok(result)
    }
}
