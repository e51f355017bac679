//! Scripted command runner for tests

use parking_lot::Mutex;
use std::sync::Arc;

use super::command::{CommandResult, DbusCall, Operation};
use super::runner::CommandRunner;
use crate::error::{BridgeError, Result};

/// A call as the runner saw it
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub service: String,
    pub path: String,
    pub method: String,
    pub operation: Operation,
    pub args: Vec<String>,
}

type Responder = Box<dyn Fn(&RecordedCall) -> Result<CommandResult> + Send + Sync>;

/// Records every call and answers from a closure
pub struct FakeRunner {
    responder: Responder,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeRunner {
    pub fn new<F>(respond: F) -> Arc<Self>
    where
        F: Fn(&RecordedCall) -> CommandResult + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(move |call: &RecordedCall| Ok(respond(call))),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing<F>(error: F) -> Arc<Self>
    where
        F: Fn() -> BridgeError + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(move |_: &RecordedCall| Err(error())),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn services(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.service.clone()).collect()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls.lock().iter().map(|c| c.operation).collect()
    }

    pub fn count_of(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, call: &DbusCall<'_>) -> Result<CommandResult> {
        let recorded = RecordedCall {
            service: call.service_name(),
            path: call.object_path(),
            method: call.method(),
            operation: call.operation,
            args: call.args.iter().map(|a| a.to_string()).collect(),
        };
        let result = (self.responder)(&recorded);
        self.calls.lock().push(recorded);
        result
    }
}

pub fn reply(exit_code: i32, stdout: &str, stderr: &str) -> CommandResult {
    CommandResult::new(exit_code, stdout, stderr)
}
