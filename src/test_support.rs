//! Shared fakes for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{CompletionClient, CompletionFailure, CompletionResult, ErrorKind};

/// A completion client that replays one canned result and records every call.
pub struct ScriptedClient {
    result: CompletionResult,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Self {
        Self::with_result(Ok(text.to_string()))
    }

    pub fn failing(kind: ErrorKind, detail: &str) -> Self {
        Self::with_result(Err(CompletionFailure::new(kind, detail)))
    }

    fn with_result(result: CompletionResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (system instruction, user text) pairs in call order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, system_instruction: &str, user_text: &str) -> CompletionResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((system_instruction.to_string(), user_text.to_string()));
        self.result.clone()
    }
}
