use std::fmt::Debug;
use std::sync::Mutex;

/// Sink for user-facing messages.
///
/// The lookup flow reports every outcome, success or failure, through this
/// trait, so callers decide how messages reach the user (terminal, dialog,
/// test buffer) without the core logic knowing.
pub trait Notify: Send + Sync + Debug {
    fn notify(&self, message: &str);
}

/// Prints each message on its own line to stdout.
#[derive(Debug, Default)]
pub struct StdoutNotifier;

impl Notify for StdoutNotifier {
    fn notify(&self, message: &str) {
        println!("{message}");
    }
}

/// Collects messages in memory, for tests and capture scenarios.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all messages received so far, in delivery order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Notify for MemoryNotifier {
    fn notify(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
