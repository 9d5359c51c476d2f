//! Handlers that report their invocations back to the test.

use linectl::CommandHandler;
use std::time::Duration;
use tokio::sync::mpsc;

/// Forwards every invocation's argv to an unbounded channel and returns a
/// fixed status.
pub struct RecordingHandler {
    calls: mpsc::UnboundedSender<Vec<String>>,
    status: i32,
}

impl RecordingHandler {
    pub fn new(status: i32) -> (Self, mpsc::UnboundedReceiver<Vec<String>>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Self { calls, status }, rx)
    }
}

impl CommandHandler for RecordingHandler {
    fn invoke(&self, argv: &[&str]) -> i32 {
        let _ = self
            .calls
            .send(argv.iter().map(|s| s.to_string()).collect());
        self.status
    }
}

/// Await the next recorded invocation, failing the test after 5 seconds.
pub async fn expect_call(rx: &mut mpsc::UnboundedReceiver<Vec<String>>) -> Vec<String> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for dispatch")
        .expect("recording channel closed")
}

/// Assert no invocation arrives within a short grace period.
pub async fn expect_no_call(rx: &mut mpsc::UnboundedReceiver<Vec<String>>) {
    let outcome = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
    assert!(outcome.is_err(), "unexpected dispatch: {:?}", outcome);
}
