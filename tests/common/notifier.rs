//! Recording notifier
//!
//! Captures every notification instead of sending it. Recipients can be
//! marked as failing to simulate SMTP rejections, or as stalling to
//! simulate a server that is slow to answer.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use xftodo::backend::reminders::{Notification, Notifier, NotifyError};

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    failing: Mutex<HashSet<String>>,
    stalling: Mutex<HashMap<String, Duration>>,
    attempts: Mutex<usize>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery to `recipient` fail
    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    /// Hold every delivery to `recipient` for `delay` before it completes
    pub fn stall_for(&self, recipient: &str, delay: Duration) {
        self.stalling.lock().unwrap().insert(recipient.to_string(), delay);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Deliveries attempted, successful or not
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    /// Poll until at least `count` deliveries were attempted
    pub async fn wait_for_attempts(&self, count: usize, timeout: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let attempts = self.attempts();
            if attempts >= count || tokio::time::Instant::now() >= deadline {
                return attempts;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Poll until at least `count` notifications were delivered
    pub async fn wait_for_sent(&self, count: usize, timeout: Duration) -> Vec<Notification> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let sent = self.sent();
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        *self.attempts.lock().unwrap() += 1;
        let stall = self.stalling.lock().unwrap().get(&notification.to).copied();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        if self.failing.lock().unwrap().contains(&notification.to) {
            return Err(NotifyError::Rejected(format!(
                "550 mailbox unavailable: {}",
                notification.to
            )));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}
