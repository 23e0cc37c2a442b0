//! Periodic reminder sweep
//!
//! Alternative to per-task scheduling. On a fixed interval every urgent,
//! incomplete task gets a reminder, whatever its due time. A task keeps
//! receiving one email per tick until it is completed, deleted or
//! un-flagged.
//!
//! Sends within a tick run concurrently and each result is counted on its
//! own, so one slow or failing recipient does not hold back the others.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::backend::reminders::notifier::{Notification, Notifier};
use crate::backend::tasks::db::{list_urgent_incomplete, TaskWithOwner};

/// Counts from one sweep tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub matched: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Compose the email for a swept task
pub fn sweep_notification(entry: &TaskWithOwner) -> Notification {
    Notification {
        to: entry.email.clone(),
        subject: format!("Reminder: Urgent Task \"{}\"", entry.task.text),
        body: format!(
            "This is a reminder for your urgent task: \"{}\". Please complete it soon!",
            entry.task.text
        ),
    }
}

/// Fixed-interval reminder sweep
#[derive(Clone)]
pub struct ReminderSweep {
    pool: SqlitePool,
    notifier: Arc<dyn Notifier>,
    interval: Duration,
    cancel: CancellationToken,
}

impl ReminderSweep {
    pub fn new(pool: SqlitePool, notifier: Arc<dyn Notifier>, interval: Duration) -> Self {
        Self {
            pool,
            notifier,
            interval,
            cancel: CancellationToken::new(),
        }
    }

    /// Run a single sweep
    ///
    /// # Errors
    ///
    /// Returns the store error if urgent tasks cannot be listed. Delivery
    /// failures are counted, not returned.
    pub async fn sweep_once(&self) -> Result<SweepReport, sqlx::Error> {
        let tasks = list_urgent_incomplete(&self.pool).await?;

        let sends = tasks.iter().map(|entry| async move {
            let notification = sweep_notification(entry);
            match self.notifier.send(&notification).await {
                Ok(()) => {
                    tracing::info!("Email sent for task \"{}\" ({})", entry.task.text, entry.task.id);
                    true
                }
                Err(e) => {
                    tracing::error!(
                        "Error sending email for task \"{}\" ({}): {}",
                        entry.task.text,
                        entry.task.id,
                        e
                    );
                    false
                }
            }
        });
        let results = join_all(sends).await;

        let sent = results.iter().filter(|ok| **ok).count();
        Ok(SweepReport {
            matched: tasks.len(),
            sent,
            failed: results.len() - sent,
        })
    }

    /// Start the sweep loop on the runtime
    ///
    /// The first sweep runs one interval after start. The loop ends when
    /// `stop` is called.
    pub fn spawn(&self) -> JoinHandle<()> {
        let sweep = self.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + sweep.interval, sweep.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!("Reminder sweep running every {:?}", sweep.interval);

            loop {
                tokio::select! {
                    _ = sweep.cancel.cancelled() => {
                        tracing::info!("Reminder sweep stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match sweep.sweep_once().await {
                            Ok(report) if report.matched > 0 => tracing::info!(
                                "Reminder sweep: {} urgent tasks, {} sent, {} failed",
                                report.matched,
                                report.sent,
                                report.failed
                            ),
                            Ok(_) => tracing::debug!("Reminder sweep: no urgent tasks"),
                            Err(e) => tracing::error!("Reminder sweep failed to list tasks: {}", e),
                        }
                    }
                }
            }
        })
    }

    /// Stop the sweep loop
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}
