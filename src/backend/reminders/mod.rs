//! Reminder Module
//!
//! Email reminders for urgent tasks. Two strategies exist and exactly one
//! runs per process, selected by `REMINDER_STRATEGY`:
//!
//! - **`scheduled`** (default) - one job per urgent task with a due time,
//!   firing a lead interval before the next occurrence of that time. Jobs
//!   are rebuilt from the database on startup.
//! - **`sweep`** - every interval, remind about every urgent incomplete
//!   task. Repeats until the task is done.
//!
//! # Module Structure
//!
//! ```text
//! reminders/
//! ├── mod.rs       - Strategy selection and the `Reminders` facade
//! ├── timing.rs    - Next-occurrence and fire-time arithmetic
//! ├── scheduler.rs - Job registry and timers
//! ├── guard.rs     - Fire-time re-validation and delivery
//! ├── recovery.rs  - Startup re-arming
//! ├── sweep.rs     - Periodic sweep strategy
//! └── notifier.rs  - Email delivery
//! ```
//!
//! Reminder failures never reach the HTTP layer. They are logged with the
//! task ID and the job is dropped.

pub mod timing;
pub mod notifier;
pub mod scheduler;
pub mod guard;
pub mod recovery;
pub mod sweep;

use std::str::FromStr;
use std::sync::Arc;

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::backend::server::config::ServerConfig;

pub use guard::{execute_reminder, ReminderOutcome};
pub use notifier::{LogNotifier, Notification, Notifier, NotifyError, SmtpNotifier};
pub use recovery::{restore_reminders, RecoveryReport};
pub use scheduler::{Clock, ReminderJob, ReminderScheduler, ScheduleOutcome, TaskSnapshot};
pub use sweep::{ReminderSweep, SweepReport};

/// Which reminder strategy the process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderStrategy {
    Scheduled,
    Sweep,
}

impl FromStr for ReminderStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" | "per-task" => Ok(Self::Scheduled),
            "sweep" => Ok(Self::Sweep),
            other => Err(format!("unknown reminder strategy: {}", other)),
        }
    }
}

/// The active reminder strategy, as seen by request handlers
#[derive(Clone)]
pub enum Reminders {
    Scheduled(ReminderScheduler),
    Sweep(ReminderSweep),
}

impl Reminders {
    /// Build the strategy selected in `config`
    pub fn from_config(config: &ServerConfig, pool: SqlitePool, notifier: Arc<dyn Notifier>) -> Self {
        match config.reminder_strategy {
            ReminderStrategy::Scheduled => Self::Scheduled(ReminderScheduler::new(
                pool,
                notifier,
                config.reminder_lead,
            )),
            ReminderStrategy::Sweep => {
                Self::Sweep(ReminderSweep::new(pool, notifier, config.sweep_interval))
            }
        }
    }

    /// Start background work: recovery for `scheduled`, the loop for `sweep`
    ///
    /// A failed recovery is logged; the server keeps running and new tasks
    /// are still scheduled.
    pub async fn start(&self) {
        match self {
            Self::Scheduled(scheduler) => {
                if let Err(e) = restore_reminders(scheduler).await {
                    tracing::error!("Failed to restore reminders: {}", e);
                }
            }
            Self::Sweep(sweep) => {
                sweep.spawn();
            }
        }
    }

    /// A task was created or its state changed
    pub async fn task_saved(&self, task: &TaskSnapshot) {
        if let Self::Scheduled(scheduler) = self {
            scheduler.task_saved(task).await;
        }
    }

    /// A task was deleted
    pub fn task_removed(&self, task_id: Uuid) {
        if let Self::Scheduled(scheduler) = self {
            scheduler.cancel(task_id);
        }
    }

    /// Stop all reminder activity
    pub fn shutdown(&self) {
        match self {
            Self::Scheduled(scheduler) => scheduler.shutdown(),
            Self::Sweep(sweep) => sweep.stop(),
        }
    }

    /// The per-task scheduler, if that strategy is active
    pub fn scheduler(&self) -> Option<&ReminderScheduler> {
        match self {
            Self::Scheduled(scheduler) => Some(scheduler),
            Self::Sweep(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("scheduled".parse(), Ok(ReminderStrategy::Scheduled));
        assert_eq!(" Sweep ".parse(), Ok(ReminderStrategy::Sweep));
        assert!("hourly".parse::<ReminderStrategy>().is_err());
    }
}
