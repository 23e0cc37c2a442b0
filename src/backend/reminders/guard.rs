//! Reminder execution guard
//!
//! Runs when a reminder job fires. The task is read back from the store
//! first; reminders for tasks that were deleted, completed or un-flagged
//! since scheduling are dropped. Nothing in here returns an error: every
//! failure is logged against the task ID and turned into an outcome.

use sqlx::SqlitePool;

use crate::backend::reminders::notifier::{Notification, Notifier};
use crate::backend::reminders::scheduler::ReminderJob;
use crate::backend::tasks::db::get_task_by_id;
use crate::shared::task::format_due_time;

/// Subject line of scheduled reminder emails
pub const REMINDER_SUBJECT: &str = "Urgent Task Reminder";

/// What happened when a job fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderOutcome {
    Sent,
    TaskGone,
    TaskCompleted,
    NoLongerUrgent,
    LookupFailed,
    DeliveryFailed,
}

/// Compose the email for a scheduled reminder
pub fn reminder_notification(job: &ReminderJob) -> Notification {
    Notification {
        to: job.recipient.clone(),
        subject: REMINDER_SUBJECT.to_string(),
        body: format!(
            "This is a reminder for your urgent task: \"{}\". It is due at {}.",
            job.text,
            format_due_time(job.due_time)
        ),
    }
}

/// Re-validate the task behind `job` and send its reminder
pub async fn execute_reminder(
    pool: &SqlitePool,
    notifier: &dyn Notifier,
    job: &ReminderJob,
) -> ReminderOutcome {
    let task = match get_task_by_id(pool, job.task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => {
            tracing::debug!("Task {} no longer exists, dropping reminder", job.task_id);
            return ReminderOutcome::TaskGone;
        }
        Err(e) => {
            tracing::error!("Failed to load task {} for reminder: {}", job.task_id, e);
            return ReminderOutcome::LookupFailed;
        }
    };

    if task.completed {
        tracing::debug!("Task {} already completed, dropping reminder", job.task_id);
        return ReminderOutcome::TaskCompleted;
    }
    if !task.urgent {
        tracing::debug!("Task {} is no longer urgent, dropping reminder", job.task_id);
        return ReminderOutcome::NoLongerUrgent;
    }

    let notification = reminder_notification(job);
    match notifier.send(&notification).await {
        Ok(()) => {
            tracing::info!("Reminder sent for task {} to {}", job.task_id, job.recipient);
            ReminderOutcome::Sent
        }
        Err(e) => {
            tracing::error!("Failed to send reminder for task {}: {}", job.task_id, e);
            ReminderOutcome::DeliveryFailed
        }
    }
}
