//! Startup recovery of scheduled reminders
//!
//! Armed jobs live only in memory. On boot the pending set is rebuilt from
//! the task table: every urgent, incomplete task with a due time is
//! scheduled again exactly as if it had just been created.

use crate::backend::reminders::scheduler::{ReminderScheduler, ScheduleOutcome, TaskSnapshot};
use crate::backend::tasks::db::list_pending_reminders;

/// Counts from a recovery pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    pub armed: usize,
    pub skipped: usize,
    pub not_eligible: usize,
}

/// Re-arm reminders for every pending task in the store
///
/// # Errors
///
/// Returns the store error if the pending tasks cannot be listed. Nothing
/// is armed in that case.
pub async fn restore_reminders(scheduler: &ReminderScheduler) -> Result<RecoveryReport, sqlx::Error> {
    let pending = list_pending_reminders(scheduler.pool()).await?;
    tracing::info!("Restoring reminders for {} pending tasks", pending.len());

    let mut report = RecoveryReport::default();
    for entry in pending {
        let snapshot = TaskSnapshot::from_task(&entry.task, entry.email);
        match scheduler.schedule(&snapshot) {
            ScheduleOutcome::Armed { .. } => report.armed += 1,
            ScheduleOutcome::Skipped { .. } => report.skipped += 1,
            ScheduleOutcome::NotEligible => report.not_eligible += 1,
            ScheduleOutcome::Stopped => {
                tracing::info!("Scheduler stopped during recovery");
                break;
            }
        }
    }

    tracing::info!(
        "Reminder recovery complete: {} armed, {} skipped, {} not eligible",
        report.armed,
        report.skipped,
        report.not_eligible
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::create_user;
    use crate::backend::reminders::notifier::LogNotifier;
    use crate::backend::reminders::scheduler::Clock;
    use crate::backend::server::config::load_database;
    use crate::backend::tasks::db::{create_task, set_task_completed};
    use crate::shared::NewTask;
    use chrono::NaiveDate;
    use sqlx::SqlitePool;
    use std::sync::Arc;
    use std::time::Duration;

    fn clock_at(h: u32, m: u32) -> Clock {
        let now = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap();
        Arc::new(move || now)
    }

    async fn seed(
        pool: &SqlitePool,
        rows: &[(&str, bool, Option<&str>)],
    ) -> (uuid::Uuid, Vec<uuid::Uuid>) {
        let user = create_user(pool, "owner@example.com".to_string(), "hash".to_string())
            .await
            .unwrap();
        let mut ids = Vec::new();
        for (text, urgent, due) in rows {
            let task = create_task(
                pool,
                user.id,
                NewTask {
                    text: text.to_string(),
                    urgent: *urgent,
                    due_time: due.map(str::to_string),
                },
            )
            .await
            .unwrap();
            ids.push(task.id);
        }
        (user.id, ids)
    }

    #[tokio::test]
    async fn test_restores_only_pending_tasks() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        let (user_id, ids) = seed(
            &pool,
            &[
                ("a", true, Some("10:00")),
                ("b", true, Some("18:30")),
                ("c", true, Some("07:00")),
                ("no due", true, None),
                ("relaxed", false, Some("10:00")),
                ("done", true, Some("11:00")),
            ],
        )
        .await;
        set_task_completed(&pool, ids[5], user_id, true).await.unwrap();

        let scheduler = ReminderScheduler::with_clock(
            pool,
            Arc::new(LogNotifier),
            Duration::from_secs(300),
            clock_at(9, 0),
        );
        let report = restore_reminders(&scheduler).await.unwrap();

        assert_eq!(report, RecoveryReport { armed: 3, skipped: 0, not_eligible: 0 });
        assert_eq!(scheduler.pending_count(), 3);
        for id in &ids[..3] {
            assert!(scheduler.is_pending(*id));
        }
        scheduler.shutdown();
    }

    #[tokio::test]
    async fn test_counts_skipped_inside_lead_window() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        seed(&pool, &[("soon", true, Some("09:02")), ("later", true, Some("12:00"))]).await;

        let scheduler = ReminderScheduler::with_clock(
            pool,
            Arc::new(LogNotifier),
            Duration::from_secs(300),
            clock_at(9, 0),
        );
        let report = restore_reminders(&scheduler).await.unwrap();

        assert_eq!(report.armed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(scheduler.pending_count(), 1);
        scheduler.shutdown();
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let pool = load_database("sqlite::memory:").await.unwrap();
        pool.close().await;
        let scheduler = ReminderScheduler::with_clock(
            pool,
            Arc::new(LogNotifier),
            Duration::from_secs(300),
            clock_at(9, 0),
        );

        assert!(restore_reminders(&scheduler).await.is_err());
        assert_eq!(scheduler.pending_count(), 0);
    }
}
