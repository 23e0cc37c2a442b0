/**
 * Reminder Scheduler
 *
 * Owns the registry of armed reminder jobs. For each reminder-eligible
 * task the scheduler works out the next occurrence of its due time,
 * subtracts the lead interval, and spawns a Tokio task that sleeps until
 * that instant and then hands the job to the execution guard.
 *
 * # Registry
 *
 * The registry maps task ID to the job currently armed for it. Each entry
 * carries a generation number and a cancellation token:
 * - scheduling a task that already has a job cancels the old one and
 *   installs the new one, so a task never has two live jobs
 * - a job that fires removes its entry only if the generation still
 *   matches, so it cannot evict its own replacement
 * - `cancel` removes the entry and trips the token, stopping the sleep
 *
 * Cancellation is an optimisation. The guard re-reads the task at fire
 * time, so a job that slips past a cancel still sends nothing for a
 * completed or deleted task.
 *
 * # Saves
 *
 * Handlers report writes with `task_saved` after the store is updated, but
 * two writes to one task can report in either order. `task_saved` is
 * serialised and acts on the stored row rather than the caller's snapshot,
 * so the last report always reflects the last write.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::backend::reminders::guard::execute_reminder;
use crate::backend::reminders::notifier::Notifier;
use crate::backend::reminders::timing::{delay_until, plan_fire, FirePlan};
use crate::backend::tasks::db::get_task_by_id;
use crate::shared::task::{parse_due_time, Task};

/// Source of the current local wall-clock time
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// The system clock in local time
pub fn system_clock() -> Clock {
    Arc::new(|| Local::now().naive_local())
}

/// Everything the scheduler needs to know about a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub task_id: Uuid,
    pub user_id: Uuid,
    /// Owner's email address
    pub recipient: String,
    pub text: String,
    pub urgent: bool,
    pub completed: bool,
    pub due_time: Option<String>,
}

impl TaskSnapshot {
    pub fn from_task(task: &Task, recipient: impl Into<String>) -> Self {
        Self {
            task_id: task.id,
            user_id: task.user_id,
            recipient: recipient.into(),
            text: task.text.clone(),
            urgent: task.urgent,
            completed: task.completed,
            due_time: task.due_time.clone(),
        }
    }
}

/// An armed, not-yet-fired reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderJob {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub recipient: String,
    pub text: String,
    pub due_time: NaiveTime,
    pub fire_at: NaiveDateTime,
}

/// Result of a scheduling request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// A job is armed and will fire at the given local time
    Armed { fire_at: NaiveDateTime },
    /// The fire instant had already passed; nothing was armed
    Skipped { fire_at: NaiveDateTime },
    /// Not urgent, completed, or without a usable due time
    NotEligible,
    /// The scheduler has been shut down
    Stopped,
}

struct JobEntry {
    generation: u64,
    fire_at: NaiveDateTime,
    cancel: CancellationToken,
}

struct SchedulerInner {
    pool: SqlitePool,
    notifier: Arc<dyn Notifier>,
    lead: TimeDelta,
    clock: Clock,
    jobs: Mutex<HashMap<Uuid, JobEntry>>,
    next_generation: AtomicU64,
    shutdown: CancellationToken,
    saves: tokio::sync::Mutex<()>,
}

/// Per-task reminder scheduler
///
/// Cheap to clone; all clones share one registry.
#[derive(Clone)]
pub struct ReminderScheduler {
    inner: Arc<SchedulerInner>,
}

impl ReminderScheduler {
    /// Create a scheduler using the system clock
    pub fn new(pool: SqlitePool, notifier: Arc<dyn Notifier>, lead: Duration) -> Self {
        Self::with_clock(pool, notifier, lead, system_clock())
    }

    /// Create a scheduler with an explicit clock
    pub fn with_clock(
        pool: SqlitePool,
        notifier: Arc<dyn Notifier>,
        lead: Duration,
        clock: Clock,
    ) -> Self {
        let lead = TimeDelta::from_std(lead).unwrap_or_else(|_| {
            tracing::warn!("Reminder lead {:?} out of range, using 5 minutes", lead);
            TimeDelta::minutes(5)
        });

        Self {
            inner: Arc::new(SchedulerInner {
                pool,
                notifier,
                lead,
                clock,
                jobs: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
                shutdown: CancellationToken::new(),
                saves: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Database pool used by the execution guard
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    fn jobs(&self) -> MutexGuard<'_, HashMap<Uuid, JobEntry>> {
        self.inner.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm a reminder for `task`, replacing any job already armed for it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, task: &TaskSnapshot) -> ScheduleOutcome {
        if self.inner.shutdown.is_cancelled() {
            tracing::debug!("Scheduler stopped, not arming task {}", task.task_id);
            return ScheduleOutcome::Stopped;
        }
        if !task.urgent {
            tracing::debug!("Task {} is not urgent, no reminder", task.task_id);
            return ScheduleOutcome::NotEligible;
        }
        if task.completed {
            tracing::debug!("Task {} is completed, no reminder", task.task_id);
            return ScheduleOutcome::NotEligible;
        }
        let Some(raw_due) = task.due_time.as_deref() else {
            tracing::debug!("Task {} has no due time, no reminder", task.task_id);
            return ScheduleOutcome::NotEligible;
        };
        let Some(due_time) = parse_due_time(raw_due) else {
            tracing::debug!("Task {} has malformed due time {:?}, no reminder", task.task_id, raw_due);
            return ScheduleOutcome::NotEligible;
        };

        let now = (self.inner.clock)();
        let fire_at = match plan_fire(due_time, now, self.inner.lead) {
            FirePlan::At(fire_at) => fire_at,
            FirePlan::Elapsed(fire_at) => {
                tracing::info!(
                    "Skipping reminder for task {}: fire time {} already passed (now {})",
                    task.task_id,
                    fire_at,
                    now
                );
                return ScheduleOutcome::Skipped { fire_at };
            }
        };

        let job = ReminderJob {
            task_id: task.task_id,
            user_id: task.user_id,
            recipient: task.recipient.clone(),
            text: task.text.clone(),
            due_time,
            fire_at,
        };
        let delay = delay_until(fire_at, now);
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = self.inner.shutdown.child_token();

        // Hold the registry lock across the spawn so a zero-delay job cannot
        // finish before its entry exists.
        let mut jobs = self.jobs();
        let previous = jobs.insert(
            task.task_id,
            JobEntry {
                generation,
                fire_at,
                cancel: cancel.clone(),
            },
        );
        if let Some(previous) = previous {
            previous.cancel.cancel();
            tracing::debug!("Replaced reminder for task {} (was {})", task.task_id, previous.fire_at);
        }

        let scheduler = self.clone();
        tokio::spawn(async move {
            scheduler.run_job(job, generation, delay, cancel).await;
        });
        drop(jobs);

        tracing::info!("Reminder for task {} armed for {}", task.task_id, fire_at);
        ScheduleOutcome::Armed { fire_at }
    }

    /// React to a created or updated task
    ///
    /// The task is re-read from the store. Eligible tasks are (re)scheduled;
    /// completed, ineligible or deleted ones lose their pending job. If the
    /// store cannot be read, `task` is only used to arm, never to cancel.
    pub async fn task_saved(&self, task: &TaskSnapshot) -> ScheduleOutcome {
        let _serial = self.inner.saves.lock().await;

        let current = match get_task_by_id(&self.inner.pool, task.task_id).await {
            Ok(Some(stored)) => TaskSnapshot::from_task(&stored, task.recipient.clone()),
            Ok(None) => {
                self.cancel(task.task_id);
                return ScheduleOutcome::NotEligible;
            }
            Err(e) => {
                tracing::warn!("Could not re-read task {}: {}", task.task_id, e);
                return self.schedule(task);
            }
        };

        let outcome = self.schedule(&current);
        if outcome == ScheduleOutcome::NotEligible {
            self.cancel(task.task_id);
        }
        outcome
    }

    /// Cancel the job armed for `task_id`
    ///
    /// Returns `true` if a job was pending.
    pub fn cancel(&self, task_id: Uuid) -> bool {
        match self.jobs().remove(&task_id) {
            Some(entry) => {
                entry.cancel.cancel();
                tracing::debug!("Cancelled reminder for task {}", task_id);
                true
            }
            None => false,
        }
    }

    /// Number of armed jobs
    pub fn pending_count(&self) -> usize {
        self.jobs().len()
    }

    /// Whether a job is armed for `task_id`
    pub fn is_pending(&self, task_id: Uuid) -> bool {
        self.jobs().contains_key(&task_id)
    }

    /// Fire instant of the job armed for `task_id`
    pub fn scheduled_fire_at(&self, task_id: Uuid) -> Option<NaiveDateTime> {
        self.jobs().get(&task_id).map(|entry| entry.fire_at)
    }

    /// Cancel every armed job
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.jobs().clear();
        tracing::info!("Reminder scheduler stopped");
    }

    async fn run_job(
        &self,
        job: ReminderJob,
        generation: u64,
        delay: Duration,
        cancel: CancellationToken,
    ) {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Reminder job for task {} cancelled before firing", job.task_id);
                return;
            }
            _ = tokio::time::sleep(delay) => {}
        }

        {
            let mut jobs = self.jobs();
            if jobs.get(&job.task_id).map(|e| e.generation) == Some(generation) {
                jobs.remove(&job.task_id);
            }
        }

        let outcome = execute_reminder(&self.inner.pool, self.inner.notifier.as_ref(), &job).await;
        tracing::debug!("Reminder job for task {} finished: {:?}", job.task_id, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::users::create_user;
    use crate::backend::reminders::notifier::LogNotifier;
    use crate::backend::server::config::load_database;
    use crate::backend::tasks::db::{create_task, set_task_completed};
    use crate::shared::NewTask;
    use chrono::NaiveDate;

    fn fixed_clock(h: u32, m: u32) -> Clock {
        let now = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap();
        Arc::new(move || now)
    }

    async fn scheduler_at(h: u32, m: u32) -> ReminderScheduler {
        let pool = load_database("sqlite::memory:").await.unwrap();
        ReminderScheduler::with_clock(
            pool,
            Arc::new(LogNotifier),
            Duration::from_secs(300),
            fixed_clock(h, m),
        )
    }

    fn snapshot(urgent: bool, due_time: Option<&str>) -> TaskSnapshot {
        TaskSnapshot {
            task_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            recipient: "user@example.com".to_string(),
            text: "Pay bill".to_string(),
            urgent,
            completed: false,
            due_time: due_time.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_no_due_time_no_job() {
        let scheduler = scheduler_at(9, 0).await;
        let outcome = scheduler.schedule(&snapshot(true, None));
        assert_eq!(outcome, ScheduleOutcome::NotEligible);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_not_urgent_no_job() {
        let scheduler = scheduler_at(9, 0).await;
        let outcome = scheduler.schedule(&snapshot(false, Some("14:00")));
        assert_eq!(outcome, ScheduleOutcome::NotEligible);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_completed_or_malformed_no_job() {
        let scheduler = scheduler_at(9, 0).await;
        let mut done = snapshot(true, Some("14:00"));
        done.completed = true;
        assert_eq!(scheduler.schedule(&done), ScheduleOutcome::NotEligible);
        assert_eq!(
            scheduler.schedule(&snapshot(true, Some("2pm"))),
            ScheduleOutcome::NotEligible
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_passed_due_time_arms_for_tomorrow() {
        let scheduler = scheduler_at(14, 5).await;
        let task = snapshot(true, Some("14:00"));
        let outcome = scheduler.schedule(&task);

        let expected = NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_hms_opt(13, 55, 0)
            .unwrap();
        assert_eq!(outcome, ScheduleOutcome::Armed { fire_at: expected });
        assert_eq!(scheduler.scheduled_fire_at(task.task_id), Some(expected));
        scheduler.shutdown();
    }

    #[tokio::test]
    async fn test_elapsed_fire_time_is_skipped() {
        let scheduler = scheduler_at(23, 56).await;
        let outcome = scheduler.schedule(&snapshot(true, Some("23:59")));
        assert!(matches!(outcome, ScheduleOutcome::Skipped { .. }));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_reschedule_replaces_job() {
        let scheduler = scheduler_at(9, 0).await;
        let mut task = snapshot(true, Some("14:00"));
        scheduler.schedule(&task);
        task.due_time = Some("16:00".to_string());
        scheduler.schedule(&task);

        assert_eq!(scheduler.pending_count(), 1);
        let fire_at = scheduler.scheduled_fire_at(task.task_id).unwrap();
        assert_eq!(fire_at.time(), NaiveTime::from_hms_opt(15, 55, 0).unwrap());
        scheduler.shutdown();
    }

    async fn stored_task(scheduler: &ReminderScheduler) -> Task {
        let user = create_user(scheduler.pool(), "user@example.com".to_string(), "hash".to_string())
            .await
            .unwrap();
        create_task(
            scheduler.pool(),
            user.id,
            NewTask {
                text: "Pay bill".to_string(),
                urgent: true,
                due_time: Some("14:00".to_string()),
            },
        )
        .await
        .unwrap()
    }

    async fn set_completed(scheduler: &ReminderScheduler, task: &Task, completed: bool) -> TaskSnapshot {
        let updated = set_task_completed(scheduler.pool(), task.id, task.user_id, completed)
            .await
            .unwrap()
            .unwrap();
        TaskSnapshot::from_task(&updated, "user@example.com")
    }

    #[tokio::test]
    async fn test_task_saved_cancels_when_completed() {
        let scheduler = scheduler_at(9, 0).await;
        let task = stored_task(&scheduler).await;
        scheduler
            .task_saved(&TaskSnapshot::from_task(&task, "user@example.com"))
            .await;
        assert!(scheduler.is_pending(task.id));

        let done = set_completed(&scheduler, &task, true).await;
        assert_eq!(scheduler.task_saved(&done).await, ScheduleOutcome::NotEligible);
        assert!(!scheduler.is_pending(task.id));
    }

    #[tokio::test]
    async fn test_out_of_order_saves_keep_reopened_reminder() {
        let scheduler = scheduler_at(9, 0).await;
        let task = stored_task(&scheduler).await;

        // Complete then reopen; the reports arrive reopen first
        let completed = set_completed(&scheduler, &task, true).await;
        let reopened = set_completed(&scheduler, &task, false).await;

        assert!(matches!(
            scheduler.task_saved(&reopened).await,
            ScheduleOutcome::Armed { .. }
        ));
        assert!(matches!(
            scheduler.task_saved(&completed).await,
            ScheduleOutcome::Armed { .. }
        ));
        assert!(scheduler.is_pending(task.id));
        scheduler.shutdown();
    }

    #[tokio::test]
    async fn test_out_of_order_saves_do_not_arm_completed_task() {
        let scheduler = scheduler_at(9, 0).await;
        let task = stored_task(&scheduler).await;

        // Reopen then complete; the reports arrive complete first
        let reopened = set_completed(&scheduler, &task, false).await;
        let completed = set_completed(&scheduler, &task, true).await;

        assert_eq!(scheduler.task_saved(&completed).await, ScheduleOutcome::NotEligible);
        assert_eq!(scheduler.task_saved(&reopened).await, ScheduleOutcome::NotEligible);
        assert!(!scheduler.is_pending(task.id));
    }

    #[tokio::test]
    async fn test_task_saved_for_deleted_task_cancels() {
        let scheduler = scheduler_at(9, 0).await;
        let task = snapshot(true, Some("14:00"));
        scheduler.schedule(&task);
        assert!(scheduler.is_pending(task.task_id));

        assert_eq!(scheduler.task_saved(&task).await, ScheduleOutcome::NotEligible);
        assert!(!scheduler.is_pending(task.task_id));
    }

    #[tokio::test]
    async fn test_schedule_after_shutdown_is_refused() {
        let scheduler = scheduler_at(9, 0).await;
        scheduler.shutdown();

        let task = snapshot(true, Some("14:00"));
        assert_eq!(scheduler.schedule(&task), ScheduleOutcome::Stopped);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel() {
        let scheduler = scheduler_at(9, 0).await;
        let task = snapshot(true, Some("14:00"));
        scheduler.schedule(&task);

        assert!(scheduler.cancel(task.task_id));
        assert!(!scheduler.cancel(task.task_id));
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_clears_registry() {
        let scheduler = scheduler_at(9, 0).await;
        scheduler.schedule(&snapshot(true, Some("14:00")));
        scheduler.schedule(&snapshot(true, Some("15:00")));
        assert_eq!(scheduler.pending_count(), 2);

        scheduler.shutdown();
        assert_eq!(scheduler.pending_count(), 0);
    }
}
