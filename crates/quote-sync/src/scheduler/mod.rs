//! Scheduler Module
//!
//! Periodic background jobs with explicit cancellation. Every spawned task
//! is tracked by id so a caller can stop one task, or all of them, without
//! holding on to the handle.

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

/// Shortest accepted period
pub const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Identifier of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(Uuid);

impl TaskId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A running task as seen by [`TaskScheduler::active`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    /// Task id
    pub id: TaskId,
    /// Name given at spawn time
    pub name: String,
    /// Period between runs
    pub period: Duration,
}

#[derive(Debug)]
struct TaskEntry {
    name: String,
    period: Duration,
    cancel: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

type TaskTable = Arc<Mutex<HashMap<TaskId, TaskEntry>>>;

/// Handle to one periodic task
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    name: String,
    tasks: TaskTable,
}

impl TaskHandle {
    /// Task id
    #[inline]
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Task name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the task is still scheduled
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tasks
            .lock()
            .get(&self.id)
            .is_some_and(|entry| !entry.join.is_finished())
    }

    /// Stop the task; returns `false` if it was already stopped
    ///
    /// A run in progress finishes; no further runs start.
    pub fn cancel(&self) -> bool {
        cancel_entry(&self.tasks, self.id)
    }
}

fn cancel_entry(tasks: &TaskTable, id: TaskId) -> bool {
    let Some(entry) = tasks.lock().remove(&id) else {
        return false;
    };
    tracing::debug!(task = %entry.name, %id, "cancelling periodic task");
    // The receiver is gone only if the task already exited.
    let _ = entry.cancel.send(());
    true
}

/// Owner of periodic background tasks
///
/// Cheap to clone; clones share the task table.
#[derive(Debug, Clone, Default)]
pub struct TaskScheduler {
    tasks: TaskTable,
}

impl TaskScheduler {
    /// Empty scheduler
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` every `period`, first run one period from now
    ///
    /// Runs never overlap: a slow run delays the next tick. Periods below
    /// [`MIN_PERIOD`] are raised to it.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime.
    pub fn spawn_periodic<F, Fut>(
        &self,
        name: impl Into<String>,
        period: Duration,
        mut job: F,
    ) -> TaskHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let boxed: Box<dyn FnMut() -> BoxFuture<'static, ()> + Send> =
            Box::new(move || job().boxed());
        self.spawn_boxed(name.into(), period.max(MIN_PERIOD), boxed)
    }

    fn spawn_boxed(
        &self,
        name: String,
        period: Duration,
        mut job: Box<dyn FnMut() -> BoxFuture<'static, ()> + Send>,
    ) -> TaskHandle {
        let id = TaskId::new();
        let (cancel, mut cancelled) = oneshot::channel::<()>();
        let task_name = name.clone();

        let join = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancelled => break,
                    _ = ticks.tick() => job().await,
                }
            }
            tracing::debug!(task = %task_name, "periodic task stopped");
        });

        self.tasks.lock().insert(
            id,
            TaskEntry {
                name: name.clone(),
                period,
                cancel,
                join,
            },
        );
        tracing::debug!(task = %name, %id, period_ms = period.as_millis(), "periodic task scheduled");

        TaskHandle {
            id,
            name,
            tasks: Arc::clone(&self.tasks),
        }
    }

    /// Stop one task by id
    pub fn cancel(&self, id: TaskId) -> bool {
        cancel_entry(&self.tasks, id)
    }

    /// Stop every task, returning how many were stopped
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<TaskId> = self.tasks.lock().keys().copied().collect();
        ids.into_iter()
            .filter(|id| cancel_entry(&self.tasks, *id))
            .count()
    }

    /// Tasks still scheduled
    #[must_use]
    pub fn active(&self) -> Vec<TaskInfo> {
        let mut tasks: Vec<TaskInfo> = self
            .tasks
            .lock()
            .iter()
            .filter(|(_, entry)| !entry.join.is_finished())
            .map(|(id, entry)| TaskInfo {
                id: *id,
                name: entry.name.clone(),
                period: entry.period,
            })
            .collect();
        tasks.sort_by(|a, b| a.name.cmp(&b.name));
        tasks
    }

    /// Number of scheduled tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Whether nothing is scheduled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_job(counter: &Arc<AtomicUsize>) -> impl FnMut() -> futures::future::Ready<()> + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            futures::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_every_period() {
        let scheduler = TaskScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let _handle = scheduler.spawn_periodic("tick", Duration::from_secs(10), counting_job(&runs));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_runs() {
        let scheduler = TaskScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let handle = scheduler.spawn_periodic("tick", Duration::from_secs(10), counting_job(&runs));

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(!handle.is_active());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(scheduler.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_stops_every_task() {
        let scheduler = TaskScheduler::new();
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        scheduler.spawn_periodic("a", Duration::from_secs(10), counting_job(&a));
        scheduler.spawn_periodic("b", Duration::from_secs(20), counting_job(&b));

        let names: Vec<String> = scheduler.active().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);

        assert_eq!(scheduler.cancel_all(), 2);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(a.load(Ordering::SeqCst), 0);
        assert_eq!(b.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_by_id_leaves_others() {
        let scheduler = TaskScheduler::new();
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let first = scheduler.spawn_periodic("a", Duration::from_secs(10), counting_job(&a));
        scheduler.spawn_periodic("b", Duration::from_secs(10), counting_job(&b));

        assert!(scheduler.cancel(first.id()));
        tokio::time::sleep(Duration::from_secs(25)).await;

        assert_eq!(a.load(Ordering::SeqCst), 0);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tiny_period_is_clamped() {
        let scheduler = TaskScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        scheduler.spawn_periodic("fast", Duration::ZERO, counting_job(&runs));

        assert_eq!(scheduler.active()[0].period, MIN_PERIOD);
        scheduler.cancel_all();
    }
}
