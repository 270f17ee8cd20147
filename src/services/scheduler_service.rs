use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::{
    errors::{AppError, AppResult},
    models::dto::response::{JobStatusDto, SchedulerStatusDto},
    services::scheduled_jobs::{JobContext, JobKind, JobOutcome},
};

/// In-memory bookkeeping for one job. Lost on restart.
#[derive(Debug, Clone, Default)]
pub struct JobState {
    pub running: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub last_outcome: Option<String>,
    pub last_error: Option<String>,
    pub next_run: Option<DateTime<Utc>>,
    pub run_count: u32,
    pub failure_count: u32,
}

struct SchedulerInner {
    context: JobContext,
    retry_delay: Duration,
    jobs: RwLock<HashMap<JobKind, JobState>>,
}

/// Runs the daily batch jobs on their campus wall-clock times. Single
/// process only; a manual run may overlap a scheduled one.
pub struct SchedulerService {
    inner: Arc<SchedulerInner>,
    handles: RwLock<Vec<JoinHandle<()>>>,
}

impl SchedulerService {
    pub fn new(context: JobContext, retry_delay: Duration) -> Self {
        let jobs = JobKind::ALL
            .into_iter()
            .map(|kind| (kind, JobState::default()))
            .collect();

        Self {
            inner: Arc::new(SchedulerInner {
                context,
                retry_delay,
                jobs: RwLock::new(jobs),
            }),
            handles: RwLock::new(Vec::new()),
        }
    }

    /// Spawns one timer task per job. Returns false if already running.
    pub async fn start(&self) -> bool {
        let mut handles = self.handles.write().await;
        if !handles.is_empty() {
            return false;
        }

        for kind in JobKind::ALL {
            let inner = Arc::clone(&self.inner);
            handles.push(tokio::spawn(async move {
                loop {
                    let now = Utc::now();
                    let next = inner.context.clock.next_daily_run(now, kind.runs_at());
                    inner.update(kind, |state| state.next_run = Some(next)).await;

                    let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
                    tokio::time::sleep(wait).await;

                    // the outcome is already logged and recorded
                    let _ = inner.run_with_retry(kind).await;
                }
            }));
        }

        log::info!("Scheduler started with {} jobs", handles.len());
        true
    }

    /// Aborts the timer tasks. Returns false if nothing was running.
    pub async fn stop(&self) -> bool {
        let mut handles = self.handles.write().await;
        if handles.is_empty() {
            return false;
        }

        for handle in handles.drain(..) {
            handle.abort();
        }
        // an aborted task never reaches the end of run_once
        for state in self.inner.jobs.write().await.values_mut() {
            state.running = false;
            state.next_run = None;
        }

        log::info!("Scheduler stopped");
        true
    }

    pub async fn is_active(&self) -> bool {
        !self.handles.read().await.is_empty()
    }

    /// Runs a job once, right away, without the retry.
    pub async fn run_now(&self, name: &str) -> AppResult<JobOutcome> {
        let kind = JobKind::from_name(name)
            .ok_or_else(|| AppError::NotFound(format!("Scheduled job '{}' not found", name)))?;
        self.inner.run_once(kind).await
    }

    pub async fn run_with_retry(&self, kind: JobKind) -> AppResult<JobOutcome> {
        self.inner.run_with_retry(kind).await
    }

    pub async fn job_state(&self, kind: JobKind) -> JobState {
        self.inner.jobs.read().await.get(&kind).cloned().unwrap_or_default()
    }

    pub async fn status(&self) -> SchedulerStatusDto {
        let jobs = self.inner.jobs.read().await;
        let jobs = JobKind::ALL
            .into_iter()
            .map(|kind| {
                let state = jobs.get(&kind).cloned().unwrap_or_default();
                JobStatusDto {
                    name: kind.name().to_string(),
                    runs_at: kind.runs_at().format("%H:%M").to_string(),
                    running: state.running,
                    last_run: state.last_run,
                    last_outcome: state.last_outcome,
                    last_error: state.last_error,
                    next_run: state.next_run,
                    run_count: state.run_count,
                    failure_count: state.failure_count,
                }
            })
            .collect();

        SchedulerStatusDto {
            active: self.is_active().await,
            jobs,
        }
    }
}

impl SchedulerInner {
    async fn update(&self, kind: JobKind, apply: impl FnOnce(&mut JobState)) {
        let mut jobs = self.jobs.write().await;
        apply(jobs.entry(kind).or_default());
    }

    async fn run_once(&self, kind: JobKind) -> AppResult<JobOutcome> {
        self.update(kind, |state| state.running = true).await;

        let started = Utc::now();
        let result = kind.execute(&self.context, started).await;

        self.update(kind, |state| {
            state.running = false;
            state.last_run = Some(started);
            state.run_count += 1;
            match &result {
                Ok(outcome) => {
                    state.last_outcome = Some(outcome.summary.clone());
                    state.last_error = None;
                }
                Err(err) => {
                    state.failure_count += 1;
                    state.last_error = Some(err.to_string());
                }
            }
        })
        .await;

        match &result {
            Ok(outcome) => log::info!("Job {} finished: {}", kind, outcome.summary),
            Err(err) => log::error!("Job {} failed: {}", kind, err),
        }
        result
    }

    async fn run_with_retry(&self, kind: JobKind) -> AppResult<JobOutcome> {
        match self.run_once(kind).await {
            Ok(outcome) => Ok(outcome),
            Err(_) => {
                log::warn!("Retrying job {} in {:?}", kind, self.retry_delay);
                tokio::time::sleep(self.retry_delay).await;

                self.run_once(kind).await.inspect_err(|_| {
                    log::error!("Job {} failed after retry, giving up until the next run", kind);
                })
            }
        }
    }
}
