use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use rand::Rng;
use slog::{debug, warn, Logger};

use crate::config::SchedulerConfig;
use crate::executor::SharedExecutor;
use crate::logging::default_log;
use crate::worker::Worker;

/// A single worker's queue of runnable executors.
///
/// A `parking_lot::Mutex<VecDeque<_>>` rather than a lock-free structure
/// (e.g. `crossbeam-deque`, the shape used by the work-stealing scheduler
/// in the retrieved `revskill10-ream` runtime) because `remove_actor` and
/// `clean_all_worker_queues` both need to walk and mutate arbitrary queue
/// positions, which a `Stealer`/`Worker` pair does not expose. Spec §5
/// calls this acceptable ("fine-grained" suffices; lock-free is not
/// required), and §9 explicitly says not to introduce more machinery than
/// profiling demands.
type WorkerQueue = Mutex<std::collections::VecDeque<SharedExecutor>>;

/// Owns the worker queues, assigns executors on enqueue, coordinates
/// stealing, and enforces the reduction budget (component **C4**).
pub struct Scheduler {
    queues: Vec<WorkerQueue>,
    config: SchedulerConfig,
    log: Logger,
    accepting: AtomicBool,
    stopping: AtomicBool,
    handles: Mutex<Vec<JoinHandle<()>>>,
    local_pops: Vec<AtomicU64>,
    steals: Vec<AtomicU64>,
}

impl Scheduler {
    /// Constructs the queues and launches `num_workers` worker threads,
    /// exactly the spec §4.4 constructor signature with Rust's idiomatic
    /// `Option` standing in for the spec's default-valued parameters.
    pub fn new(
        max_reductions: u32,
        num_workers: Option<usize>,
        process_time_threshold_ms: Option<u64>,
        time_penalty_factor: Option<u32>,
        log: Option<Logger>,
    ) -> Arc<Scheduler> {
        let defaults = SchedulerConfig::default();
        let config = SchedulerConfig {
            max_reductions,
            num_workers: num_workers.unwrap_or(defaults.num_workers),
            process_time_threshold_ms: process_time_threshold_ms
                .unwrap_or(defaults.process_time_threshold_ms),
            time_penalty_factor: time_penalty_factor.unwrap_or(defaults.time_penalty_factor),
        };

        Self::with_config(config, log)
    }

    /// Same as `new`, but takes a pre-assembled [`SchedulerConfig`]
    /// (typically loaded via [`SchedulerConfig::load`]).
    pub fn with_config(config: SchedulerConfig, log: Option<Logger>) -> Arc<Scheduler> {
        let log = log.unwrap_or_else(default_log);
        let num_workers = config.num_workers.max(1);

        let queues = (0..num_workers).map(|_| Mutex::new(Default::default())).collect();
        let local_pops = (0..num_workers).map(|_| AtomicU64::new(0)).collect();
        let steals = (0..num_workers).map(|_| AtomicU64::new(0)).collect();

        let scheduler = Arc::new(Scheduler {
            queues,
            config,
            log,
            accepting: AtomicBool::new(true),
            stopping: AtomicBool::new(false),
            handles: Mutex::new(Vec::new()),
            local_pops,
            steals,
        });

        let mut handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let sched = Arc::clone(&scheduler);
            let handle = thread::Builder::new()
                .name(format!("tinybeam-worker-{}", worker_id))
                .spawn(move || Worker::new(worker_id, sched).run())
                .expect("failed to spawn tinybeam worker thread");
            handles.push(handle);
        }
        *scheduler.handles.lock() = handles;

        debug!(scheduler.log, "scheduler started"; "num_workers" => num_workers,
            "max_reductions" => scheduler.config.max_reductions);

        scheduler
    }

    pub fn num_workers(&self) -> usize {
        self.queues.len()
    }

    pub(crate) fn log(&self) -> &Logger {
        &self.log
    }

    pub(crate) fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    /// Resumes the executor and offers it to a uniformly-randomly chosen
    /// worker queue. Always succeeds (queues are unbounded) unless the
    /// scheduler has been asked to shut down, in which case the offer is
    /// silently dropped — the spec's SHOULD for shutdown ("stop accepting
    /// new enqueues") takes priority at that point.
    pub fn enqueue(&self, executor: SharedExecutor) {
        executor.resume_execution();

        if !self.accepting.load(Ordering::Acquire) {
            warn!(self.log, "enqueue rejected: scheduler is shutting down";
                "actor_id" => executor.id());
            return;
        }

        let idx = rand::thread_rng().gen_range(0..self.queues.len());
        self.queues[idx].lock().push_back(executor);
    }

    /// Places an executor directly on a specific worker queue, bypassing
    /// the random selection `enqueue` does. Exists for tests that need to
    /// force a starting distribution to observe stealing (spec §8 S4:
    /// "force RNG or inject") rather than for application use.
    pub fn enqueue_to(&self, worker_id: usize, executor: SharedExecutor) {
        executor.resume_execution();
        self.queues[worker_id].lock().push_back(executor);
    }

    /// Removes every queue entry whose executor id matches. Best-effort: an
    /// episode already in flight for that id is not aborted (§9 open
    /// question — a stricter implementation could consult an "alive" flag
    /// before re-enqueueing; this one treats the race as a benign leak that
    /// a later `remove_actor`/`clean_all_worker_queues` mops up).
    pub fn remove_actor(&self, id: &str) -> bool {
        let mut removed = false;

        for queue in &self.queues {
            let mut guard = queue.lock();
            let before = guard.len();
            guard.retain(|executor| executor.id() != id);
            if guard.len() != before {
                removed = true;
            }
        }

        if !removed {
            warn!(self.log, "remove_actor: no such actor queued"; "actor_id" => id.to_string());
        }

        removed
    }

    /// Drops every pending executor from every queue. In-flight episodes
    /// are left to finish; they simply won't be found here if they try to
    /// re-enqueue after this call (same benign-leak reasoning as
    /// `remove_actor`).
    pub fn clean_all_worker_queues(&self) {
        for queue in &self.queues {
            queue.lock().clear();
        }
    }

    /// Stops accepting new work and blocks until every worker has drained
    /// its queue and exited. In-flight episodes are allowed to finish but
    /// not aborted. Not in spec.md's explicit public contract; added per
    /// spec §5's SHOULD for scheduler shutdown.
    pub fn shutdown(&self) {
        self.accepting.store(false, Ordering::Release);
        self.stopping.store(true, Ordering::Release);

        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            let _ = handle.join();
        }

        debug!(self.log, "scheduler stopped");
    }

    pub(crate) fn pop_local(&self, worker_id: usize) -> Option<SharedExecutor> {
        let popped = self.queues[worker_id].lock().pop_front();
        if popped.is_some() {
            self.local_pops[worker_id].fetch_add(1, Ordering::Relaxed);
        }
        popped
    }

    /// Iterates queues in index order, skipping `worker_id`, and returns
    /// the first executor found. A linear scan is acceptable per §4.4:
    /// `num_workers` is tiny (CPU count), so no victim randomization or
    /// batch-stealing is needed.
    pub(crate) fn steal_work(&self, worker_id: usize) -> Option<SharedExecutor> {
        for (idx, queue) in self.queues.iter().enumerate() {
            if idx == worker_id {
                continue;
            }
            if let Some(executor) = queue.lock().pop_front() {
                self.steals[worker_id].fetch_add(1, Ordering::Relaxed);
                return Some(executor);
            }
        }
        None
    }

    /// Runs one episode for `executor`: dequeues and processes messages
    /// while active, non-empty, and under budget, charging reductions per
    /// message (surcharged for wall-clock-expensive ones), then re-enqueues
    /// iff work remains or the budget ran out.
    pub(crate) fn process_actor(&self, executor: &SharedExecutor) {
        // `enqueue` already calls `resume_execution`; calling it again here
        // is harmless given §8.7's idempotence guarantee (open question 3).
        executor.resume_execution();

        let mut reductions: u64 = 0;
        let max_reductions = self.config.max_reductions as u64;

        while executor.is_active() && executor.has_messages() && reductions < max_reductions {
            match executor.run_one() {
                Some(elapsed) => reductions += self.reduction_charge(elapsed),
                None => break,
            }
        }

        if executor.has_messages() || reductions >= max_reductions {
            executor.suspend_execution();
            self.enqueue(Arc::clone(executor));
        }
    }

    /// `1` reduction for a message processed within
    /// `process_time_threshold_ms`; otherwise
    /// `1 + floor(elapsed_ns / (threshold_ms * 1_000_000)) * time_penalty_factor`.
    fn reduction_charge(&self, elapsed: Duration) -> u64 {
        let threshold_ms = self.config.process_time_threshold_ms;

        if elapsed.as_millis() as u64 <= threshold_ms {
            return 1;
        }

        let threshold_ns = threshold_ms.saturating_mul(1_000_000).max(1);
        let elapsed_ns = elapsed.as_nanos() as u64;
        1 + (elapsed_ns / threshold_ns) * self.config.time_penalty_factor as u64
    }

    /// Poll-hit / steal-hit counters per worker, exposed read-only for
    /// tests that need to observe fairness (spec §8 scenario S4).
    pub fn worker_stats(&self, worker_id: usize) -> WorkerStats {
        WorkerStats {
            local_pops: self.local_pops[worker_id].load(Ordering::Relaxed),
            steals: self.steals[worker_id].load(Ordering::Relaxed),
        }
    }

    pub fn queue_len(&self, worker_id: usize) -> usize {
        self.queues[worker_id].lock().len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub local_pops: u64,
    pub steals: u64,
}
