use std::sync::Arc;
use std::time::Duration;

use slog::trace;

use crate::scheduler::Scheduler;

/// A long-running loop that drains one of the scheduler's queues, runs
/// episodes, and steals when idle (component **C3**).
///
/// Each worker owns a `worker_id` in `[0, num_workers)` and repeats:
/// pop local queue → steal from another queue → sleep ~10ms → repeat,
/// dispatching `Scheduler::process_actor` whenever it finds an executor.
/// The 10ms sleep on a doubly-empty poll is a deliberate trade: a raw spin
/// loop would burn a core per idle worker, and on the resource-constrained
/// hosts this runtime targets that's not acceptable.
pub(crate) struct Worker {
    worker_id: usize,
    scheduler: Arc<Scheduler>,
}

const IDLE_SLEEP: Duration = Duration::from_millis(10);

impl Worker {
    pub fn new(worker_id: usize, scheduler: Arc<Scheduler>) -> Self {
        Worker {
            worker_id,
            scheduler,
        }
    }

    pub fn run(&self) {
        loop {
            match self.scheduler.pop_local(self.worker_id) {
                Some(executor) => {
                    self.scheduler.process_actor(&executor);
                }
                None => match self.scheduler.steal_work(self.worker_id) {
                    Some(executor) => {
                        self.scheduler.process_actor(&executor);
                    }
                    None => {
                        if self.scheduler.is_stopping() {
                            trace!(self.scheduler.log(), "worker draining, stopping";
                                "worker_id" => self.worker_id);
                            break;
                        }
                        std::thread::sleep(IDLE_SLEEP);
                    }
                },
            }
        }
    }
}
