#![crate_name = "tinybeam"]
#![deny(clippy::all)]
#![allow(clippy::new_ret_no_self)]

//! A lightweight stateful actor runtime for resource-constrained hosts.
//!
//! An actor owns private state, receives messages one at a time, and
//! emits a new state plus a reply on each receipt. Many actors share a
//! small pool of worker threads via a preemptive, reduction-counted,
//! work-stealing [`Scheduler`] modeled after Erlang's BEAM.
//!
//! This crate is exactly that scheduler and the actor-execution contract
//! it drives — the work-stealing queues, the reduction accounting that
//! preempts long-running actors, the suspend/resume lifecycle of an
//! [`ActorExecutor`], the [`Mailbox`] dequeue contract, and the fairness
//! guarantees between them. Persistence, wire transport, message
//! serialization, supervision/restart trees, clustering and actor naming
//! policy are all external collaborators this crate does not implement.

pub mod actor;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod mailbox;
pub mod scheduler;
mod worker;

pub mod actors {
    pub use crate::actor::Actor;
    pub use crate::config::SchedulerConfig;
    pub use crate::error::TinybeamError;
    pub use crate::executor::{ActorExecutor, ScheduledExecutor, SharedExecutor};
    pub use crate::logging::default_log;
    pub use crate::mailbox::Mailbox;
    pub use crate::scheduler::{Scheduler, WorkerStats};
}

pub use actors::*;
