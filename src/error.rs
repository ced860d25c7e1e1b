use std::error::Error;
use std::fmt;

/// Errors raised while constructing or configuring a [`crate::scheduler::Scheduler`].
///
/// None of the four runtime error kinds described for the scheduler itself
/// (user handler fault, mailbox dequeue miss, unknown actor on
/// `remove_actor`, queue offer failure) produce a `TinybeamError` — those
/// are absorbed at the point they occur (logged, and otherwise harmless to
/// the caller) rather than surfaced as a `Result::Err`. This type exists
/// only for the one fallible construction-time path: loading and parsing a
/// `SchedulerConfig`.
#[derive(Debug)]
pub enum TinybeamError {
    Config(String),
}

impl Error for TinybeamError {}

impl fmt::Display for TinybeamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TinybeamError::Config(msg) => write!(f, "failed to load scheduler config: {}", msg),
        }
    }
}
