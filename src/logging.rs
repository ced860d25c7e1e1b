use slog::{o, Drain, Logger};

/// Builds the fallback logger used when a caller doesn't supply one to
/// `Scheduler::new`/`Scheduler::with_config`.
///
/// Mirrors the teacher's `ActorSystem`/`SystemBuilder::log` pattern: the
/// scheduler accepts a `slog::Logger` from its caller and only falls back
/// to a locally-built one when none is given.
pub fn default_log() -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    Logger::root(drain, o!("crate" => "tinybeam"))
}
