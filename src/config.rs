use std::env;

use config::{Config, File};

use crate::error::TinybeamError;

/// Tuning knobs for one [`crate::scheduler::Scheduler`] instance.
///
/// Mirrors the teacher's `src/lib.rs::load_config` pattern (a `Config`
/// built from baked-in defaults, then merged with an optional TOML file
/// named by an environment variable) but scoped to exactly the four
/// construction parameters §4.4 of the spec names.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Reduction budget charged to a single `process_actor` episode.
    pub max_reductions: u32,
    /// Number of worker queues/loops. Defaults to the host's logical CPU count.
    pub num_workers: usize,
    /// Wall-clock threshold, in milliseconds, below which a processed
    /// message costs exactly one reduction.
    pub process_time_threshold_ms: u64,
    /// Multiplier applied to the reduction surcharge once a message's
    /// processing time exceeds `process_time_threshold_ms`.
    pub time_penalty_factor: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            max_reductions: 2_000,
            num_workers: num_cpus::get(),
            process_time_threshold_ms: 10,
            time_penalty_factor: 2,
        }
    }
}

impl SchedulerConfig {
    /// Loads defaults, then merges `$TINYBEAM_CONF` (default
    /// `config/tinybeam.toml`) over them if the file exists.
    ///
    /// A missing file is not an error (the defaults above stand alone); a
    /// present-but-malformed file is.
    pub fn load() -> Result<Self, TinybeamError> {
        let defaults = SchedulerConfig::default();

        let path = env::var("TINYBEAM_CONF").unwrap_or_else(|_| "config/tinybeam.toml".into());

        let raw = Config::builder()
            .set_default("max_reductions", defaults.max_reductions as i64)
            .map_err(|e| TinybeamError::Config(e.to_string()))?
            .set_default("num_workers", defaults.num_workers as i64)
            .map_err(|e| TinybeamError::Config(e.to_string()))?
            .set_default(
                "process_time_threshold_ms",
                defaults.process_time_threshold_ms as i64,
            )
            .map_err(|e| TinybeamError::Config(e.to_string()))?
            .set_default("time_penalty_factor", defaults.time_penalty_factor as i64)
            .map_err(|e| TinybeamError::Config(e.to_string()))?
            .add_source(File::with_name(&path).required(false))
            .build()
            .map_err(|e| TinybeamError::Config(e.to_string()))?;

        Ok(SchedulerConfig {
            max_reductions: raw
                .get_int("max_reductions")
                .map_err(|e| TinybeamError::Config(e.to_string()))? as u32,
            num_workers: raw
                .get_int("num_workers")
                .map_err(|e| TinybeamError::Config(e.to_string()))? as usize,
            process_time_threshold_ms: raw
                .get_int("process_time_threshold_ms")
                .map_err(|e| TinybeamError::Config(e.to_string()))? as u64,
            time_penalty_factor: raw
                .get_int("time_penalty_factor")
                .map_err(|e| TinybeamError::Config(e.to_string()))? as u32,
        })
    }
}
