//! Worker-count policy.

use std::num::NonZeroUsize;
use std::thread;

/// Parallelism reported by the host, or 1 when it cannot be determined.
// std already answers this; no need for num_cpus.
pub fn detected_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// `max(min_workers, detected - reserve_cores)`, never below `min_workers`.
pub fn workers_for(detected: usize, min_workers: usize, reserve_cores: usize) -> usize {
    min_workers.max(detected.saturating_sub(reserve_cores))
}

/// Keep a requested worker count within what a rayon pool can run.
pub fn clamp_workers(workers: usize) -> usize {
    workers.clamp(1, rayon::max_num_threads())
}

/// Worker count for this host.
pub fn optimal_workers(min_workers: usize, reserve_cores: usize) -> usize {
    workers_for(detected_parallelism(), min_workers, reserve_cores)
}
