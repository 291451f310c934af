//! Pure helpers for the export pipeline.

use crate::conf::N_WORKERS_DEFAULT_MAX;

/// Resolve the worker count: explicit limits clamp to the CPU count, no limit
/// uses the CPU count capped at [`N_WORKERS_DEFAULT_MAX`].
pub fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(1);

    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, N_WORKERS_DEFAULT_MAX),
    }
}
