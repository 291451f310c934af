//! Export constants.

/// Worker cap when the caller sets no explicit limit.
pub const N_WORKERS_DEFAULT_MAX: usize = 8;
/// Prefix of the one-line report summary.
pub const C_PREFIX_REPORT_EXPORT: &str = "[EXPORT]";
