//! Logging utilities
//!
//! Standardized log lines for file operations and triage outcomes.

use std::path::Path;
use std::time::Duration;

use crate::models::types::Diagnosis;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize `env_logger`, honouring `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .try_init();
}

/// Log an operation start with consistent format
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense description, e.g. "wrote"
/// * `path` - File that was operated on
/// * `items` - Number of records processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    match elapsed {
        Some(duration) => log::info!(
            "Successfully {} {} records at {} in {:?}",
            operation,
            items,
            path.display(),
            duration
        ),
        None => log::info!(
            "Successfully {} {} records at {}",
            operation,
            items,
            path.display()
        ),
    }
}

/// Log a warning, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}

/// Log the outcome of a stored assessment
///
/// # Arguments
/// * `action` - "created" or "updated"
/// * `record_id` - Store identifier of the record
/// * `diagnosis` - Evaluated diagnosis
/// * `referral_reasons` - Number of referral reasons found
pub fn log_assessment(action: &str, record_id: u64, diagnosis: Diagnosis, referral_reasons: usize) {
    if referral_reasons > 0 {
        log::info!(
            "Record {record_id} {action}: {diagnosis} with {referral_reasons} referral reason(s)"
        );
    } else {
        log::info!("Record {record_id} {action}: {diagnosis}");
    }
}
