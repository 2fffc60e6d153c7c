//! Logging and progress helpers
//!
//! Patient names and free-text fields never go through these helpers; log
//! lines carry record ids, diagnoses and counts only.

pub mod log;
pub mod progress;

pub use log::{
    init_logging, log_assessment, log_operation_complete, log_operation_start, log_warning,
};
pub use progress::{create_spinner, finish_spinner};
