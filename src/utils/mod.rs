//! Shared utilities: record file I/O and logging

pub mod io;
pub mod logging;
