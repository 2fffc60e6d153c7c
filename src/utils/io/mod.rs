//! File formats for patient records

pub mod parquet;

pub use parquet::{RecordRow, batch_to_records, read_records, records_to_batch, write_records};
