//! Clinical algorithms

pub mod triage;
