// src/lib.rs
//! Incremental harvester for the TomTom Traffic Index ranking table.
//!
//! The source page virtualizes its list: only a sliding window of rows is
//! rendered at any moment. The harvester pages through the list on a fixed
//! scroll budget, deduplicates rows across overlapping windows by
//! normalized city, appends each view's new rows to its CSV incrementally,
//! and uploads the finalized files to object storage.

pub mod config;
pub mod driver;
pub mod harvest;
pub mod sink;
pub mod surface;
pub mod upload;
