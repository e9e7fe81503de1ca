//! Data layer for the COVID case statistics pipeline.
//!
//! Responsible for discovering and normalizing daily snapshot CSVs, cleaning
//! the combined record set, persisting it through the store abstraction and
//! running the aggregation, metric and filter operations.

pub mod aggregate;
pub mod clean;
pub mod filter;
pub mod ingest;
pub mod metrics;
pub mod store;
