//! Shared foundation for the COVID case statistics pipeline.
//!
//! Holds the canonical record types, the error taxonomy, persisted
//! configuration, CLI settings and the generic table representation that the
//! reporting layer consumes.

pub mod config;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod table;

pub use error::{CovidError, Result};
