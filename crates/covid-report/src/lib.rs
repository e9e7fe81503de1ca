//! Presentation layer for the COVID case statistics pipeline.
//!
//! Renders result tables as formatted text reports, exports them as
//! delimited files and draws chart images from the cleaned record set.

pub mod chart;
pub mod export;
pub mod report;
