//! Scenario progress display

pub mod reporter;
