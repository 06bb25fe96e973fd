//! Command-line glue for debrief: config, logging and sharing wrappers.

pub mod config;
pub mod logging;
pub mod share;
