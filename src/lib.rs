pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod event;
pub mod execution;
pub mod extract;
pub mod logging;
pub mod report;
pub mod signal;
pub mod state;
pub mod stream;

pub use classify::classify;
pub use extract::{extract_failure_lines, extract_failures};
