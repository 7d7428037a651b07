// Commands module - handles CLI command execution

pub mod run;

pub use run::run_tests;
