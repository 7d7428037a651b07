// CLI module - argument passthrough to `go test`

pub mod args;

pub use args::{Cli, usage};
