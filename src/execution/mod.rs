// Execution module - supervision of the `go test` child process

pub mod args;
pub mod error;
pub mod supervisor;

pub use args::{has_flag, test_args};
pub use error::RunError;
pub use supervisor::Supervisor;
