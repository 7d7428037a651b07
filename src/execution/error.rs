// Errors that prevent a test run from producing a report

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// The go command is not installed or not on PATH
    #[error("hottest command requires {tool} command. please install {tool} command")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to create output pipe: {0}")]
    Pipe(#[source] io::Error),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child printed something other than test events, usually an
    /// argument or package error
    #[error("{0}")]
    InvalidInvocation(String),

    #[error("output reader stopped unexpectedly: {0}")]
    Reader(String),
}

impl RunError {
    /// Whether the run was never attempted
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ToolNotFound { .. })
    }
}
