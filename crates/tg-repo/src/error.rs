use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("{tool} not found on PATH")]
    ToolNotFound {
        tool: String,
        #[source]
        source: which::Error,
    },

    #[error("Command execution failed: {command} (exit code: {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    #[error("Unexpected output from {command}: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("Cannot determine remote repository name. Candidate remotes: {candidates:?}")]
    AmbiguousRemote { candidates: Vec<String> },

    #[error("Unable to find default branch. Tried: {}", attempts.join("; "))]
    DefaultBranchNotFound { attempts: Vec<String> },

    #[error("Repository not found from path: {0}")]
    RepositoryNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl VcsError {
    /// Exit code of a failed command, if this error came from one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            VcsError::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

pub type VcsResult<T> = Result<T, VcsError>;
