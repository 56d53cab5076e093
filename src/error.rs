// ABOUTME: Error types for chatlog — configuration vs. environment failures.
// ABOUTME: Every variant is fatal and maps to process exit code 1.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Broad classification used when reporting a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad invocation: invalid `--dir`, missing flag value, malformed config.
    Configuration,
    /// The host refused something we needed: chdir, mkdir, log or console I/O.
    Environment,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("failed to load config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("cannot change directory to {}: {source}", .path.display())]
    ChangeDirectory { path: PathBuf, source: io::Error },

    #[error("cannot create log directory {}: {source}", .path.display())]
    CreateLogDir { path: PathBuf, source: io::Error },

    #[error("cannot write to log file {}: {source}", .path.display())]
    WriteLog { path: PathBuf, source: io::Error },

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::DirectoryNotFound(_)
            | ChatError::InvalidArguments(_)
            | ChatError::Config { .. } => ErrorKind::Configuration,
            ChatError::ChangeDirectory { .. }
            | ChatError::CreateLogDir { .. }
            | ChatError::WriteLog { .. }
            | ChatError::Terminal(_) => ErrorKind::Environment,
        }
    }

    /// Process exit code for this error. All fatal errors exit with 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_errors_are_configuration_errors() {
        let err = ChatError::DirectoryNotFound(PathBuf::from("/nope"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("/nope"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn mkdir_errors_are_environment_errors() {
        let err = ChatError::CreateLogDir {
            path: PathBuf::from("/root/log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert!(err.to_string().contains("denied"));
        assert_eq!(err.exit_code(), 1);
    }
}
