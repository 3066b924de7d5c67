//! Error taxonomy with actionable suggestions.
//!
//! Transport and decode failures abort a save and carry enough detail (exit
//! status, captured stderr, offending filename) to diagnose without re-running.
//! Process lookup failures never escape the resolver; they degrade to "no
//! subprocess". Filesystem failures propagate unchanged.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// The remote-control channel could not deliver a tree.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The remote-control binary could not be started at all.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The remote call ran but reported failure.
    #[error("remote control exited with {}{}", describe_status(.status), describe_stderr(.stderr))]
    Exit { status: Option<i32>, stderr: String },
    /// The remote call did not answer within the configured bound.
    #[error("remote control did not respond within {after:?}")]
    Timeout { after: Duration },
    /// Reading the child's output failed mid-flight.
    #[error("failed to collect remote control output: {0}")]
    Io(#[source] std::io::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\nstderr: {}", trimmed)
    }
}

impl TransportError {
    pub fn suggestion(&self) -> &'static str {
        match self {
            TransportError::Spawn { .. } => {
                "Check that kitty is installed and 'kitty_command' in the config points at it"
            }
            TransportError::Exit { .. } => {
                "Enable remote control in kitty.conf ('allow_remote_control yes' and 'listen_on') and check the listen_socket template"
            }
            TransportError::Timeout { .. } => {
                "The kitty instance may be busy or gone; raise 'request_timeout_ms' or verify the pid"
            }
            TransportError::Io(_) => "This is an internal error. Please report it if it persists.",
        }
    }
}

/// A filename or payload did not have the expected shape.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("'{filename}' does not end in .json")]
    MissingJsonSuffix { filename: String },
    #[error("'{filename}' has no '_' separating the name from the file kind")]
    MissingSeparator { filename: String },
    #[error("'{filename}' has unknown file kind '{kind}' (expected layout or programs)")]
    UnknownFileKind { filename: String, kind: String },
    #[error("remote control returned a malformed tree: {0}")]
    Tree(#[from] serde_json::Error),
}

impl DecodeError {
    pub fn suggestion(&self) -> &'static str {
        match self {
            DecodeError::Tree(_) => "Check that the kitty version supports 'kitty @ ls --all-env-vars'",
            _ => "Only files produced by resurrect belong in the artifact directory",
        }
    }
}

/// The process backing a window could not be inspected.
#[derive(Debug, Error)]
pub enum ProcessLookupError {
    #[error("process {pid} no longer exists")]
    Vanished { pid: u32 },
    #[error("failed to inspect process {pid}: {message}")]
    Inspect { pid: u32, message: String },
}

impl ProcessLookupError {
    pub fn pid(&self) -> u32 {
        match self {
            ProcessLookupError::Vanished { pid } | ProcessLookupError::Inspect { pid, .. } => *pid,
        }
    }
}

/// Reading, writing or deleting an artifact failed.
#[derive(Debug, Error)]
#[error("{action} '{}': {source}", .path.display())]
pub struct FilesystemError {
    pub action: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl FilesystemError {
    pub fn new(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                "Run 'resurrect ls' to see which artifacts exist in the directory"
            }
            std::io::ErrorKind::PermissionDenied => {
                "Check the permissions of the artifact directory"
            }
            _ => "Check that the artifact directory is writable and has free space",
        }
    }
}

/// Any failure a save, list or remove operation can surface.
///
/// [`ProcessLookupError`] is absent: it is handled where it occurs.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

impl Error {
    pub fn suggestion(&self) -> &'static str {
        match self {
            Error::Transport(err) => err.suggestion(),
            Error::Decode(err) => err.suggestion(),
            Error::Filesystem(err) => err.suggestion(),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
