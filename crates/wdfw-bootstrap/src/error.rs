use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot read {}: {source}", .path.display())]
    MissingReadme { path: PathBuf, source: io::Error },

    #[error("[{label}] link for `{artifact}` was not found in the README")]
    PatternNotFound { artifact: String, label: String },

    #[error("invalid link pattern for `{artifact}`: {source}")]
    InvalidPattern { artifact: String, source: regex::Error },

    #[error("download command is empty")]
    EmptyCommand,

    #[error("failed to start `{program}`: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("command failed: {command} (exit code: {})", exit_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("unknown artifact: {0}")]
    UnknownArtifact(String),

    #[error("cannot read manifest {}: {source}", .path.display())]
    ManifestRead { path: PathBuf, source: io::Error },

    #[error("invalid manifest {}: {source}", .path.display())]
    ManifestParse { path: PathBuf, source: serde_yaml::Error },
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}
