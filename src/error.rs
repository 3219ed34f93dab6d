use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read manifest {}", .path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("scorer command not found: {}", .command)]
    ScorerUnavailable { command: String },

    #[error("scorer command {} failed: {}", .command, .reason)]
    ScorerExecutionFailed { command: String, reason: String },

    #[error("scorer result {} has no entry for package {}", .path.display(), .package)]
    MissingScoreResult { package: String, path: PathBuf },

    #[error("scorer result {} could not be parsed: {}", .path.display(), .reason)]
    MalformedScoreResult { path: PathBuf, reason: String },
}
