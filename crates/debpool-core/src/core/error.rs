use std::path::PathBuf;
use thiserror::Error;

pub type DebpoolResult<T> = Result<T, DebpoolError>;

#[derive(Error, Debug)]
pub enum DebpoolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    #[error("Invalid component: {0}")]
    InvalidComponent(String),

    #[error("Invalid architecture: {0}")]
    InvalidArchitecture(String),

    #[error("Package file not found: {}", .0.display())]
    PackageNotFound(PathBuf),

    /// The file does not carry the configured package extension, so the
    /// pool listing would never index it.
    #[error("Not a package file: {} (expected extension .{extension})", .path.display())]
    InvalidPackageFile { path: PathBuf, extension: String },

    /// The package-inspection tool rejected a file or did not answer in time.
    #[error("Inspection failed for {}: {message}", .path.display())]
    Inspection { path: PathBuf, message: String },

    /// The signing tool returned non-success or did not answer in time.
    #[error("Signing failed for {}: {message}", .target.display())]
    Signing { target: PathBuf, message: String },

    /// Files on disk no longer match the checksums in a Release manifest.
    #[error("Release verification failed for {distribution}: {count} mismatched entries")]
    VerificationFailed { distribution: String, count: usize },
}

/// Coarse classification of a [`DebpoolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any side effect.
    InvalidInput,
    /// A single package failed its validity check.
    Inspection,
    /// Filesystem or directory structure failure.
    Io,
    /// The external signer failed.
    Signing,
    /// Bad or unreadable configuration.
    Config,
    /// Published metadata disagrees with the files it describes.
    Integrity,
}

impl DebpoolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DebpoolError::InvalidDistribution(_)
            | DebpoolError::InvalidComponent(_)
            | DebpoolError::InvalidArchitecture(_)
            | DebpoolError::PackageNotFound(_)
            | DebpoolError::InvalidPackageFile { .. } => ErrorKind::InvalidInput,
            DebpoolError::Inspection { .. } => ErrorKind::Inspection,
            DebpoolError::Signing { .. } => ErrorKind::Signing,
            DebpoolError::Config(_) | DebpoolError::Yaml(_) => ErrorKind::Config,
            DebpoolError::VerificationFailed { .. } => ErrorKind::Integrity,
            DebpoolError::Io(_) | DebpoolError::WalkDir(_) | DebpoolError::Path(_) => {
                ErrorKind::Io
            }
        }
    }

    pub fn inspection(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DebpoolError::Inspection {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn signing(target: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        DebpoolError::Signing {
            target: target.into(),
            message: message.into(),
        }
    }
}
