//! Trait definitions for dependency injection

use crate::core::DebpoolResult;
use crate::inspect::ControlFields;
use crate::signing::ReleaseSignatures;
use std::path::{Path, PathBuf};

/// Trait for the external package-inspection tool
///
/// Confirms a file is a well-formed package and returns its control
/// metadata. The engine never parses package internals itself.
pub trait PackageInspector: Send + Sync {
    /// Inspect a package file, returning its control fields on success
    fn inspect(&self, path: &Path) -> DebpoolResult<ControlFields>;
}

/// Trait for the external signing tool
///
/// Implementations own the key material; the engine only asks for
/// signatures and records the files that come back.
pub trait Signer: Send + Sync {
    /// Write a detached signature next to `path`, returning its location
    fn sign_file(&self, path: &Path) -> DebpoolResult<PathBuf>;

    /// Write `Release.gpg` and `InRelease` next to a Release manifest
    fn sign_release(&self, release: &Path) -> DebpoolResult<ReleaseSignatures>;

    /// Export the public half of the signing key to `dest`
    fn export_public_key(&self, dest: &Path) -> DebpoolResult<()>;

    /// Check that the signing key is usable
    fn check_key(&self) -> DebpoolResult<()>;
}
