//! On-disk layout of a repository.
//!
//! These paths are the stable contract read-only clients consume:
//!
//! ```text
//! pool/<component>/<package-file>
//! dists/<distribution>/<component>/binary-<arch>/Packages
//! dists/<distribution>/<component>/binary-<arch>/Packages.gz
//! dists/<distribution>/Release
//! dists/<distribution>/Release.gpg
//! dists/<distribution>/InRelease
//! ```

use crate::core::error::{DebpoolError, DebpoolResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const PACKAGES_FILE: &str = "Packages";
pub const PACKAGES_GZ_FILE: &str = "Packages.gz";
pub const RELEASE_FILE: &str = "Release";
pub const RELEASE_GPG_FILE: &str = "Release.gpg";
pub const IN_RELEASE_FILE: &str = "InRelease";

/// Path helpers rooted at a repository directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
    public_key: PathBuf,
}

impl RepoLayout {
    /// `public_key` is relative to `root` unless absolute.
    pub fn new(root: impl Into<PathBuf>, public_key: impl AsRef<Path>) -> Self {
        let root = root.into();
        let public_key = root.join(public_key);
        Self { root, public_key }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pool_dir(&self) -> PathBuf {
        self.root.join("pool")
    }

    pub fn pool_component_dir(&self, component: &str) -> PathBuf {
        self.pool_dir().join(component)
    }

    pub fn dists_dir(&self) -> PathBuf {
        self.root.join("dists")
    }

    pub fn dist_dir(&self, distribution: &str) -> PathBuf {
        self.dists_dir().join(distribution)
    }

    pub fn binary_dir(&self, distribution: &str, component: &str, arch: &str) -> PathBuf {
        self.dist_dir(distribution)
            .join(component)
            .join(format!("binary-{}", arch))
    }

    pub fn packages_path(&self, distribution: &str, component: &str, arch: &str) -> PathBuf {
        self.binary_dir(distribution, component, arch)
            .join(PACKAGES_FILE)
    }

    pub fn packages_gz_path(&self, distribution: &str, component: &str, arch: &str) -> PathBuf {
        self.binary_dir(distribution, component, arch)
            .join(PACKAGES_GZ_FILE)
    }

    pub fn release_path(&self, distribution: &str) -> PathBuf {
        self.dist_dir(distribution).join(RELEASE_FILE)
    }

    pub fn release_gpg_path(&self, distribution: &str) -> PathBuf {
        self.dist_dir(distribution).join(RELEASE_GPG_FILE)
    }

    pub fn in_release_path(&self, distribution: &str) -> PathBuf {
        self.dist_dir(distribution).join(IN_RELEASE_FILE)
    }

    pub fn public_key_path(&self) -> &Path {
        &self.public_key
    }

    /// Path of an index file as it appears in a Release checksum table.
    pub fn release_relative_path(component: &str, arch: &str, file_name: &str) -> String {
        format!("{}/binary-{}/{}", component, arch, file_name)
    }

    /// Pool path of a package as it appears in a `Filename:` stanza field.
    pub fn pool_relative_path(component: &str, file_name: &str) -> String {
        format!("pool/{}/{}", component, file_name)
    }
}

/// Create a directory and all of its parents
pub fn ensure_dir(path: &Path) -> DebpoolResult<()> {
    fs::create_dir_all(path).map_err(|e| {
        DebpoolError::Path(format!(
            "Failed to create directory {}: {}",
            path.display(),
            e
        ))
    })
}

/// Replace `path` with `contents` in one rename.
///
/// Readers see either the previous file or the complete new one, never a
/// partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> DebpoolResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| DebpoolError::Path(format!("No parent directory: {}", path.display())))?;
    ensure_dir(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| DebpoolError::Io(e.error))?;
    Ok(())
}
