//! Signing gateway: the files a signer produces and the `gpg` backed signer.

pub mod gpg;

pub use gpg::GpgSigner;

use crate::core::layout::{IN_RELEASE_FILE, RELEASE_GPG_FILE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The fixed signature pair written next to a Release manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSignatures {
    /// `Release.gpg`, the detached armored signature
    pub detached: PathBuf,
    /// `InRelease`, the cleartext-signed manifest
    pub inline: PathBuf,
}

impl ReleaseSignatures {
    /// Well-known signature paths for the manifest at `release`
    pub fn beside(release: &Path) -> Self {
        let dir = release.parent().unwrap_or_else(|| Path::new(""));
        Self {
            detached: dir.join(RELEASE_GPG_FILE),
            inline: dir.join(IN_RELEASE_FILE),
        }
    }

    /// Delete both signature files if present.
    ///
    /// Run before a new Release is written so a failed signing step leaves
    /// the manifest unsigned instead of carrying signatures over old bytes.
    pub fn remove_existing(&self) -> io::Result<()> {
        for path in [&self.detached, &self.inline] {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Path of the detached armored signature for an arbitrary file
pub fn detached_signature_path(path: &Path) -> PathBuf {
    let mut signature = path.as_os_str().to_owned();
    signature.push(".asc");
    PathBuf::from(signature)
}
