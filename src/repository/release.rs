use super::checksum::{checksum_file, FileChecksum};
use crate::config::RepoConfig;
use crate::core::layout::{PACKAGES_FILE, PACKAGES_GZ_FILE};
use crate::core::{write_atomic, DebpoolError, DebpoolResult, RepoLayout};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// `Date:` format used by Debian archives
const RELEASE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// One referenced index file in a Release checksum table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    /// Path relative to `dists/<distribution>/`
    pub path: String,
    pub checksum: FileChecksum,
}

/// The in-memory form of a Release manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifest {
    pub origin: String,
    pub label: String,
    pub suite: String,
    pub codename: String,
    pub date: DateTime<Utc>,
    pub architectures: Vec<String>,
    pub components: Vec<String>,
    pub description: String,
    pub entries: Vec<ReleaseEntry>,
}

impl ReleaseManifest {
    /// Render the manifest exactly as APT clients parse it.
    ///
    /// The header fields are always present; the `MD5Sum:` and `SHA256:`
    /// sections follow with one ` <digest> <size> <path>` line per entry.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Origin: {}", self.origin);
        let _ = writeln!(out, "Label: {}", self.label);
        let _ = writeln!(out, "Suite: {}", self.suite);
        let _ = writeln!(out, "Codename: {}", self.codename);
        let _ = writeln!(out, "Date: {}", self.date.format(RELEASE_DATE_FORMAT));
        let _ = writeln!(out, "Architectures: {}", self.architectures.join(" "));
        let _ = writeln!(out, "Components: {}", self.components.join(" "));
        let _ = writeln!(out, "Description: {}", self.description);

        out.push_str("MD5Sum:\n");
        for entry in &self.entries {
            let _ = writeln!(
                out,
                " {} {} {}",
                entry.checksum.md5, entry.checksum.size, entry.path
            );
        }
        out.push_str("SHA256:\n");
        for entry in &self.entries {
            let _ = writeln!(
                out,
                " {} {} {}",
                entry.checksum.sha256, entry.checksum.size, entry.path
            );
        }
        out
    }
}

/// Which checksum section a table row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    Md5,
    Sha256,
}

/// A row read back from a Release checksum section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRow {
    pub kind: DigestKind,
    pub digest: String,
    pub size: u64,
    pub path: String,
}

/// Read the `MD5Sum:` and `SHA256:` sections of a rendered manifest
pub fn parse_checksum_rows(text: &str) -> Vec<ChecksumRow> {
    let mut rows = Vec::new();
    let mut section = None;

    for line in text.lines() {
        if !line.starts_with(' ') {
            section = match line.trim_end() {
                "MD5Sum:" => Some(DigestKind::Md5),
                "SHA256:" => Some(DigestKind::Sha256),
                _ => None,
            };
            continue;
        }
        let Some(kind) = section else { continue };
        let mut parts = line.split_whitespace();
        if let (Some(digest), Some(size), Some(path)) = (parts.next(), parts.next(), parts.next())
        {
            if let Ok(size) = size.parse() {
                rows.push(ChecksumRow {
                    kind,
                    digest: digest.to_string(),
                    size,
                    path: path.to_string(),
                });
            }
        }
    }
    rows
}

/// A Release row whose file no longer matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumMismatch {
    pub path: String,
    pub kind: DigestKind,
    pub expected: String,
    /// `None` when the file is missing
    pub actual: Option<String>,
}

/// Builds the per-distribution Release manifest from the index files on disk
#[derive(Clone)]
pub struct ReleaseAssembler {
    config: Arc<RepoConfig>,
    layout: RepoLayout,
}

impl ReleaseAssembler {
    pub fn new(config: Arc<RepoConfig>) -> Self {
        let layout = config.layout();
        Self { config, layout }
    }

    /// Rewrite `dists/<distribution>/Release`, stamped with the current time
    pub fn assemble(&self, distribution: &str) -> DebpoolResult<PathBuf> {
        self.assemble_at(distribution, Utc::now())
    }

    /// Rewrite `dists/<distribution>/Release` with an explicit `Date:`.
    ///
    /// Every index referenced is checksummed from its bytes on disk at this
    /// moment, so this must run only after every index is final.
    pub fn assemble_at(
        &self,
        distribution: &str,
        date: DateTime<Utc>,
    ) -> DebpoolResult<PathBuf> {
        let manifest = self.build(distribution, date)?;
        let path = self.layout.release_path(distribution);
        write_atomic(&path, manifest.render().as_bytes())?;

        info!(
            distribution,
            files = manifest.entries.len(),
            path = %path.display(),
            "Assembled Release manifest"
        );
        Ok(path)
    }

    /// Collect the manifest for `distribution` without writing it
    pub fn build(
        &self,
        distribution: &str,
        date: DateTime<Utc>,
    ) -> DebpoolResult<ReleaseManifest> {
        self.config.check_distribution(distribution)?;

        let mut entries = Vec::new();
        for component in &self.config.components {
            for arch in &self.config.architectures {
                let dir = self.layout.binary_dir(distribution, component, arch);
                for file_name in [PACKAGES_FILE, PACKAGES_GZ_FILE] {
                    let file = dir.join(file_name);
                    if !file.is_file() {
                        continue;
                    }
                    let checksum = checksum_file(&file)?;
                    debug!(path = %file.display(), size = checksum.size, "Checksummed index");
                    entries.push(ReleaseEntry {
                        path: RepoLayout::release_relative_path(component, arch, file_name),
                        checksum,
                    });
                }
            }
        }

        Ok(ReleaseManifest {
            origin: self.config.origin.clone(),
            label: self.config.label.clone(),
            suite: distribution.to_string(),
            codename: distribution.to_string(),
            date,
            architectures: self.config.architectures.clone(),
            components: self.config.components.clone(),
            description: self.config.description.clone(),
            entries,
        })
    }

    /// Recompute every file listed in the distribution's Release and report
    /// rows that no longer match.
    pub fn verify(&self, distribution: &str) -> DebpoolResult<Vec<ChecksumMismatch>> {
        self.config.check_distribution(distribution)?;

        let release = self.layout.release_path(distribution);
        let text = fs::read_to_string(&release).map_err(|e| {
            DebpoolError::Path(format!("Cannot read {}: {}", release.display(), e))
        })?;
        let dist_dir = self.layout.dist_dir(distribution);

        let mut mismatches = Vec::new();
        for row in parse_checksum_rows(&text) {
            let file = dist_dir.join(&row.path);
            let actual = if file.is_file() {
                Some(checksum_file(&file)?)
            } else {
                None
            };

            let matches = actual.as_ref().is_some_and(|sum| {
                sum.size == row.size
                    && match row.kind {
                        DigestKind::Md5 => sum.md5 == row.digest,
                        DigestKind::Sha256 => sum.sha256 == row.digest,
                    }
            });
            if !matches {
                warn!(distribution, path = %row.path, "Release checksum mismatch");
                mismatches.push(ChecksumMismatch {
                    path: row.path,
                    kind: row.kind,
                    expected: row.digest,
                    actual: actual.map(|sum| match row.kind {
                        DigestKind::Md5 => sum.md5,
                        DigestKind::Sha256 => sum.sha256,
                    }),
                });
            }
        }
        Ok(mismatches)
    }
}
