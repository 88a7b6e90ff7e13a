use super::checksum::{checksum_file, FileChecksum};
use super::pool::PoolStore;
use crate::config::RepoConfig;
use crate::core::{write_atomic, DebpoolError, DebpoolResult, RepoLayout};
use crate::di::PackageInspector;
use crate::inspect::ControlFields;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Control fields copied from inspection output into a stanza, in order,
/// between `Architecture` and `Filename`.
const PASSTHROUGH_FIELDS: &[&str] = &[
    "Maintainer",
    "Installed-Size",
    "Depends",
    "Pre-Depends",
    "Recommends",
    "Suggests",
    "Conflicts",
    "Breaks",
    "Replaces",
    "Provides",
    "Section",
    "Priority",
    "Homepage",
    "Description",
];

/// Architecture value that matches every index
const ARCH_ALL: &str = "all";

/// The index pair written for one (distribution, component, architecture)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexFiles {
    pub packages: PathBuf,
    pub packages_gz: PathBuf,
    /// Number of stanzas in the index
    pub package_count: usize,
}

/// Identity of a package as recovered from its pool file name
/// (`name_version_arch.ext`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FileNameIdentity {
    pub name: String,
    pub version: Option<String>,
    pub architecture: Option<String>,
}

impl FileNameIdentity {
    /// Split a pool file name.
    ///
    /// The name is everything before the first underscore, the architecture
    /// is the last segment when there are at least three, and the version is
    /// whatever lies between. Names with stray underscores therefore parse
    /// wrongly; this is only a fallback for fields inspection did not supply.
    pub fn parse(file_name: &str, extension: &str) -> Self {
        let stem = file_name
            .strip_suffix(extension)
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(file_name);
        let parts: Vec<&str> = stem.split('_').collect();

        match parts.as_slice() {
            [name] => Self {
                name: name.to_string(),
                version: None,
                architecture: None,
            },
            [name, version] => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
                architecture: None,
            },
            [name, middle @ .., arch] => Self {
                name: name.to_string(),
                version: Some(middle.join("_")),
                architecture: Some(arch.to_string()),
            },
            [] => Self {
                name: String::new(),
                version: None,
                architecture: None,
            },
        }
    }
}

/// Everything needed to write one stanza
#[derive(Debug, Clone)]
struct Stanza {
    name: String,
    version: String,
    architecture: String,
    extra: Vec<(String, String)>,
    filename: String,
    checksum: FileChecksum,
}

impl Stanza {
    fn render_into(&self, out: &mut String) {
        // Writing to a String cannot fail
        let _ = writeln!(out, "Package: {}", self.name);
        let _ = writeln!(out, "Version: {}", self.version);
        let _ = writeln!(out, "Architecture: {}", self.architecture);
        for (key, value) in &self.extra {
            let _ = writeln!(out, "{}: {}", key, value);
        }
        let _ = writeln!(out, "Filename: {}", self.filename);
        let _ = writeln!(out, "Size: {}", self.checksum.size);
        let _ = writeln!(out, "MD5sum: {}", self.checksum.md5);
        let _ = writeln!(out, "SHA256: {}", self.checksum.sha256);
        out.push('\n');
    }
}

/// Regenerates `Packages` and `Packages.gz` from the pool
#[derive(Clone)]
pub struct IndexGenerator {
    config: Arc<RepoConfig>,
    layout: RepoLayout,
    pool: PoolStore,
    inspector: Arc<dyn PackageInspector>,
}

impl IndexGenerator {
    pub fn new(config: Arc<RepoConfig>, inspector: Arc<dyn PackageInspector>) -> Self {
        Self {
            layout: config.layout(),
            pool: PoolStore::new(config.clone()),
            config,
            inspector,
        }
    }

    /// Regenerate the index pair for one triple.
    ///
    /// Returns `None` when the pool has no package files for `component`;
    /// any index left over from an earlier run is removed in that case so the
    /// Release manifest cannot advertise packages that are gone. Packages the
    /// inspector rejects are skipped. The plain index is written first and
    /// the compressed one is produced from exactly the same bytes.
    pub fn generate(
        &self,
        distribution: &str,
        component: &str,
        arch: &str,
    ) -> DebpoolResult<Option<IndexFiles>> {
        self.config.check_distribution(distribution)?;
        self.config.check_component(component)?;
        self.config.check_architecture(arch)?;

        let packages_path = self.layout.packages_path(distribution, component, arch);
        let packages_gz_path = self.layout.packages_gz_path(distribution, component, arch);

        let mut body = String::new();
        let mut seen = 0usize;
        let mut written = 0usize;

        for path in self.pool.list(component)? {
            let path = path?;
            seen += 1;
            if let Some(stanza) = self.derive_stanza(&path, component, arch)? {
                stanza.render_into(&mut body);
                written += 1;
            }
        }

        if seen == 0 {
            debug!(distribution, component, arch, "No packages in pool component");
            remove_stale(&packages_path)?;
            remove_stale(&packages_gz_path)?;
            return Ok(None);
        }

        write_atomic(&packages_path, body.as_bytes())?;
        write_atomic(&packages_gz_path, &gzip(body.as_bytes())?)?;

        info!(
            distribution,
            component,
            arch,
            packages = written,
            skipped = seen - written,
            "Generated package index"
        );
        Ok(Some(IndexFiles {
            packages: packages_path,
            packages_gz: packages_gz_path,
            package_count: written,
        }))
    }

    /// Build the stanza for one pool file, or `None` if it is skipped.
    ///
    /// Inspection failures and unusable identities are absorbed here; a
    /// checksum failure is not.
    fn derive_stanza(
        &self,
        path: &Path,
        component: &str,
        index_arch: &str,
    ) -> DebpoolResult<Option<Stanza>> {
        let fields = match self.inspector.inspect(path) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping package that failed inspection");
                return Ok(None);
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| DebpoolError::Path(format!("No file name: {}", path.display())))?;
        let from_name = FileNameIdentity::parse(&file_name, &self.config.package_extension);

        let name = fields
            .get("Package")
            .map(str::to_string)
            .unwrap_or(from_name.name);
        let version = fields
            .get("Version")
            .map(str::to_string)
            .or(from_name.version);
        let package_arch = fields
            .get("Architecture")
            .map(str::to_string)
            .or(from_name.architecture);

        let version = match version {
            Some(version) if !name.is_empty() => version,
            _ => {
                warn!(path = %path.display(), "Skipping package with no recoverable name and version");
                return Ok(None);
            }
        };

        let architecture = if self.config.filter_by_architecture {
            match package_arch {
                Some(arch) if arch == index_arch || arch == ARCH_ALL => arch,
                Some(arch) => {
                    debug!(path = %path.display(), package_arch = %arch, index_arch, "Package not built for this architecture");
                    return Ok(None);
                }
                None => index_arch.to_string(),
            }
        } else {
            index_arch.to_string()
        };

        Ok(Some(Stanza {
            name,
            version,
            architecture,
            extra: passthrough_fields(&fields),
            filename: RepoLayout::pool_relative_path(component, &file_name),
            checksum: checksum_file(path)?,
        }))
    }
}

fn passthrough_fields(fields: &ControlFields) -> Vec<(String, String)> {
    PASSTHROUGH_FIELDS
        .iter()
        .filter_map(|key| fields.get(key).map(|v| (key.to_string(), v.to_string())))
        .collect()
}

/// gzip `data` with a zeroed header timestamp so equal input gives equal output
fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

fn remove_stale(path: &Path) -> DebpoolResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Removed stale index");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
