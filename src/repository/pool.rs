use crate::config::RepoConfig;
use crate::core::{ensure_dir, DebpoolError, DebpoolResult, RepoLayout};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use walkdir::WalkDir;

/// The canonical store of package files, one flat directory per component
#[derive(Clone)]
pub struct PoolStore {
    config: Arc<RepoConfig>,
    layout: RepoLayout,
}

impl PoolStore {
    pub fn new(config: Arc<RepoConfig>) -> Self {
        let layout = config.layout();
        Self { config, layout }
    }

    /// Copy `source` into the pool under `component`, keeping its file name.
    ///
    /// A pool file with the same name is replaced (last write wins). The copy
    /// goes through a temporary file so the pool never holds a truncated
    /// package.
    pub fn add(&self, source: &Path, component: &str) -> DebpoolResult<PathBuf> {
        self.config.check_component(component)?;
        if !source.is_file() {
            return Err(DebpoolError::PackageNotFound(source.to_path_buf()));
        }
        self.config.check_package_file(source)?;
        let file_name = source
            .file_name()
            .ok_or_else(|| DebpoolError::PackageNotFound(source.to_path_buf()))?;

        let dir = self.layout.pool_component_dir(component);
        ensure_dir(&dir)?;
        let dest = dir.join(file_name);

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        let mut src = fs::File::open(source)?;
        io::copy(&mut src, tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        if dest.exists() {
            debug!(path = %dest.display(), "Overwriting existing pool entry");
        }
        tmp.persist(&dest).map_err(|e| DebpoolError::Io(e.error))?;

        info!(path = %dest.display(), component, "Package added to pool");
        Ok(dest)
    }

    /// Whether the pool has a directory for `component`
    pub fn has_component(&self, component: &str) -> bool {
        self.layout.pool_component_dir(component).is_dir()
    }

    /// Lazily enumerate the package files of `component`.
    ///
    /// A missing component directory yields an empty sequence. Entries come
    /// back sorted by file name; the directory is not snapshotted, so files
    /// added or removed while iterating may or may not be seen.
    pub fn list(
        &self,
        component: &str,
    ) -> DebpoolResult<impl Iterator<Item = DebpoolResult<PathBuf>>> {
        self.config.check_component(component)?;

        let dir = self.layout.pool_component_dir(component);
        let extension = self.config.package_extension.clone();
        let walker = dir.is_dir().then(|| {
            WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
        });

        Ok(walker
            .into_iter()
            .flatten()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let is_package = entry.file_type().is_file()
                        && entry.path().extension().and_then(|e| e.to_str())
                            == Some(extension.as_str());
                    is_package.then(|| Ok(entry.into_path()))
                }
                Err(e) => Some(Err(DebpoolError::from(e))),
            }))
    }
}
