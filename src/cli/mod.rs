pub mod add_package;
pub mod check_key;
pub mod export_key;
pub mod init;
pub mod list;
pub mod update;
pub mod verify;

use debpool::config::RepoConfig;
use debpool::core::DebpoolResult;
use debpool::di::ServiceContainer;
use debpool::repository::Repository;
use std::path::{Path, PathBuf};

/// Where the repository lives and which config file describes it
pub struct RepoArgs {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
}

impl RepoArgs {
    pub fn load_config(&self) -> DebpoolResult<RepoConfig> {
        match &self.config {
            Some(path) => RepoConfig::load_from(&self.root, path),
            None => RepoConfig::load(&self.root),
        }
    }

    /// Build a repository backed by `dpkg-deb` and `gpg`
    pub fn open(&self) -> DebpoolResult<Repository> {
        let config = self.load_config()?;
        Ok(Repository::new(ServiceContainer::new(config)))
    }
}

/// Show `path` relative to the repository root when it lives under it
pub fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
