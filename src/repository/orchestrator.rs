use super::index::{IndexFiles, IndexGenerator};
use super::pool::PoolStore;
use super::release::{ChecksumMismatch, ReleaseAssembler};
use crate::config::RepoConfig;
use crate::core::{ensure_dir, DebpoolError, DebpoolResult};
use crate::di::{PackageInspector, ServiceContainer, Signer};
use crate::signing::ReleaseSignatures;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info};

/// What `add_package` produced
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub stored: PathBuf,
    pub indices: Vec<IndexFiles>,
    pub release: PathBuf,
    pub release_signatures: ReleaseSignatures,
    pub package_signature: PathBuf,
}

/// What `update_indices` produced
#[derive(Debug, Clone)]
pub struct UpdateReport {
    pub distribution: String,
    pub indices: Vec<IndexFiles>,
    pub release: PathBuf,
    pub signatures: ReleaseSignatures,
}

/// One mutex per distribution name.
///
/// Index regeneration and Release assembly read then write the same files,
/// so two sequences for one distribution must never interleave. Different
/// distributions touch disjoint trees and run freely in parallel.
#[derive(Default)]
struct DistributionLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl DistributionLocks {
    fn get(&self, distribution: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(distribution.to_string())
            .or_default()
            .clone()
    }
}

/// Sequences pool writes, index regeneration, Release assembly and signing
#[derive(Clone)]
pub struct Repository {
    config: Arc<RepoConfig>,
    pool: PoolStore,
    indexer: IndexGenerator,
    release: ReleaseAssembler,
    inspector: Arc<dyn PackageInspector>,
    signer: Arc<dyn Signer>,
    locks: Arc<DistributionLocks>,
}

impl Repository {
    pub fn new(container: ServiceContainer) -> Self {
        let ServiceContainer {
            config,
            inspector,
            signer,
        } = container;
        Self {
            pool: PoolStore::new(config.clone()),
            indexer: IndexGenerator::new(config.clone(), inspector.clone()),
            release: ReleaseAssembler::new(config.clone()),
            config,
            inspector,
            signer,
            locks: Arc::new(DistributionLocks::default()),
        }
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn pool(&self) -> &PoolStore {
        &self.pool
    }

    /// Create the pool and dists skeleton and publish the public key
    pub fn init(&self) -> DebpoolResult<()> {
        let layout = self.config.layout();
        info!(root = %layout.root().display(), "Initializing repository structure");

        for component in &self.config.components {
            ensure_dir(&layout.pool_component_dir(component))?;
        }
        for distribution in &self.config.distributions {
            for component in &self.config.components {
                for arch in &self.config.architectures {
                    ensure_dir(&layout.binary_dir(distribution, component, arch))?;
                }
            }
        }
        if let Some(key_dir) = layout.public_key_path().parent() {
            ensure_dir(key_dir)?;
        }
        self.signer.export_public_key(layout.public_key_path())?;

        info!("Repository initialization complete");
        Ok(())
    }

    /// Add a package and republish the affected distribution.
    ///
    /// Order: validate, inspect, pool write, regenerate every architecture's
    /// index for `component`, assemble Release, sign Release, sign the pooled
    /// package. The first failure stops the sequence; whatever was already
    /// written stays on disk and `update_indices` is the recovery path.
    pub fn add_package(
        &self,
        package: &Path,
        distribution: &str,
        component: &str,
    ) -> DebpoolResult<AddOutcome> {
        if !package.is_file() {
            return Err(DebpoolError::PackageNotFound(package.to_path_buf()));
        }
        self.config.check_distribution(distribution)?;
        self.config.check_component(component)?;
        self.config.check_package_file(package)?;
        self.inspector.inspect(package)?;

        let lock = self.locks.get(distribution);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let result = self.add_package_locked(package, distribution, component);
        if let Err(e) = &result {
            error!(package = %package.display(), distribution, component, error = %e, "Failed to add package");
        }
        result
    }

    fn add_package_locked(
        &self,
        package: &Path,
        distribution: &str,
        component: &str,
    ) -> DebpoolResult<AddOutcome> {
        let stored = self.pool.add(package, component)?;

        let mut indices = Vec::new();
        for arch in &self.config.architectures {
            indices.extend(self.indexer.generate(distribution, component, arch)?);
        }

        let (release, release_signatures) = self.publish_release(distribution)?;
        let package_signature = self.signer.sign_file(&stored)?;

        info!(package = %stored.display(), distribution, component, "Package published");
        Ok(AddOutcome {
            stored,
            indices,
            release,
            release_signatures,
            package_signature,
        })
    }

    /// Regenerate every index of `distribution`, then assemble and sign its
    /// Release.
    pub fn update_indices(&self, distribution: &str) -> DebpoolResult<UpdateReport> {
        self.config.check_distribution(distribution)?;

        let lock = self.locks.get(distribution);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        info!(distribution, "Updating indices");
        let result = self.update_indices_locked(distribution);
        if let Err(e) = &result {
            error!(distribution, error = %e, "Failed to update indices");
        }
        result
    }

    fn update_indices_locked(&self, distribution: &str) -> DebpoolResult<UpdateReport> {
        let mut indices = Vec::new();
        for component in &self.config.components {
            for arch in &self.config.architectures {
                indices.extend(self.indexer.generate(distribution, component, arch)?);
            }
        }

        let (release, signatures) = self.publish_release(distribution)?;

        Ok(UpdateReport {
            distribution: distribution.to_string(),
            indices,
            release,
            signatures,
        })
    }

    /// Write the Release last and sign it.
    ///
    /// The previous signature pair is removed first: if signing fails the
    /// new manifest is left unsigned, never paired with signatures over the
    /// old bytes.
    fn publish_release(
        &self,
        distribution: &str,
    ) -> DebpoolResult<(PathBuf, ReleaseSignatures)> {
        let layout = self.config.layout();
        ReleaseSignatures::beside(&layout.release_path(distribution)).remove_existing()?;

        let release = self.release.assemble(distribution)?;
        let signatures = self.signer.sign_release(&release)?;
        Ok((release, signatures))
    }

    /// Check the distribution's Release against the files on disk
    pub fn verify(&self, distribution: &str) -> DebpoolResult<Vec<ChecksumMismatch>> {
        let lock = self.locks.get(distribution);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.release.verify(distribution)
    }

    /// Re-export the public key to its published location
    pub fn export_public_key(&self) -> DebpoolResult<PathBuf> {
        let dest = self.config.layout().public_key_path().to_path_buf();
        self.signer.export_public_key(&dest)?;
        Ok(dest)
    }

    pub fn check_key(&self) -> DebpoolResult<()> {
        self.signer.check_key()
    }
}
