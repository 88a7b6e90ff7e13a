//! Service container for dependency injection

use super::traits::{PackageInspector, Signer};
use crate::config::RepoConfig;
use crate::inspect::DpkgInspector;
use crate::signing::GpgSigner;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the configuration and the two external collaborators as trait
/// objects, so production and test wiring differ only in construction.
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<RepoConfig>,
    pub inspector: Arc<dyn PackageInspector>,
    pub signer: Arc<dyn Signer>,
}

impl ServiceContainer {
    /// Create a container backed by `dpkg-deb` and `gpg`
    pub fn new(config: RepoConfig) -> Self {
        let config = Arc::new(config);
        Self {
            inspector: Arc::new(DpkgInspector::new(config.inspection.clone())),
            signer: Arc::new(GpgSigner::new(config.signing.clone())),
            config,
        }
    }

    /// Create a container with custom collaborators
    ///
    /// This is primarily useful for testing, where mock implementations
    /// stand in for the external tools.
    pub fn with_providers(
        config: Arc<RepoConfig>,
        inspector: Arc<dyn PackageInspector>,
        signer: Arc<dyn Signer>,
    ) -> Self {
        Self {
            config,
            inspector,
            signer,
        }
    }
}
