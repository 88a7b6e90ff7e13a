//! Dependency injection infrastructure for Debpool
//!
//! The engine reaches the two external tools (package inspection and
//! signing) only through the traits in [`traits`], so tests can run the
//! whole pipeline against the fakes in [`mocks`].
//!
//! # Example (Production)
//! ```no_run
//! use debpool::config::RepoConfig;
//! use debpool::di::ServiceContainer;
//!
//! # fn example() -> debpool::core::DebpoolResult<()> {
//! let config = RepoConfig::load(std::path::Path::new("/srv/repo"))?;
//! let container = ServiceContainer::new(config);
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use debpool::config::RepoConfig;
//! use debpool::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(RepoConfig::with_root("/tmp/repo"));
//! let inspector = Arc::new(MockInspector::new());
//! let signer = Arc::new(MockSigner::new());
//!
//! let container = ServiceContainer::with_providers(config, inspector, signer);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{PackageInspector, Signer};
