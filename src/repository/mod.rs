//! The repository index and metadata engine.
//!
//! Data flows one way: a package file lands in the [`pool`], the [`index`]
//! generator derives `Packages`/`Packages.gz` from the pool, the [`release`]
//! assembler binds every index into a `Release` manifest, and the
//! [`orchestrator`] hands the manifest to the signer. Derived files are always
//! regenerated in full from the pool, never patched.

pub mod checksum;
pub mod index;
pub mod orchestrator;
pub mod pool;
pub mod release;

pub use checksum::FileChecksum;
pub use index::{IndexFiles, IndexGenerator};
pub use orchestrator::{AddOutcome, Repository, UpdateReport};
pub use pool::PoolStore;
pub use release::{ChecksumMismatch, ReleaseAssembler};
