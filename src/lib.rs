//! Debpool: a Debian-style package repository manager
//!
//! This crate provides the Debpool library: the package pool, per-architecture
//! `Packages` indices, the signed per-distribution `Release` manifest, and the
//! orchestrator that sequences them. Error types and the on-disk layout are
//! re-exported from `debpool-core`.

pub use debpool_core::{
    format_error_with_help, DebpoolError, DebpoolResult, ErrorHelp, ErrorKind,
};

/// Core module re-exported from debpool-core.
pub mod core;

/// Repository configuration.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// Package inspection via `dpkg-deb`.
pub mod inspect;

/// Signing via `gpg`.
pub mod signing;

/// Bounded external process execution.
pub mod process;

/// Pool, indices, Release and the orchestrator.
pub mod repository;
