//! Core module re-exports.
//!
//! The error types and on-disk layout live in `debpool-core`; `layout`,
//! `error` and `error_help` are reachable here as submodules.

pub use debpool_core::core::*;
pub use debpool_core::*;
