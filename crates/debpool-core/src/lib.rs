//! Core utilities shared by the Debpool library and binary.
//!
//! Holds the error type, error help rendering, and the on-disk repository
//! layout contract consumed by APT clients.

pub mod core;

pub use crate::core::error::{DebpoolError, DebpoolResult, ErrorKind};
pub use crate::core::error_help::{format_error_with_help, ErrorHelp};
pub use crate::core::layout::RepoLayout;
