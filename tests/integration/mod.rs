//! Integration tests module
//!
//! Library pipeline tests drive the engine through mock collaborators; CLI
//! tests run the `debpool` binary with stand-in external tools.

pub mod cli;
pub mod common;
pub mod pipeline;
pub mod signing_order;
