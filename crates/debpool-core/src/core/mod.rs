pub mod error;
pub mod error_help;
pub mod layout;

pub use error::{DebpoolError, DebpoolResult, ErrorKind};
pub use layout::{ensure_dir, write_atomic, RepoLayout};
