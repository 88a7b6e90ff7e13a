//! Human-facing rendering of errors with remediation hints.

use crate::core::error::DebpoolError;

/// Provides a remediation hint for an error, when one is known.
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for DebpoolError {
    fn help(&self) -> Option<String> {
        match self {
            DebpoolError::InvalidDistribution(_) => Some(
                "Use one of the distributions listed under `distributions` in debpool.yaml"
                    .to_string(),
            ),
            DebpoolError::InvalidComponent(_) => Some(
                "Use one of the components listed under `components` in debpool.yaml".to_string(),
            ),
            DebpoolError::InvalidArchitecture(_) => Some(
                "Use one of the architectures listed under `architectures` in debpool.yaml"
                    .to_string(),
            ),
            DebpoolError::PackageNotFound(_) => {
                Some("Check the package path; it must point to an existing file".to_string())
            }
            DebpoolError::InvalidPackageFile { extension, .. } => Some(format!(
                "Only .{} files are indexed; rename the file or set `package_extension` in \
                 debpool.yaml",
                extension
            )),
            DebpoolError::Inspection { .. } => Some(
                "Run `dpkg-deb --info` on the file to see why it is not a valid package"
                    .to_string(),
            ),
            DebpoolError::Signing { .. } => Some(
                "Metadata was written but is not trusted until signed. Check the signing key \
                 with `debpool check-key`, then run `debpool update`"
                    .to_string(),
            ),
            DebpoolError::Io(_) | DebpoolError::WalkDir(_) => Some(
                "Repository may be partially updated. Fix the filesystem problem and run \
                 `debpool update` to regenerate all metadata"
                    .to_string(),
            ),
            DebpoolError::Yaml(_) | DebpoolError::Config(_) => {
                Some("Check debpool.yaml in the repository root".to_string())
            }
            DebpoolError::VerificationFailed { distribution, .. } => Some(format!(
                "Run `debpool update --distribution {}` to regenerate indices and Release",
                distribution
            )),
            DebpoolError::Path(_) => None,
        }
    }
}

/// Format an error for display on stderr, followed by its hint.
pub fn format_error_with_help(error: &DebpoolError) -> String {
    match error.help() {
        Some(help) => format!("error: {}\n  help: {}", error, help),
        None => format!("error: {}", error),
    }
}
