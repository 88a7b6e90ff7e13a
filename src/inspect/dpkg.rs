use crate::config::InspectionConfig;
use crate::core::{DebpoolError, DebpoolResult};
use crate::di::PackageInspector;
use crate::inspect::ControlFields;
use crate::process::{run_with_timeout, stderr_summary, ProcessOutcome};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Inspects packages with `dpkg-deb --field`
pub struct DpkgInspector {
    config: InspectionConfig,
}

impl DpkgInspector {
    pub fn new(config: InspectionConfig) -> Self {
        Self { config }
    }
}

impl PackageInspector for DpkgInspector {
    fn inspect(&self, path: &Path) -> DebpoolResult<ControlFields> {
        let mut cmd = Command::new(&self.config.dpkg_deb_program);
        cmd.arg("--field").arg(path);

        let outcome = run_with_timeout(cmd, self.config.timeout()).map_err(|e| {
            DebpoolError::inspection(
                path,
                format!("failed to run {}: {}", self.config.dpkg_deb_program, e),
            )
        })?;

        match outcome {
            ProcessOutcome::Completed(output) if output.status.success() => {
                let fields = ControlFields::parse(&String::from_utf8_lossy(&output.stdout));
                debug!(path = %path.display(), fields = fields.len(), "Inspected package");
                Ok(fields)
            }
            ProcessOutcome::Completed(output) => {
                Err(DebpoolError::inspection(path, stderr_summary(&output)))
            }
            ProcessOutcome::TimedOut => Err(DebpoolError::inspection(
                path,
                format!("timed out after {} seconds", self.config.timeout_secs),
            )),
        }
    }
}
