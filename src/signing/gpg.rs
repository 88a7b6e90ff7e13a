use super::{detached_signature_path, ReleaseSignatures};
use crate::config::SigningConfig;
use crate::core::{write_atomic, DebpoolError, DebpoolResult};
use crate::di::Signer;
use crate::process::{run_with_timeout, stderr_summary, ProcessOutcome};
use std::path::Path;
use std::process::{Command, Output};
use tracing::{debug, info};

/// Signs files with GnuPG using the configured key
pub struct GpgSigner {
    config: SigningConfig,
}

impl GpgSigner {
    pub fn new(config: SigningConfig) -> Self {
        Self { config }
    }

    /// `gpg --batch --yes [--homedir H]` with the signing key selected
    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.gpg_program);
        cmd.arg("--batch").arg("--yes");
        if let Some(homedir) = &self.config.homedir {
            cmd.arg("--homedir").arg(homedir);
        }
        cmd
    }

    /// Run a gpg invocation; any failure is reported against `target`
    fn run(&self, cmd: Command, target: &Path) -> DebpoolResult<Output> {
        let outcome = run_with_timeout(cmd, self.config.timeout()).map_err(|e| {
            DebpoolError::signing(
                target,
                format!("failed to run {}: {}", self.config.gpg_program, e),
            )
        })?;

        match outcome {
            ProcessOutcome::Completed(output) if output.status.success() => Ok(output),
            ProcessOutcome::Completed(output) => {
                Err(DebpoolError::signing(target, stderr_summary(&output)))
            }
            ProcessOutcome::TimedOut => Err(DebpoolError::signing(
                target,
                format!("timed out after {} seconds", self.config.timeout_secs),
            )),
        }
    }
}

impl Signer for GpgSigner {
    fn sign_file(&self, path: &Path) -> DebpoolResult<std::path::PathBuf> {
        let signature = detached_signature_path(path);

        let mut cmd = self.command();
        cmd.arg("--default-key")
            .arg(&self.config.key_id)
            .args(["--armor", "--detach-sign", "-o"])
            .arg(&signature)
            .arg(path);
        self.run(cmd, path)?;

        info!(file = %path.display(), "Signed package");
        Ok(signature)
    }

    fn sign_release(&self, release: &Path) -> DebpoolResult<ReleaseSignatures> {
        if !release.exists() {
            return Err(DebpoolError::signing(release, "Release file not found"));
        }
        let signatures = ReleaseSignatures::beside(release);

        let mut detached = self.command();
        detached
            .arg("--default-key")
            .arg(&self.config.key_id)
            .arg("-abs")
            .arg("-o")
            .arg(&signatures.detached)
            .arg(release);
        self.run(detached, release)?;
        debug!(path = %signatures.detached.display(), "Wrote detached Release signature");

        let mut inline = self.command();
        inline
            .arg("--default-key")
            .arg(&self.config.key_id)
            .arg("--clearsign")
            .arg("-o")
            .arg(&signatures.inline)
            .arg(release);
        self.run(inline, release)?;
        debug!(path = %signatures.inline.display(), "Wrote InRelease");

        info!(release = %release.display(), "Signed Release");
        Ok(signatures)
    }

    fn export_public_key(&self, dest: &Path) -> DebpoolResult<()> {
        let mut cmd = self.command();
        cmd.args(["--export", "--armor"]).arg(&self.config.key_id);
        let output = self.run(cmd, dest)?;

        if output.stdout.is_empty() {
            return Err(DebpoolError::signing(
                dest,
                format!("key {} not found in keyring", self.config.key_id),
            ));
        }
        write_atomic(dest, &output.stdout)?;
        info!(path = %dest.display(), "Exported public key");
        Ok(())
    }

    fn check_key(&self) -> DebpoolResult<()> {
        let mut cmd = self.command();
        cmd.arg("--list-secret-keys").arg(&self.config.key_id);
        self.run(cmd, Path::new(&self.config.key_id)).map(|_| ())
    }
}
