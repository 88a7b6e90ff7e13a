//! Mock implementations of service traits for testing

use super::traits::{PackageInspector, Signer};
use crate::core::{DebpoolError, DebpoolResult};
use crate::inspect::ControlFields;
use crate::signing::{detached_signature_path, ReleaseSignatures};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock package inspector for testing
///
/// Accepts every file by default and returns no control fields, so stanza
/// identity falls back to the filename. Individual files can be rejected or
/// given explicit fields.
///
/// # Example
///
/// ```
/// use debpool::di::mocks::MockInspector;
/// use debpool::di::PackageInspector;
/// use std::path::Path;
///
/// let inspector = MockInspector::new();
/// inspector.reject("broken_1.0_amd64.deb");
///
/// assert!(inspector.inspect(Path::new("/pool/main/broken_1.0_amd64.deb")).is_err());
/// assert!(inspector.inspect(Path::new("/pool/main/ok_1.0_amd64.deb")).is_ok());
/// ```
#[derive(Clone, Default)]
pub struct MockInspector {
    rejected: Arc<Mutex<HashSet<String>>>,
    fields: Arc<Mutex<HashMap<String, ControlFields>>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockInspector {
    /// Create a new mock inspector
    pub fn new() -> Self {
        Self::default()
    }

    /// Make inspection of `file_name` fail
    pub fn reject(&self, file_name: &str) {
        self.rejected.lock().unwrap().insert(file_name.to_string());
    }

    /// Return `fields` when `file_name` is inspected
    pub fn set_fields(&self, file_name: &str, fields: ControlFields) {
        self.fields
            .lock()
            .unwrap()
            .insert(file_name.to_string(), fields);
    }

    /// Every path inspected so far, in call order
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl PackageInspector for MockInspector {
    fn inspect(&self, path: &Path) -> DebpoolResult<ControlFields> {
        self.calls.lock().unwrap().push(path.to_path_buf());

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.rejected.lock().unwrap().contains(&file_name) {
            return Err(DebpoolError::inspection(path, "not a debian package"));
        }

        Ok(self
            .fields
            .lock()
            .unwrap()
            .get(&file_name)
            .cloned()
            .unwrap_or_default())
    }
}

/// A signing request observed by [`MockSigner`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignCall {
    File(PathBuf),
    Release(PathBuf),
    ExportKey(PathBuf),
}

/// Mock signer for testing
///
/// Writes placeholder signature files where a real signer would, so
/// layout assertions work, and records every request.
#[derive(Clone, Default)]
pub struct MockSigner {
    fail_files: Arc<Mutex<bool>>,
    fail_release: Arc<Mutex<bool>>,
    key_missing: Arc<Mutex<bool>>,
    calls: Arc<Mutex<Vec<SignCall>>>,
}

impl MockSigner {
    /// Create a new mock signer
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `sign_file` fail
    pub fn fail_files(&self) {
        *self.fail_files.lock().unwrap() = true;
    }

    /// Make `sign_release` fail
    pub fn fail_release(&self) {
        *self.fail_release.lock().unwrap() = true;
    }

    /// Make `check_key` and `export_public_key` fail
    pub fn remove_key(&self) {
        *self.key_missing.lock().unwrap() = true;
    }

    /// Every request seen so far, in call order
    pub fn calls(&self) -> Vec<SignCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Signer for MockSigner {
    fn sign_file(&self, path: &Path) -> DebpoolResult<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .push(SignCall::File(path.to_path_buf()));

        if *self.fail_files.lock().unwrap() {
            return Err(DebpoolError::signing(path, "mock signer refused"));
        }

        let signature = detached_signature_path(path);
        fs::write(&signature, b"mock detached signature\n")?;
        Ok(signature)
    }

    fn sign_release(&self, release: &Path) -> DebpoolResult<ReleaseSignatures> {
        self.calls
            .lock()
            .unwrap()
            .push(SignCall::Release(release.to_path_buf()));

        if *self.fail_release.lock().unwrap() {
            return Err(DebpoolError::signing(release, "mock signer refused"));
        }

        let signatures = ReleaseSignatures::beside(release);
        let content = fs::read(release)?;
        fs::write(&signatures.detached, b"mock detached signature\n")?;
        let mut inline = b"-----BEGIN PGP SIGNED MESSAGE-----\n\n".to_vec();
        inline.extend_from_slice(&content);
        inline.extend_from_slice(
            b"-----BEGIN PGP SIGNATURE-----\nmock\n-----END PGP SIGNATURE-----\n",
        );
        fs::write(&signatures.inline, inline)?;
        Ok(signatures)
    }

    fn export_public_key(&self, dest: &Path) -> DebpoolResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(SignCall::ExportKey(dest.to_path_buf()));

        if *self.key_missing.lock().unwrap() {
            return Err(DebpoolError::signing(dest, "no such key"));
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, b"-----BEGIN PGP PUBLIC KEY BLOCK-----\nmock\n")?;
        Ok(())
    }

    fn check_key(&self) -> DebpoolResult<()> {
        if *self.key_missing.lock().unwrap() {
            return Err(DebpoolError::signing("mock-key", "no such key"));
        }
        Ok(())
    }
}
