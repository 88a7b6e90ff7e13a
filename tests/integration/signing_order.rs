//! Signing sequence checks against a strict mockall signer

use super::common::incoming_package;
use debpool::config::RepoConfig;
use debpool::core::{DebpoolError, DebpoolResult, ErrorKind};
use debpool::di::mocks::MockInspector;
use debpool::di::{ServiceContainer, Signer};
use debpool::repository::Repository;
use debpool::signing::ReleaseSignatures;
use mockall::{mock, predicate, Sequence};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

mock! {
    pub Gpg {}

    impl Signer for Gpg {
        fn sign_file(&self, path: &Path) -> DebpoolResult<PathBuf>;
        fn sign_release(&self, release: &Path) -> DebpoolResult<ReleaseSignatures>;
        fn export_public_key(&self, dest: &Path) -> DebpoolResult<()>;
        fn check_key(&self) -> DebpoolResult<()>;
    }
}

fn repository(root: &Path, signer: MockGpg) -> Repository {
    Repository::new(ServiceContainer::with_providers(
        Arc::new(RepoConfig::with_root(root)),
        Arc::new(MockInspector::new()),
        Arc::new(signer),
    ))
}

#[test]
fn test_release_is_signed_after_it_is_written_then_package() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let release = root.join("dists/stable/Release");
    let stored = root.join("pool/main/foo_1.0_amd64.deb");

    let mut seq = Sequence::new();
    let mut signer = MockGpg::new();
    let release_check = release.clone();
    signer
        .expect_sign_release()
        .with(predicate::eq(release.clone()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |path| {
            // Every index the manifest references is already final
            assert!(release_check.is_file());
            Ok(ReleaseSignatures::beside(path))
        });
    signer
        .expect_sign_file()
        .with(predicate::eq(stored.clone()))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|path| Ok(path.with_extension("deb.asc")));
    signer.expect_export_public_key().never();

    let source = incoming_package(temp.path(), "foo_1.0_amd64.deb", b"foo");
    let outcome = repository(&root, signer)
        .add_package(&source, "stable", "main")
        .unwrap();

    assert_eq!(outcome.release, release);
    assert_eq!(outcome.package_signature, root.join("pool/main/foo_1.0_amd64.deb.asc"));
}

#[test]
fn test_package_signing_failure_is_reported() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");

    let mut signer = MockGpg::new();
    signer
        .expect_sign_release()
        .times(1)
        .returning(|path| Ok(ReleaseSignatures::beside(path)));
    signer
        .expect_sign_file()
        .times(1)
        .returning(|path| Err(DebpoolError::signing(path, "card removed")));

    let source = incoming_package(temp.path(), "foo_1.0_amd64.deb", b"foo");
    let err = repository(&root, signer)
        .add_package(&source, "stable", "main")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Signing);
    assert!(err.to_string().contains("card removed"));
    assert!(root.join("dists/stable/Release").is_file());
}

#[test]
fn test_update_signs_release_only() {
    let temp = TempDir::new().unwrap();

    let mut signer = MockGpg::new();
    signer
        .expect_sign_release()
        .times(1)
        .returning(|path| Ok(ReleaseSignatures::beside(path)));
    signer.expect_sign_file().never();

    let report = repository(temp.path(), signer)
        .update_indices("testing")
        .unwrap();
    assert_eq!(report.signatures.detached, temp.path().join("dists/testing/Release.gpg"));
}
