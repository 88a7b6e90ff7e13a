//! Common utilities for integration tests

use assert_cmd::Command;
use debpool::config::RepoConfig;
use debpool::di::mocks::{MockInspector, MockSigner};
use debpool::di::ServiceContainer;
use debpool::repository::Repository;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn debpool_command() -> Command {
    Command::cargo_bin("debpool").unwrap()
}

/// A repository rooted at `root`, wired to fresh mocks
pub fn mock_repository(root: &Path) -> (Repository, MockInspector, MockSigner) {
    mock_repository_with(RepoConfig::with_root(root))
}

/// A repository for `config`, wired to fresh mocks
pub fn mock_repository_with(config: RepoConfig) -> (Repository, MockInspector, MockSigner) {
    let inspector = MockInspector::new();
    let signer = MockSigner::new();
    let repo = Repository::new(ServiceContainer::with_providers(
        Arc::new(config),
        Arc::new(inspector.clone()),
        Arc::new(signer.clone()),
    ));
    (repo, inspector, signer)
}

/// Write an incoming package file outside the repository tree
pub fn incoming_package(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let incoming = dir.join("incoming");
    fs::create_dir_all(&incoming).unwrap();
    let path = incoming.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A `debpool.yaml` that points both external tools at `true(1)`
///
/// `true` accepts any arguments, prints nothing and succeeds, so inspection
/// yields empty control fields and signing writes no files.
pub fn write_stub_tool_config(root: &Path) {
    fs::create_dir_all(root).unwrap();
    fs::write(
        root.join("debpool.yaml"),
        "signing:\n  key_id: TESTKEY\n  gpg_program: \"true\"\n\
         inspection:\n  dpkg_deb_program: \"true\"\n",
    )
    .unwrap();
}
