//! Tests for the `debpool` binary

use super::common::{debpool_command, incoming_package, write_stub_tool_config};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_add_package_invalid_component_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    write_stub_tool_config(&root);
    let source = incoming_package(temp.path(), "foo_1.0_amd64.deb", b"foo");

    debpool_command()
        .arg("--root")
        .arg(&root)
        .arg("add-package")
        .arg(&source)
        .args(["stable", "universe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid component: universe"))
        .stderr(predicate::str::contains("help:"));

    assert!(!root.join("pool").exists());
    assert!(!root.join("dists").exists());
}

#[test]
fn test_add_package_invalid_distribution() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    write_stub_tool_config(&root);
    let source = incoming_package(temp.path(), "foo_1.0_amd64.deb", b"foo");

    debpool_command()
        .arg("--root")
        .arg(&root)
        .arg("add-package")
        .arg(&source)
        .args(["sid", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid distribution: sid"));

    assert!(!root.join("pool").exists());
}

#[test]
fn test_add_package_missing_file() {
    let temp = TempDir::new().unwrap();

    debpool_command()
        .arg("--root")
        .arg(temp.path())
        .args(["add-package", "nowhere.deb", "stable", "main"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package file not found"));
}

#[test]
fn test_add_package_with_stub_tools_publishes_indices() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    write_stub_tool_config(&root);
    let source = incoming_package(temp.path(), "foo_1.0.0_amd64.deb", b"foo");

    debpool_command()
        .arg("--root")
        .arg(&root)
        .arg("add-package")
        .arg(&source)
        .args(["stable", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added pool/main/foo_1.0.0_amd64.deb"));

    let packages =
        fs::read_to_string(root.join("dists/stable/main/binary-amd64/Packages")).unwrap();
    assert!(packages.starts_with("Package: foo\nVersion: 1.0.0\nArchitecture: amd64\n"));
    assert!(root.join("dists/stable/Release").is_file());

    debpool_command()
        .arg("--root")
        .arg(&root)
        .args(["verify", "--distribution", "stable"])
        .assert()
        .success();
}

#[test]
fn test_update_all_distributions_with_stub_tools() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    write_stub_tool_config(&root);

    debpool_command()
        .arg("--root")
        .arg(&root)
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("stable:"))
        .stdout(predicate::str::contains("testing:"));

    let release = fs::read_to_string(root.join("dists/testing/Release")).unwrap();
    assert!(release.ends_with("MD5Sum:\nSHA256:\n"));
}

#[test]
fn test_verify_reports_tampered_index() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    write_stub_tool_config(&root);
    fs::create_dir_all(root.join("pool/main")).unwrap();
    fs::write(root.join("pool/main/foo_1.0_amd64.deb"), b"foo").unwrap();

    debpool_command()
        .arg("--root")
        .arg(&root)
        .args(["update", "--distribution", "stable"])
        .assert()
        .success();

    fs::write(
        root.join("dists/stable/main/binary-i386/Packages"),
        "Package: evil\n\n",
    )
    .unwrap();

    debpool_command()
        .arg("--root")
        .arg(&root)
        .args(["verify", "--distribution", "stable"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("main/binary-i386/Packages"))
        .stderr(predicate::str::contains("Release verification failed"));
}

#[test]
fn test_list_pool_packages() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pool/contrib")).unwrap();
    fs::write(root.join("pool/contrib/bar_2.0_i386.deb"), b"bar").unwrap();
    fs::write(root.join("pool/contrib/bar_2.0_i386.deb.asc"), b"sig").unwrap();

    debpool_command()
        .arg("--root")
        .arg(root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pool/contrib/bar_2.0_i386.deb"))
        .stdout(predicate::str::contains(".asc").not())
        .stdout(predicate::str::contains("1 package(s)"));
}

#[test]
fn test_list_empty_and_unknown_component() {
    let temp = TempDir::new().unwrap();

    debpool_command()
        .arg("--root")
        .arg(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages in pool."));

    debpool_command()
        .arg("--root")
        .arg(temp.path())
        .args(["list", "--component", "universe"])
        .assert()
        .failure();
}

#[test]
fn test_init_creates_skeleton_but_reports_missing_key() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    write_stub_tool_config(&root);

    // `true` exports no key material
    debpool_command()
        .arg("--root")
        .arg(&root)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in keyring"));

    assert!(root.join("pool/non-free").is_dir());
    assert!(root.join("dists/stable/main/binary-amd64").is_dir());
    assert!(root.join("web").is_dir());
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("debpool.yaml"), "components: []\n").unwrap();

    debpool_command()
        .arg("--root")
        .arg(temp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("debpool.yaml"));
}
