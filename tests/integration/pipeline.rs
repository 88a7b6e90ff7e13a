//! End-to-end library scenarios: pool, indices, Release, signatures

use super::common::{incoming_package, mock_repository, mock_repository_with};
use debpool::config::RepoConfig;
use debpool::core::{DebpoolError, ErrorKind};
use debpool::inspect::ControlFields;
use debpool::repository::checksum::checksum_file;
use debpool::repository::release::{parse_checksum_rows, DigestKind};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use tempfile::TempDir;

#[test]
fn test_add_package_scenario() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let (repo, _, _) = mock_repository(&root);
    let source = incoming_package(temp.path(), "foo_1.0.0_amd64.deb", b"foo package bytes");

    let outcome = repo.add_package(&source, "stable", "main").unwrap();

    let stored = root.join("pool/main/foo_1.0.0_amd64.deb");
    assert_eq!(outcome.stored, stored);
    let sum = checksum_file(&stored).unwrap();

    let packages =
        fs::read_to_string(root.join("dists/stable/main/binary-amd64/Packages")).unwrap();
    assert!(packages.contains("Package: foo\n"));
    assert!(packages.contains("Version: 1.0.0\n"));
    assert!(packages.contains("Architecture: amd64\n"));
    assert!(packages.contains("Filename: pool/main/foo_1.0.0_amd64.deb\n"));
    assert!(packages.contains(&format!("Size: {}\n", sum.size)));
    assert!(packages.contains(&format!("MD5sum: {}\n", sum.md5)));
    assert!(packages.contains(&format!("SHA256: {}\n", sum.sha256)));

    let release = fs::read_to_string(root.join("dists/stable/Release")).unwrap();
    let rows = parse_checksum_rows(&release);
    for path in [
        "main/binary-amd64/Packages",
        "main/binary-amd64/Packages.gz",
    ] {
        let listed: Vec<_> = rows.iter().filter(|r| r.path == path).collect();
        assert_eq!(listed.len(), 2, "{} should have one row per digest", path);
        let on_disk = checksum_file(&root.join("dists/stable").join(path)).unwrap();
        for row in listed {
            assert_eq!(row.size, on_disk.size);
            match row.kind {
                DigestKind::Md5 => assert_eq!(row.digest, on_disk.md5),
                DigestKind::Sha256 => assert_eq!(row.digest, on_disk.sha256),
            }
        }
    }
}

#[test]
fn test_add_package_scenario_with_pkg_extension() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let config = RepoConfig {
        package_extension: "pkg".to_string(),
        ..RepoConfig::with_root(&root)
    };
    let (repo, _, signer) = mock_repository_with(config);
    let source = incoming_package(temp.path(), "foo_1.0.0_amd64.pkg", b"foo");

    let outcome = repo.add_package(&source, "stable", "main").unwrap();

    assert_eq!(outcome.stored, root.join("pool/main/foo_1.0.0_amd64.pkg"));
    assert_eq!(outcome.indices.len(), 2);
    assert!(outcome.indices.iter().all(|i| i.package_count == 1));
    let packages =
        fs::read_to_string(root.join("dists/stable/main/binary-amd64/Packages")).unwrap();
    assert!(packages.starts_with("Package: foo\nVersion: 1.0.0\nArchitecture: amd64\n"));
    assert!(packages.contains("Filename: pool/main/foo_1.0.0_amd64.pkg\n"));
    assert_eq!(signer.calls().len(), 2);
}

#[test]
fn test_unindexable_extension_is_rejected_before_any_write() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let (repo, inspector, signer) = mock_repository(&root);
    let source = incoming_package(temp.path(), "foo_1.0.0_amd64.pkg", b"foo");

    let err = repo.add_package(&source, "stable", "main").unwrap_err();

    assert!(matches!(err, DebpoolError::InvalidPackageFile { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!root.exists());
    assert!(inspector.calls().is_empty());
    assert!(signer.calls().is_empty());
}

#[test]
fn test_empty_distribution_scenario() {
    let temp = TempDir::new().unwrap();
    let (repo, _, _) = mock_repository(temp.path());

    let report = repo.update_indices("stable").unwrap();

    assert!(report.indices.is_empty());
    let release = fs::read_to_string(&report.release).unwrap();
    for header in [
        "Origin: ",
        "Label: ",
        "Suite: stable",
        "Codename: stable",
        "Date: ",
        "Architectures: amd64 i386",
        "Components: main contrib non-free",
        "Description: ",
    ] {
        assert!(release.contains(header), "missing {}", header);
    }
    assert!(parse_checksum_rows(&release).is_empty());
    assert!(!temp.path().join("dists/stable/main").exists());
}

#[test]
fn test_index_lists_every_pool_package_once() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let (repo, _, _) = mock_repository(&root);

    let names = ["alpha_1.0_amd64.deb", "beta_2.1-3_amd64.deb", "gamma_0.9_all.deb"];
    for name in names {
        let source = incoming_package(temp.path(), name, name.as_bytes());
        repo.add_package(&source, "testing", "contrib").unwrap();
    }

    let path = root.join("dists/testing/contrib/binary-i386/Packages");
    let packages = fs::read_to_string(&path).unwrap();
    let stanzas: Vec<&str> = packages
        .split("\n\n")
        .filter(|s| !s.trim().is_empty())
        .collect();
    assert_eq!(stanzas.len(), names.len());
    for package in ["alpha", "beta", "gamma"] {
        assert_eq!(
            packages.matches(&format!("Package: {}\n", package)).count(),
            1
        );
    }

    let mut decoded = Vec::new();
    GzDecoder::new(fs::File::open(path.with_extension("gz")).unwrap())
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, packages.as_bytes());
}

#[test]
fn test_regeneration_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let (repo, _, _) = mock_repository(&root);
    let source = incoming_package(temp.path(), "foo_1.0_amd64.deb", b"foo");
    repo.add_package(&source, "stable", "main").unwrap();

    let packages = root.join("dists/stable/main/binary-amd64/Packages");
    let compressed = root.join("dists/stable/main/binary-amd64/Packages.gz");
    let before = (fs::read(&packages).unwrap(), fs::read(&compressed).unwrap());

    repo.update_indices("stable").unwrap();
    repo.update_indices("stable").unwrap();

    assert_eq!(fs::read(&packages).unwrap(), before.0);
    assert_eq!(fs::read(&compressed).unwrap(), before.1);
    assert!(repo.verify("stable").unwrap().is_empty());
}

#[test]
fn test_invalid_package_is_skipped_during_update() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let (repo, inspector, _) = mock_repository(&root);
    for name in ["good_1.0_amd64.deb", "broken_1.0_amd64.deb"] {
        let source = incoming_package(temp.path(), name, name.as_bytes());
        repo.add_package(&source, "stable", "main").unwrap();
    }

    inspector.reject("broken_1.0_amd64.deb");
    let report = repo.update_indices("stable").unwrap();

    assert!(report.indices.iter().all(|i| i.package_count == 1));
    let packages =
        fs::read_to_string(root.join("dists/stable/main/binary-amd64/Packages")).unwrap();
    assert!(packages.contains("Package: good\n"));
    assert!(!packages.contains("Package: broken\n"));
}

#[test]
fn test_inspected_fields_take_precedence_over_filename() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let (repo, inspector, _) = mock_repository(&root);

    let mut fields = ControlFields::new();
    fields.insert("Package", "libfoo_bar");
    fields.insert("Version", "2:1.2_rc1");
    fields.insert("Architecture", "amd64");
    fields.insert("Maintainer", "Ops <ops@example.org>");
    inspector.set_fields("renamed.deb", fields);

    let source = incoming_package(temp.path(), "renamed.deb", b"payload");
    repo.add_package(&source, "stable", "main").unwrap();

    let packages =
        fs::read_to_string(root.join("dists/stable/main/binary-amd64/Packages")).unwrap();
    assert!(packages.starts_with(
        "Package: libfoo_bar\nVersion: 2:1.2_rc1\nArchitecture: amd64\n\
         Maintainer: Ops <ops@example.org>\nFilename: pool/main/renamed.deb\n"
    ));
}

#[test]
fn test_rejected_inputs_leave_repository_untouched() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("repo");
    let (repo, _, signer) = mock_repository(&root);
    let source = incoming_package(temp.path(), "foo_1.0_amd64.deb", b"foo");

    for (distribution, component) in [("stable", "universe"), ("sid", "main")] {
        let err = repo
            .add_package(&source, distribution, component)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    assert!(!root.exists());
    assert!(signer.calls().is_empty());
}
