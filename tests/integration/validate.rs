use predicates::prelude::*;
use release_validator::test_utils::ReleaseFixture;

use super::validator;

const FILESYSTEM_CHECKS: &[&str] = &[
    "TestDocker",
    "HelmVersionsIstio",
    "IstioctlProfiles",
    "Manifest",
    "Grafana",
    "Licenses",
    "CompletionFiles",
    "Debian",
    "Rpm",
];

fn validate_args(fixture: &ReleaseFixture, checks: &[&str]) -> Vec<String> {
    let mut args = vec![
        "validate".to_string(),
        "--release".to_string(),
        fixture.release_dir().display().to_string(),
        "--archive-dir".to_string(),
        fixture.archive_dir().display().to_string(),
    ];
    for check in checks {
        args.push("--check".to_string());
        args.push(check.to_string());
    }
    args
}

#[test]
fn test_complete_release_passes() {
    let fixture = ReleaseFixture::new("1.24.0");
    fixture.populate();

    validator()
        .args(validate_args(&fixture, FILESYSTEM_CHECKS))
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Grafana"))
        .stdout(predicate::str::contains("9 passed, 0 failed"));
}

#[test]
fn test_failures_are_all_reported() {
    let fixture = ReleaseFixture::new("1.24.0");
    fixture.populate();
    std::fs::remove_file(fixture.release_dir().join("rpm/istio-sidecar.rpm")).unwrap();
    std::fs::remove_file(fixture.release_dir().join("licenses/tools.tar.gz")).unwrap();

    validator()
        .args(validate_args(&fixture, FILESYSTEM_CHECKS))
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ check Licenses failed: failed to find licenses for: tools.tar.gz"))
        .stdout(predicate::str::contains("✗ check Rpm failed: rpm package not found"))
        .stdout(predicate::str::contains("Files in release:"))
        .stdout(predicate::str::contains("7 passed, 2 failed"))
        .stderr(predicate::str::contains("validation failed: 2 of 9 checks failed"));
}

#[test]
fn test_json_output() {
    let fixture = ReleaseFixture::new("1.24.0");
    fixture.populate();
    std::fs::remove_file(fixture.archive_dir().join("tools/_istioctl")).unwrap();

    let assert = validator()
        .args(validate_args(&fixture, &["CompletionFiles", "Debian"]))
        .args(["--format", "json"])
        .assert()
        .failure();

    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["succeeded"], serde_json::json!(["Debian"]));
    assert!(json["failures"][0].as_str().unwrap().starts_with("check CompletionFiles failed: "));
    assert!(json["report"].as_str().unwrap().contains("Files in archive:"));
}

#[test]
fn test_report_file() {
    let fixture = ReleaseFixture::new("1.24.0");
    let out = tempfile::TempDir::new().unwrap();
    let report = out.path().join("report.txt");

    validator()
        .args(validate_args(&fixture, &["Debian"]))
        .args(["--quiet", "--report"])
        .arg(&report)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Files in release:").not());

    let text = std::fs::read_to_string(&report).unwrap();
    assert!(text.starts_with("Checks failed. Release info:"));
    assert!(text.contains("manifest.yaml"));
}

#[test]
fn test_dev_build_skips_packaged_charts() {
    let fixture = ReleaseFixture::new("dev-build");

    validator()
        .args(validate_args(&fixture, &["HelmChartVersions"]))
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ HelmChartVersions"));
}

#[test]
fn test_missing_release_flag() {
    validator()
        .args(["validate", "--format", "json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("--release must be passed"));
}

#[test]
fn test_missing_manifest_is_single_failure() {
    let temp = tempfile::TempDir::new().unwrap();

    validator()
        .args(["validate", "--release"])
        .arg(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ invalid release manifest"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_unknown_check_lists_known_names() {
    let fixture = ReleaseFixture::new("1.24.0");

    validator()
        .args(validate_args(&fixture, &["Bogus"]))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown check 'Bogus'"))
        .stderr(predicate::str::contains("IstioctlStandalone"));
}

#[test]
fn test_invalid_config_file() {
    let fixture = ReleaseFixture::new("1.24.0");
    let config = fixture.release_dir().join("validator.toml");
    std::fs::write(&config, "command_timeout_secs = \"never\"\n").unwrap();

    validator()
        .args(validate_args(&fixture, &["Manifest"]))
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse validator config"));
}

#[cfg(unix)]
#[test]
fn test_extracts_primary_archive() {
    let fixture = ReleaseFixture::new("1.24.0");
    let staging = tempfile::TempDir::new().unwrap();
    let root = staging.path().join("istio-1.24.0");
    std::fs::create_dir_all(root.join("tools")).unwrap();
    std::fs::write(root.join("tools/istioctl.bash"), "").unwrap();
    std::fs::write(root.join("tools/_istioctl"), "").unwrap();

    let archive = fixture.release_dir().join("istio-1.24.0-linux-amd64.tar.gz");
    let status = std::process::Command::new("tar")
        .arg("czf")
        .arg(&archive)
        .arg("-C")
        .arg(staging.path())
        .arg("istio-1.24.0")
        .status()
        .unwrap();
    assert!(status.success());

    validator()
        .args(["validate", "--release"])
        .arg(fixture.release_dir())
        .args(["--check", "CompletionFiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ CompletionFiles"));
}
