use predicates::prelude::*;

use super::validator;

#[test]
fn test_list_prints_checks_in_order() {
    let output = validator().arg("list").assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let names: Vec<&str> = stdout.lines().collect();

    assert_eq!(names.len(), 13);
    assert_eq!(names.first(), Some(&"IstioctlArchive"));
    assert_eq!(names.last(), Some(&"Rpm"));
}

#[test]
fn test_list_json() {
    validator()
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"HelmChartVersions\""));
}
