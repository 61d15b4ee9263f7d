//! End-to-end tests for the `pinsync status` command.

mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_json_reports_latest_tag() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("engine", &["v1.0.0", "v1.1.0"]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\nlibs/missing\n");

    let output = fixture
        .command()
        .args(["status", "--fetch", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reports[0]["path"], "libs/engine");
    assert_eq!(reports[0]["checked_out"], true);
    assert_eq!(reports[0]["current_tag"], "v1.1.0");
    assert_eq!(reports[0]["latest_tag"], "v1.1.0");
    assert_eq!(reports[0]["up_to_date"], true);
    assert_eq!(reports[1]["registered"], false);
    assert_eq!(reports[1]["checked_out"], false);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_text_flags_outdated_dependency() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("engine", &["v1.0.0"]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\n");
    fixture.release("engine", "v2.0.0");

    fixture
        .command()
        .args(["status", "--fetch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("libs/engine at v1.0.0, latest is v2.0.0"));
}
