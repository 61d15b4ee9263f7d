//! End-to-end tests for the `pinsync update` command against real git
//! repositories.

mod common;
use common::prelude::*;

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_outside_git_repository_is_fatal() {
    let fixture = TestFixture::new().with_entries("libs/engine\n");

    fixture
        .command()
        .arg("update")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not inside a git repository"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_empty_entry_list_succeeds() {
    let fixture = TestFixture::new()
        .with_git_project()
        .with_entries("# nothing yet\n\n");

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_pins_highest_version_and_commits() {
    let fixture = TestFixture::new().with_git_project();
    // Creation order differs from version order
    let url = fixture.upstream("engine", &["v1.9.0", "v2.0.0", "v1.10.0", "v1.9.9"]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\n");

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("libs/engine pinned to v2.0.0"))
        .stdout(predicate::str::contains("Committed pointer update"));

    let engine = fixture.path().join("libs/engine");
    assert_eq!(git(&engine, &["describe", "--tags", "--exact-match"]), "v2.0.0");
    assert_eq!(
        fixture.git(&["log", "-1", "--format=%s"]),
        "Update submodule libs/engine to v2.0.0"
    );
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_second_run_has_nothing_to_commit() {
    let fixture = TestFixture::new().with_git_project();
    // The submodule starts out at v1.0.0, the last one created
    let url = fixture.upstream("engine", &["v1.1.0", "v1.0.0"]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\n");

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed pointer update"));
    let commits = fixture.git(&["rev-list", "--count", "HEAD"]);

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to commit"));
    assert_eq!(fixture.git(&["rev-list", "--count", "HEAD"]), commits);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_new_upstream_release_is_picked_up() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("engine", &["v1.0.0"]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\n");

    fixture.command().arg("update").assert().success();
    fixture.release("engine", "v1.1.0");

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("libs/engine pinned to v1.1.0"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_no_commit_leaves_project_history_alone() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("engine", &["v1.0.0", "v1.1.0"]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\n");
    let head = fixture.git(&["rev-parse", "HEAD"]);

    fixture
        .command()
        .args(["update", "--no-commit"])
        .assert()
        .success();

    assert_eq!(fixture.git(&["rev-parse", "HEAD"]), head);
    let engine = fixture.path().join("libs/engine");
    assert_eq!(git(&engine, &["describe", "--tags", "--exact-match"]), "v1.1.0");
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_untagged_dependency_follows_default_branch() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("engine", &[]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\n");

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("no tags"))
        .stdout(predicate::str::contains("origin/main"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_unregistered_url_is_not_added_without_confirmation() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("widgets", &["v0.1.0"]);
    let fixture = fixture.with_entries(&format!("{}\n", url));

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("registration declined"));

    assert!(!fixture.path().join("widgets").exists());
    assert!(!fixture.path().join(".gitmodules").exists());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_yes_registers_and_pins_new_dependency() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("widgets", &["v0.1.0", "v0.2.0"]);
    let fixture = fixture.with_entries(&format!("{}\n", url));

    fixture
        .command()
        .args(["update", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("widgets pinned to v0.2.0"));

    let gitmodules = std::fs::read_to_string(fixture.path().join(".gitmodules")).unwrap();
    assert!(gitmodules.contains("path = widgets"));
    assert_eq!(
        fixture.git(&["log", "-1", "--format=%s"]),
        "Update submodule widgets to v0.2.0"
    );
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_failing_entry_does_not_stop_the_run() {
    let fixture = TestFixture::new().with_git_project();
    let engine = fixture.upstream("engine", &["v1.0.0"]);
    let ui = fixture.upstream("ui", &["v3.0.0"]);
    let fixture = fixture
        .with_submodule(&engine, "libs/engine")
        .with_submodule(&ui, "libs/ui")
        .with_entries("libs/engine\nlibs/ui\n");
    // Uncommitted changes block the checkout of the new release
    std::fs::write(fixture.path().join("libs/engine/VERSION"), "local edit\n").unwrap();
    fixture.release("engine", "v1.1.0");

    fixture
        .command()
        .arg("update")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed to check out v1.1.0 in libs/engine"))
        .stdout(predicate::str::contains("libs/ui pinned to v3.0.0"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_deleted_and_moved_upstream_tags_are_reconciled() {
    let fixture = TestFixture::new().with_git_project();
    let url = fixture.upstream("engine", &["v1.0.0", "v1.1.0"]);
    let fixture = fixture
        .with_submodule(&url, "libs/engine")
        .with_entries("libs/engine\n");

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("libs/engine pinned to v1.1.0"));

    // Upstream withdraws v1.1.0 and re-points v1.0.0 at a new commit
    let upstream = fixture.upstream_dir("engine");
    git(&upstream, &["tag", "-d", "v1.1.0"]);
    std::fs::write(upstream.join("VERSION"), "v1.0.0 respin\n").unwrap();
    git(&upstream, &["commit", "--quiet", "-am", "Respin v1.0.0"]);
    git(&upstream, &["tag", "-f", "v1.0.0"]);
    let moved = git(&upstream, &["rev-parse", "v1.0.0^{commit}"]);

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("libs/engine pinned to v1.0.0"));

    let engine = fixture.path().join("libs/engine");
    let tags = git(&engine, &["tag", "--list"]);
    assert!(!tags.lines().any(|tag| tag == "v1.1.0"), "stale tags: {}", tags);
    assert_eq!(git(&engine, &["rev-parse", "v1.0.0^{commit}"]), moved);
    assert_eq!(git(&engine, &["rev-parse", "HEAD"]), moved);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_project_root_entry_is_refused() {
    let fixture = TestFixture::new()
        .with_git_project()
        .with_entries(".\n");
    let head = fixture.git(&["rev-parse", "HEAD"]);

    fixture
        .command()
        .arg("update")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("'.' is not a directory inside the project"));

    assert_eq!(fixture.git(&["rev-parse", "HEAD"]), head);
    assert_eq!(fixture.git(&["rev-parse", "--abbrev-ref", "HEAD"]), "main");
}
