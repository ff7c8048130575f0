use predicates::prelude::*;

use crate::common::TestProject;

/// Nothing listens on the discard port.
const UNREACHABLE_SERVER: &str = "http://127.0.0.1:9";

#[test]
fn test_help_lists_command_groups() {
    let project = TestProject::new();
    project
        .pkgctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rpkg"))
        .stdout(predicate::str::contains("repo"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_path_follows_environment() {
    let project = TestProject::new();
    project
        .pkgctl()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(project.config_path().to_string_lossy().to_string()));
}

#[test]
fn test_config_flag_wins_over_environment() {
    let project = TestProject::new();
    let other = project.path("other.toml");
    project
        .pkgctl()
        .args(["--config", other.to_str().unwrap(), "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("other.toml"));
}

#[test]
fn test_config_show_reads_file() {
    let project = TestProject::new();
    project.write_config(
        r#"
server = "http://pkgserver.example:7007"
namespace = "team-a"

[repos.catalog]
url = "https://example.com/catalog.git"
directory = "packages"
"#,
    );

    project
        .pkgctl()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://pkgserver.example:7007"))
        .stdout(predicate::str::contains("team-a"))
        .stdout(predicate::str::contains("[repos.catalog]"));
}

#[test]
fn test_invalid_config_is_reported() {
    let project = TestProject::new();
    project.write_config("server = [not toml");

    project
        .pkgctl()
        .args(["config", "show"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_unreadable_config_names_its_path() {
    let project = TestProject::new();
    std::fs::create_dir_all(project.config_path()).unwrap();

    project
        .pkgctl()
        .args(["config", "show"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(project.config_path().to_string_lossy().to_string()))
        .stderr(predicate::str::contains("<unknown>").not());
}

#[test]
fn test_remote_command_without_server() {
    let project = TestProject::new();
    project
        .pkgctl()
        .args(["rpkg", "get"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no package server configured"));
}

#[test]
fn test_malformed_name_fails_before_any_request() {
    let project = TestProject::new();
    project
        .pkgctl()
        .args(["--server", UNREACHABLE_SERVER, "rpkg", "create", "catalog.repo-a.ws1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("expected 5 dot-separated segments, found 3"))
        .stderr(predicate::str::contains("Request to").not());
}

#[test]
fn test_invalid_clone_target() {
    let project = TestProject::new();
    project
        .pkgctl()
        .env("PKGCTL_SERVER", UNREACHABLE_SERVER)
        .args(["rpkg", "clone", "not-a-name", "catalog.repo-a.infra.workload.ws1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid clone target 'not-a-name'"));
}

#[test]
fn test_unreachable_server_is_a_transport_error() {
    let project = TestProject::new();
    project
        .pkgctl()
        .args(["--server", UNREACHABLE_SERVER, "rpkg", "get", "catalog.repo-a.infra.workload.ws1"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Request to http://127.0.0.1:9"));
}

#[test]
fn test_update_status_rejects_unknown_lifecycle() {
    let project = TestProject::new();
    project
        .pkgctl()
        .args([
            "--server",
            UNREACHABLE_SERVER,
            "rpkg",
            "update-status",
            "catalog.repo-a.infra.workload.ws1",
            "--lifecycle",
            "shipped",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("shipped"));
}
