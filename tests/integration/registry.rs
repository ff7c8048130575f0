use pkgctl::config::{GlobalConfig, Repository};
use pkgctl::core::PkgctlError;
use predicates::prelude::*;

use crate::common::TestProject;

#[tokio::test]
async fn test_delete_existing_entry_persists() {
    let project = TestProject::new();
    let mut config = GlobalConfig::default();
    config.add_repository("catalog", Repository::new("https://example.com/catalog.git"));
    config.add_repository("blueprints", Repository::new("https://example.com/blueprints.git"));
    config.save_to(project.config_path()).await.unwrap();

    let mut loaded = GlobalConfig::load_from(project.config_path()).await.unwrap();
    let removed = loaded.remove_repository("catalog").unwrap();
    assert_eq!(removed.url, "https://example.com/catalog.git");
    loaded.save_to(project.config_path()).await.unwrap();

    let reloaded = GlobalConfig::load_from(project.config_path()).await.unwrap();
    assert!(reloaded.get_repository("catalog").is_none());
    assert_eq!(reloaded.repository_names().collect::<Vec<_>>(), vec!["blueprints"]);
    assert!(!project.read_config().contains("[repos.catalog]"));
}

#[tokio::test]
async fn test_delete_missing_entry_is_an_error() {
    let mut config = GlobalConfig::default();
    config.add_repository("blueprints", Repository::new("https://example.com/blueprints.git"));

    let err = config.remove_repository("catalog").unwrap_err();
    assert!(matches!(err, PkgctlError::RepositoryNotFound { ref name } if name == "catalog"));
    assert_eq!(config.repository_names().count(), 1);
}

#[test]
fn test_cli_repo_lifecycle() {
    let project = TestProject::new();

    project
        .pkgctl()
        .args(["repo", "add", "catalog", "https://example.com/catalog.git", "--deployment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added repository 'catalog'"));

    let saved = project.read_config();
    assert!(saved.contains("[repos.catalog]"));
    assert!(saved.contains("deployment = true"));

    project
        .pkgctl()
        .args(["repo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("catalog  https://example.com/catalog.git  deployment"));

    project
        .pkgctl()
        .args(["repo", "delete", "catalog"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted repository 'catalog'"));
    assert!(!project.read_config().contains("[repos.catalog]"));
}

#[test]
fn test_cli_delete_missing_repo_fails_without_writing() {
    let project = TestProject::new();

    project
        .pkgctl()
        .args(["repo", "delete", "catalog"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Repository 'catalog' is not registered"));
    assert!(!project.config_path().exists());
}
