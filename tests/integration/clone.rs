use pkgctl::api::{Lifecycle, ObjectKey, TaskType};
use pkgctl::client::PackageStore;
use pkgctl::core::PkgctlError;
use pkgctl::pkgrevid::Upstream;
use pkgctl::test_utils::{init_test_logging, memory_client, sample_resources};
use tokio_util::sync::CancellationToken;

const SOURCE: &str = "catalog.repo-a.infra.workload.ws1";

/// Publish the existing `SOURCE` as revision `v3`.
async fn published_source(store: &pkgctl::client::MemoryStore) {
    let key = ObjectKey::new("default", SOURCE);
    let mut revision = store.get_package_revision(&key).await.unwrap();
    revision.spec.lifecycle = Lifecycle::Published;
    revision.spec.package_rev_id.revision = Some("v3".to_string());
    store.update_package_revision(revision).await.unwrap();
}

#[tokio::test]
async fn test_clone_from_pinned_source() {
    init_test_logging(None);
    let (store, client) = memory_client("default");
    client.create(SOURCE).await.unwrap();
    client.push(SOURCE, sample_resources(), &CancellationToken::new()).await.unwrap();
    published_source(&store).await;

    let clone = client
        .clone_revision("catalog.repo-a.infra.workload.ws3", &format!("{SOURCE}@v3"), None)
        .await
        .unwrap();

    let id = &clone.spec.package_rev_id;
    assert_eq!(
        (
            id.target.as_str(),
            id.repository.as_str(),
            id.realm.as_str(),
            id.package.as_str(),
            id.workspace.as_str()
        ),
        ("catalog", "repo-a", "infra", "workload", "ws3")
    );
    assert_eq!(
        clone.spec.upstream,
        Some(Upstream {
            repository: "repo-a".to_string(),
            realm: "infra".to_string(),
            package: "workload".to_string(),
            revision: Some("v3".to_string()),
        })
    );
    assert_eq!(clone.lifecycle(), Lifecycle::Draft);
    assert_eq!(clone.spec.tasks.len(), 1);
    assert_eq!(clone.spec.tasks[0].task_type, TaskType::Clone);

    // Stored, not just returned
    let stored = client.get("catalog.repo-a.infra.workload.ws3").await.unwrap();
    assert_eq!(stored.spec, clone.spec);
    assert!(stored.is_clone());
}

#[tokio::test]
async fn test_revision_flag_pins_the_source() {
    let (store, client) = memory_client("default");
    client.create(SOURCE).await.unwrap();
    published_source(&store).await;

    let clone = client
        .clone_revision("catalog.repo-a.infra.workload.ws4", SOURCE, Some("v3".to_string()))
        .await
        .unwrap();
    assert_eq!(clone.spec.upstream.unwrap().revision.as_deref(), Some("v3"));
}

#[tokio::test]
async fn test_unpinned_clone_records_source_revision() {
    let (store, client) = memory_client("default");
    client.create(SOURCE).await.unwrap();
    published_source(&store).await;

    let clone = client.clone_revision("catalog.repo-a.infra.workload.ws5", SOURCE, None).await.unwrap();
    assert_eq!(clone.spec.upstream.unwrap().revision.as_deref(), Some("v3"));
}

#[tokio::test]
async fn test_clone_of_missing_source() {
    let (store, client) = memory_client("default");

    let err = client
        .clone_revision("catalog.repo-a.infra.workload.ws3", SOURCE, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PkgctlError::SourceNotFound { .. }), "{err:?}");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_clone_of_unknown_source_revision() {
    let (store, client) = memory_client("default");
    client.create(SOURCE).await.unwrap();
    published_source(&store).await;

    let err = client
        .clone_revision("catalog.repo-a.infra.workload.ws3", &format!("{SOURCE}@v9"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PkgctlError::SourceNotFound { .. }), "{err:?}");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_invalid_target_is_rejected_before_lookup() {
    let (store, client) = memory_client("default");

    let err = client.clone_revision("catalog.repo-a.ws3", SOURCE, None).await.unwrap_err();
    match err {
        PkgctlError::InvalidTarget {
            name,
            source,
        } => {
            assert_eq!(name, "catalog.repo-a.ws3");
            assert!(matches!(*source, PkgctlError::MalformedIdentifier { actual: 3, .. }));
        }
        other => panic!("expected InvalidTarget, got {other:?}"),
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_clone_onto_existing_name() {
    let (_store, client) = memory_client("default");
    client.create(SOURCE).await.unwrap();
    client.create("catalog.repo-a.infra.workload.ws2").await.unwrap();

    let err = client
        .clone_revision("catalog.repo-a.infra.workload.ws2", SOURCE, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PkgctlError::AlreadyExists { .. }), "{err:?}");
}

#[tokio::test]
async fn test_create_starts_as_draft_with_init_task() {
    let (_store, client) = memory_client("team-a");

    let created = client.create(SOURCE).await.unwrap();
    assert_eq!(created.metadata.namespace, "team-a");
    assert_eq!(created.lifecycle(), Lifecycle::Draft);
    assert_eq!(created.spec.upstream, None);
    assert_eq!(created.spec.tasks.len(), 1);
    assert_eq!(created.spec.tasks[0].task_type, TaskType::Init);

    let err = client.create(SOURCE).await.unwrap_err();
    assert!(matches!(err, PkgctlError::AlreadyExists { .. }));
}
