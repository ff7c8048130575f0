use std::sync::Arc;

use pkgctl::api::ObjectKey;
use pkgctl::client::{MockPackageStore, PackageStore};
use pkgctl::constants::PACKAGE_REVISION_RESOURCES_KIND;
use pkgctl::core::PkgctlError;
use pkgctl::resources::{read_directory, read_stream};
use pkgctl::sync::PackageRevisionClient;
use pkgctl::test_utils::{memory_client, resources, sample_resources, write_tree};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::common::list_files;

const NAME: &str = "catalog.repo-a.infra.workload.ws1";

#[tokio::test]
async fn test_second_push_replaces_first() {
    let (store, client) = memory_client("default");
    let cancel = CancellationToken::new();
    client.create(NAME).await.unwrap();

    client.push(NAME, resources(&[("a.yaml", "1")]), &cancel).await.unwrap();
    client.push(NAME, resources(&[("b.yaml", "2")]), &cancel).await.unwrap();

    let remote = store
        .get_package_revision_resources(&ObjectKey::new("default", NAME))
        .await
        .unwrap();
    assert_eq!(remote.spec.resources, resources(&[("b.yaml", "2")]));
}

#[tokio::test]
async fn test_push_to_missing_revision_writes_nothing() {
    let mut store = MockPackageStore::new();
    store.expect_get_package_revision().returning(|key| {
        Err(PkgctlError::not_found("PackageRevision", &key.namespace, &key.name))
    });
    store.expect_get_package_revision_resources().never();
    store.expect_update_package_revision_resources().never();
    let client = PackageRevisionClient::new(Arc::new(store), "default");

    let err = client.push(NAME, sample_resources(), &CancellationToken::new()).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}

#[tokio::test]
async fn test_directory_push_then_pull_into_fresh_directory() {
    let (_store, client) = memory_client("default");
    let cancel = CancellationToken::new();
    client.create(NAME).await.unwrap();

    let local = TempDir::new().unwrap();
    write_tree(
        local.path(),
        &[
            ("Kptfile", "apiVersion: kpt.dev/v1\nkind: Kptfile\n"),
            ("base/service.yaml", "apiVersion: v1\nkind: Service\n"),
            ("base/values.txt", "replicas=2\n"),
        ],
    );
    client.push_directory(NAME, local.path(), &cancel).await.unwrap();

    let checkout = TempDir::new().unwrap();
    let target = checkout.path().join("workload");
    let summary = client.pull_to_directory(NAME, &target, &cancel).await.unwrap();
    assert_eq!(summary.written, 3);
    assert_eq!(list_files(&target), vec!["Kptfile", "base/service.yaml", "base/values.txt"]);
    assert_eq!(
        read_directory(&target, &cancel).unwrap(),
        read_directory(local.path(), &cancel).unwrap()
    );

    let again = client.pull_to_directory(NAME, &target, &cancel).await.unwrap();
    assert_eq!(again.written, 0);
    assert_eq!(again.unchanged, 3);
}

#[tokio::test]
async fn test_pull_of_missing_revision_leaves_directory_alone() {
    let (_store, client) = memory_client("default");
    let cancel = CancellationToken::new();
    let checkout = TempDir::new().unwrap();
    write_tree(checkout.path(), &[("keep.yaml", "kind: Keep\n")]);

    let err = client.pull_to_directory(NAME, checkout.path(), &cancel).await.unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
    assert_eq!(list_files(checkout.path()), vec!["keep.yaml"]);
}

#[tokio::test]
async fn test_pull_blocked_by_local_file_writes_nothing() {
    let (_store, client) = memory_client("default");
    let cancel = CancellationToken::new();
    client.create(NAME).await.unwrap();
    client
        .push(NAME, resources(&[("0.yaml", "kind: Zero\n"), ("a/b.yaml", "kind: B\n")]), &cancel)
        .await
        .unwrap();

    let checkout = TempDir::new().unwrap();
    write_tree(checkout.path(), &[("a", "local notes\n")]);

    let err = client.pull_to_directory(NAME, checkout.path(), &cancel).await.unwrap_err();
    match err {
        PkgctlError::IoFailure {
            path, ..
        } => assert_eq!(path, checkout.path().join("a")),
        other => panic!("Expected IoFailure, got {other:?}"),
    }
    assert_eq!(list_files(checkout.path()), vec!["a"]);
    assert_eq!(std::fs::read_to_string(checkout.path().join("a")).unwrap(), "local notes\n");
}

#[tokio::test]
async fn test_pull_failure_from_transport_writes_nothing() {
    let mut store = MockPackageStore::new();
    store.expect_get_package_revision_resources().returning(|_| {
        Err(PkgctlError::Transport {
            url: "http://pkgserver.invalid".to_string(),
            reason: "connection reset".to_string(),
        })
    });
    let client = PackageRevisionClient::new(Arc::new(store), "default");

    let checkout = TempDir::new().unwrap();
    let target = checkout.path().join("workload");
    let err = client.pull_to_directory(NAME, &target, &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, PkgctlError::Transport { .. }), "{err:?}");
    assert!(!target.exists());
}

#[tokio::test]
async fn test_stream_push_and_pull() {
    let (_store, client) = memory_client("default");
    let cancel = CancellationToken::new();
    client.create(NAME).await.unwrap();

    let input = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
data:
  mode: fast
";
    client.push_stream(NAME, std::io::Cursor::new(input.to_string()), "stdin", &cancel).await.unwrap();

    let mut output = Vec::new();
    client.pull_to_writer(NAME, &mut output, &cancel).await.unwrap();
    let parsed = read_stream(output.as_slice(), "stdout", &cancel).unwrap();
    assert_eq!(parsed.paths().collect::<Vec<_>>(), vec!["configmap-settings.yaml"]);
    assert!(parsed.get("configmap-settings.yaml").unwrap().contains("mode: fast"));
}

#[tokio::test]
async fn test_cancelled_push_leaves_remote_untouched() {
    let (store, client) = memory_client("default");
    client.create(NAME).await.unwrap();
    client.push(NAME, resources(&[("a.yaml", "1")]), &CancellationToken::new()).await.unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = client.push(NAME, resources(&[("b.yaml", "2")]), &cancel).await.unwrap_err();
    assert!(matches!(err, PkgctlError::Cancelled { .. }), "{err:?}");

    let remote = store
        .get_package_revision_resources(&ObjectKey::new("default", NAME))
        .await
        .unwrap();
    assert_eq!(remote.spec.resources, resources(&[("a.yaml", "1")]));
}

#[tokio::test]
async fn test_concurrent_writer_is_reported_as_conflict() {
    let (store, client) = memory_client("default");
    client.create(NAME).await.unwrap();
    let key = ObjectKey::new("default", NAME);

    // Another writer updates between our read and our write
    let stale = store.get_package_revision_resources(&key).await.unwrap();
    client.push(NAME, resources(&[("theirs.yaml", "1")]), &CancellationToken::new()).await.unwrap();

    let mut ours = stale;
    ours.spec.resources = resources(&[("ours.yaml", "2")]);
    let err = store.update_package_revision_resources(ours).await.unwrap_err();
    match err {
        PkgctlError::Conflict {
            kind, ..
        } => assert_eq!(kind, PACKAGE_REVISION_RESOURCES_KIND),
        other => panic!("expected Conflict, got {other:?}"),
    }

    let remote = store.get_package_revision_resources(&key).await.unwrap();
    assert_eq!(remote.spec.resources, resources(&[("theirs.yaml", "1")]));
}
