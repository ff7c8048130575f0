use pkgctl::api::Lifecycle;
use pkgctl::core::PkgctlError;
use pkgctl::test_utils::{memory_client, resources};
use tokio_util::sync::CancellationToken;

const NAME: &str = "catalog.repo-a.infra.workload.ws1";

#[tokio::test]
async fn test_draft_to_published() {
    let (_store, client) = memory_client("default");
    client.create(NAME).await.unwrap();

    let proposed = client.update_status(NAME, Lifecycle::Proposed).await.unwrap();
    assert_eq!(proposed.lifecycle(), Lifecycle::Proposed);

    let published = client.update_status(NAME, Lifecycle::Published).await.unwrap();
    assert_eq!(published.lifecycle(), Lifecycle::Published);
    assert_eq!(client.get(NAME).await.unwrap().lifecycle(), Lifecycle::Published);
}

#[tokio::test]
async fn test_same_state_is_a_no_op() {
    let (_store, client) = memory_client("default");
    let created = client.create(NAME).await.unwrap();

    let unchanged = client.update_status(NAME, Lifecycle::Draft).await.unwrap();
    assert_eq!(unchanged.metadata.resource_version, created.metadata.resource_version);
}

#[tokio::test]
async fn test_illegal_moves_are_refused() {
    let (_store, client) = memory_client("default");
    client.create(NAME).await.unwrap();

    let skipped = client.update_status(NAME, Lifecycle::Published).await.unwrap_err();
    assert!(
        matches!(
            skipped,
            PkgctlError::InvalidLifecycleTransition {
                from: Lifecycle::Draft,
                to: Lifecycle::Published,
                ..
            }
        ),
        "{skipped:?}"
    );

    client.update_status(NAME, Lifecycle::Proposed).await.unwrap();
    let backwards = client.update_status(NAME, Lifecycle::Draft).await.unwrap_err();
    assert!(matches!(backwards, PkgctlError::InvalidLifecycleTransition { .. }));
    assert_eq!(client.get(NAME).await.unwrap().lifecycle(), Lifecycle::Proposed);
}

#[tokio::test]
async fn test_deletion_candidate_is_terminal() {
    let (_store, client) = memory_client("default");
    client.create(NAME).await.unwrap();
    client.update_status(NAME, Lifecycle::DeletionCandidate).await.unwrap();

    for next in [Lifecycle::Draft, Lifecycle::Proposed, Lifecycle::Published] {
        assert!(client.update_status(NAME, next).await.is_err(), "{next}");
    }
}

#[tokio::test]
async fn test_push_only_while_draft() {
    let (_store, client) = memory_client("default");
    let cancel = CancellationToken::new();
    client.create(NAME).await.unwrap();
    client.push(NAME, resources(&[("a.yaml", "1")]), &cancel).await.unwrap();
    client.update_status(NAME, Lifecycle::Proposed).await.unwrap();

    let err = client.push(NAME, resources(&[("b.yaml", "2")]), &cancel).await.unwrap_err();
    assert!(
        matches!(
            err,
            PkgctlError::LifecycleViolation {
                lifecycle: Lifecycle::Proposed,
                ..
            }
        ),
        "{err:?}"
    );
    assert_eq!(client.pull(NAME, &cancel).await.unwrap(), resources(&[("a.yaml", "1")]));
}

#[tokio::test]
async fn test_delete() {
    let (store, client) = memory_client("default");
    client.create(NAME).await.unwrap();

    client.delete(NAME).await.unwrap();
    assert!(store.is_empty().await);
    assert!(client.get(NAME).await.unwrap_err().is_not_found());
    assert!(client.delete(NAME).await.unwrap_err().is_not_found());
}
