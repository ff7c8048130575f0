use pkgctl::resources::{ResourceSet, read_directory, read_stream, write_directory, write_stream};
use pkgctl::test_utils::{sample_resources, write_tree};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::common::list_files;

#[test]
fn test_directory_round_trip_preserves_mapping() {
    let cancel = CancellationToken::new();
    let source = TempDir::new().unwrap();
    write_tree(
        source.path(),
        &[
            ("Kptfile", "kind: Kptfile\n"),
            ("z/last.yaml", "kind: ConfigMap\n"),
            ("a/b/c/deep.yaml", "kind: Service\n"),
            ("notes.txt", "plain text, no yaml\n"),
        ],
    );

    let original = read_directory(source.path(), &cancel).unwrap();
    assert_eq!(original.len(), 4);

    let copy = TempDir::new().unwrap();
    let target = copy.path().join("out");
    write_directory(&target, &original, &cancel).unwrap();
    assert_eq!(read_directory(&target, &cancel).unwrap(), original);
    assert_eq!(
        list_files(&target),
        vec!["Kptfile", "a/b/c/deep.yaml", "notes.txt", "z/last.yaml"]
    );
}

#[test]
fn test_write_twice_changes_nothing() {
    let cancel = CancellationToken::new();
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("pkg");
    let resources = sample_resources();

    let first = write_directory(&target, &resources, &cancel).unwrap();
    assert_eq!(first.written, resources.len());

    let second = write_directory(&target, &resources, &cancel).unwrap();
    assert_eq!(second.written, 0);
    assert_eq!(second.unchanged, resources.len());
    assert_eq!(read_directory(&target, &cancel).unwrap(), resources);

    // Nothing but the package is left next to the target
    let siblings: Vec<_> = std::fs::read_dir(temp.path()).unwrap().collect();
    assert_eq!(siblings.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_skipped() {
    let cancel = CancellationToken::new();
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &[("real.yaml", "kind: A\n")]);
    std::os::unix::fs::symlink(temp.path().join("real.yaml"), temp.path().join("link.yaml"))
        .unwrap();

    let resources = read_directory(temp.path(), &cancel).unwrap();
    assert_eq!(resources.paths().collect::<Vec<_>>(), vec!["real.yaml"]);
}

#[test]
fn test_stream_carries_directory_content() {
    let cancel = CancellationToken::new();
    let resources = sample_resources();

    let mut stream = Vec::new();
    write_stream(&mut stream, &resources).unwrap();
    let parsed = read_stream(stream.as_slice(), "test", &cancel).unwrap();

    assert_eq!(parsed.paths().collect::<Vec<_>>(), resources.paths().collect::<Vec<_>>());
    assert_eq!(parsed.get("README.md"), Some("# workload\n"));
    for path in ["Kptfile", "manifests/deployment.yaml"] {
        let expected: serde_yaml::Value = serde_yaml::from_str(resources.get(path).unwrap()).unwrap();
        let actual: serde_yaml::Value = serde_yaml::from_str(parsed.get(path).unwrap()).unwrap();
        assert_eq!(actual, expected, "{path}");
    }
}

#[test]
fn test_stream_without_annotations_uses_declared_names() {
    let cancel = CancellationToken::new();
    let input = "\
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
---
apiVersion: v1
kind: Service
metadata:
  name: frontend
";
    let parsed = read_stream(input.as_bytes(), "stdin", &cancel).unwrap();
    assert_eq!(
        parsed.paths().collect::<Vec<_>>(),
        vec!["configmap-settings.yaml", "service-frontend.yaml"]
    );
}

#[test]
fn test_empty_stream_is_empty_set() {
    let cancel = CancellationToken::new();
    assert_eq!(read_stream("".as_bytes(), "stdin", &cancel).unwrap(), ResourceSet::new());
}
