use pkgctl::core::PkgctlError;
use pkgctl::pkgrevid::{
    PackageRevisionId, format_package_revision, parse_package, parse_package_revision,
};

#[test]
fn test_names_round_trip() {
    for name in [
        "catalog.repo-a.infra.workload.ws1",
        "t.r.realm.p.main",
        "prod-eu.blueprints.network.vpc.feature_x",
    ] {
        let id = parse_package_revision(name).unwrap();
        assert_eq!(format_package_revision(&id), name);
        assert_eq!(parse_package_revision(&format_package_revision(&id)).unwrap(), id);
    }
}

#[test]
fn test_wrong_segment_count_reports_actual_count() {
    for (name, actual) in [
        ("a", 1),
        ("a.b", 2),
        ("a.b.c", 3),
        ("a.b.c.d", 4),
        ("a.b.c.d.e.f", 6),
        ("a.b.c.d.e.f.g.h", 8),
    ] {
        match parse_package_revision(name) {
            Err(PkgctlError::MalformedIdentifier {
                expected,
                actual: found,
                ..
            }) => {
                assert_eq!(expected, 5);
                assert_eq!(found, actual, "segment count for {name}");
            }
            other => panic!("expected MalformedIdentifier for {name}, got {other:?}"),
        }
    }
}

#[test]
fn test_empty_segment_is_named() {
    match parse_package_revision("catalog..infra.workload.ws1") {
        Err(PkgctlError::InvalidSegment {
            segment, ..
        }) => assert_eq!(segment, "repository"),
        other => panic!("expected InvalidSegment, got {other:?}"),
    }
}

#[test]
fn test_revision_travels_out_of_band() {
    let head = PackageRevisionId::parse_ref("catalog.repo-a.infra.workload.ws1").unwrap();
    assert!(head.resolves_to_head());

    let pinned = PackageRevisionId::parse_ref("catalog.repo-a.infra.workload.ws1@v3").unwrap();
    assert_eq!(pinned.revision.as_deref(), Some("v3"));
    assert_eq!(pinned.to_string(), "catalog.repo-a.infra.workload.ws1");
    assert_eq!(pinned.to_ref_string(), "catalog.repo-a.infra.workload.ws1@v3");

    let flagged = head.with_revision(Some("v4".to_string()));
    assert_eq!(flagged.revision.as_deref(), Some("v4"));
}

#[test]
fn test_bare_package_form() {
    let package = parse_package("repo-a.infra.workload").unwrap();
    assert_eq!(package.target, None);
    assert_eq!(package.to_string(), "repo-a.infra.workload");

    assert!(matches!(
        parse_package("catalog.repo-a.infra.workload.ws1"),
        Err(PkgctlError::MalformedIdentifier {
            expected: 3,
            actual: 5,
            ..
        })
    ));
}
