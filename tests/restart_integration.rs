use chrono::{TimeZone, Utc};
use kube_watchdogs::restart::{build_restart_patch, RESTARTED_AT_ANNOTATION};

// ══════════════════════════════════════════════════════════════════
// Restart-patch payload shape.
// ══════════════════════════════════════════════════════════════════

#[test]
fn restart_patch_sets_only_the_restarted_at_annotation() {
    let ts = Utc.with_ymd_and_hms(2026, 7, 28, 12, 0, 0).unwrap();
    let patch = build_restart_patch(ts);

    let annotations = patch["spec"]["template"]["metadata"]["annotations"]
        .as_object()
        .expect("annotations object");
    assert_eq!(annotations.len(), 1);

    let value = annotations
        .get(RESTARTED_AT_ANNOTATION)
        .and_then(|v| v.as_str())
        .expect("restartedAt annotation present as a string");
    assert_eq!(value, "2026-07-28T12:00:00+00:00");

    // Must parse back as a valid RFC-3339 instant.
    chrono::DateTime::parse_from_rfc3339(value).expect("valid RFC-3339 timestamp");
}

#[test]
fn restart_patch_touches_nothing_outside_the_template_metadata() {
    let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let patch = build_restart_patch(ts);

    let spec = patch["spec"].as_object().expect("spec object");
    assert_eq!(spec.len(), 1, "spec must only carry `template`");

    let template = patch["spec"]["template"].as_object().expect("template object");
    assert_eq!(template.len(), 1, "template must only carry `metadata`");

    let metadata = patch["spec"]["template"]["metadata"].as_object().expect("metadata object");
    assert_eq!(metadata.len(), 1, "metadata must only carry `annotations`");
}

#[test]
fn restart_patch_is_deterministic_for_the_same_timestamp() {
    let ts = Utc.with_ymd_and_hms(2026, 3, 15, 9, 30, 0).unwrap();
    assert_eq!(build_restart_patch(ts), build_restart_patch(ts));
}
