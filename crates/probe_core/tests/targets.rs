use std::sync::Once;

use pretty_assertions::assert_eq;
use probe_core::{normalize_targets, resolve_candidates, Target};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[test]
fn blank_lines_are_skipped_and_counted() {
    init_logging();
    let normalized = normalize_targets("a.test\n\nb.test");

    assert_eq!(
        normalized.targets,
        vec![
            Target {
                id: 1,
                raw: "a.test".to_string(),
            },
            Target {
                id: 2,
                raw: "b.test".to_string(),
            },
        ]
    );
    assert_eq!(normalized.valid_count(), 2);
    assert_eq!(normalized.empty_count, 1);
}

#[test]
fn ids_follow_input_order_and_lines_are_trimmed() {
    init_logging();
    let normalized = normalize_targets("  z.test \n   \n\t y.test\n\n\nhttp://x.test/path  \n");

    let pairs: Vec<_> = normalized
        .targets
        .iter()
        .map(|t| (t.id, t.raw.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![(1, "z.test"), (2, "y.test"), (3, "http://x.test/path")]
    );
    assert_eq!(normalized.empty_count, 3);
}

#[test]
fn trailing_newline_is_not_an_empty_target() {
    init_logging();
    let normalized = normalize_targets("a.test\nb.test\n");
    assert_eq!(normalized.valid_count(), 2);
    assert_eq!(normalized.empty_count, 0);
}

#[test]
fn empty_input_yields_no_targets() {
    init_logging();
    let normalized = normalize_targets("");
    assert!(normalized.is_empty());
    assert_eq!(normalized.empty_count, 0);
}

#[test]
fn bare_host_tries_https_before_http() {
    assert_eq!(
        resolve_candidates("example.test"),
        vec![
            "https://example.test".to_string(),
            "http://example.test".to_string(),
        ]
    );
}

#[test]
fn bare_host_with_port_and_path_keeps_suffix() {
    assert_eq!(
        resolve_candidates("example.test:8443/login"),
        vec![
            "https://example.test:8443/login".to_string(),
            "http://example.test:8443/login".to_string(),
        ]
    );
}

#[test]
fn explicit_scheme_is_used_verbatim() {
    assert_eq!(
        resolve_candidates("http://example.test"),
        vec!["http://example.test".to_string()]
    );
    assert_eq!(
        resolve_candidates("HTTPS://Example.test/a"),
        vec!["HTTPS://Example.test/a".to_string()]
    );
}

#[test]
fn host_starting_with_http_is_taken_as_schemed() {
    assert_eq!(resolve_candidates("httpbin.org"), vec!["httpbin.org".to_string()]);
    assert_eq!(
        resolve_candidates("https://httpbin.org"),
        vec!["https://httpbin.org".to_string()]
    );
}

#[test]
fn candidate_list_is_never_empty() {
    for raw in ["h", "ht", "http", "a.test", "https://a.test", "é.test"] {
        assert!(!resolve_candidates(raw).is_empty(), "no candidates for {raw}");
    }
}
