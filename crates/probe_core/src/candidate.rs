const SCHEME_PREFIX: &str = "http";

/// Expand a target into the URLs to try, in order.
///
/// A target that already names a scheme is used verbatim. A bare host is
/// tried over https first and then over plain http.
///
/// "Names a scheme" means the target starts with `http`, nothing more. A host
/// such as `httpbin.org` therefore becomes a single candidate that does not
/// parse as a URL and always ends up Unreachable; write it with an explicit
/// scheme instead.
pub fn resolve_candidates(raw: &str) -> Vec<String> {
    if has_scheme(raw) {
        vec![raw.to_owned()]
    } else {
        vec![format!("https://{raw}"), format!("http://{raw}")]
    }
}

fn has_scheme(raw: &str) -> bool {
    raw.get(..SCHEME_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SCHEME_PREFIX))
}
