use scraper::{Html, Selector};

/// Text of the first `<title>` inside `<head>`, entity-decoded and trimmed.
///
/// Returns `None` for missing or blank titles. Malformed markup is parsed
/// leniently, so this never fails.
pub fn extract_title(html: &str) -> Option<String> {
    let selector = Selector::parse("head title").ok()?;
    let doc = Html::parse_document(html);
    doc.select(&selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
