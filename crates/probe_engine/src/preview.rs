const TRUNCATED_MARKER: &str = "\n.[truncated]";
pub const MAX_PREVIEW_CONTENT: usize = 40_960;

/// Trimmed page body for display, capped at [`MAX_PREVIEW_CONTENT`] bytes.
pub fn prepare_content_preview(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.len() <= MAX_PREVIEW_CONTENT {
        return Some(trimmed.to_string());
    }
    let mut end = MAX_PREVIEW_CONTENT;
    while end > 0 && !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    Some(format!("{}{TRUNCATED_MARKER}", &trimmed[..end]))
}
