//! HTML splicing helpers for `webui-preview`.
//!
//! Keeps the one piece of string surgery the preview server performs on
//! served pages in a dependency-free crate so it can be tested in isolation.

/// Opening head tag the bridge script is spliced after.
pub const HEAD_OPEN_TAG: &str = "<head>";

/// Splice an inline script fragment into an HTML document.
///
/// The fragment is inserted immediately after the first occurrence of
/// `<head>`. Later occurrences are left untouched. When the document has no
/// `<head>` tag the fragment is prepended.
///
/// # Example
///
/// ```
/// use webui_inject_utils::inject_inline_script;
///
/// let html = "<html><head><title>Settings</title></head><body></body></html>";
/// let result = inject_inline_script(html, "<script>window.HOOK = {};</script>");
/// assert_eq!(
///     result,
///     "<html><head><script>window.HOOK = {};</script><title>Settings</title></head><body></body></html>"
/// );
/// ```
pub fn inject_inline_script(html: &str, script: &str) -> String {
    let mut result = String::with_capacity(html.len() + script.len());

    match html.find(HEAD_OPEN_TAG) {
        Some(pos) => {
            let insert_at = pos + HEAD_OPEN_TAG.len();
            result.push_str(&html[..insert_at]);
            result.push_str(script);
            result.push_str(&html[insert_at..]);
        },
        None => {
            result.push_str(script);
            result.push_str(html);
        },
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "<script>window.HOOK = {};</script>";

    #[test]
    fn injects_after_head_open() {
        let html = "<html><head><title>T</title></head><body></body></html>";
        let result = inject_inline_script(html, SCRIPT);
        let head_end = result.find(HEAD_OPEN_TAG).unwrap() + HEAD_OPEN_TAG.len();
        assert!(result[head_end..].starts_with(SCRIPT));
    }

    #[test]
    fn only_first_head_is_used() {
        let html = "<head></head><template><head></head></template>";
        let result = inject_inline_script(html, SCRIPT);
        assert_eq!(result.matches(SCRIPT).count(), 1);
        assert_eq!(
            result,
            "<head><script>window.HOOK = {};</script></head><template><head></head></template>"
        );
    }

    #[test]
    fn prepends_when_no_head() {
        let html = "<body><div>Simple page</div></body>";
        let result = inject_inline_script(html, SCRIPT);
        assert_eq!(result, format!("{SCRIPT}{html}"));
    }

    #[test]
    fn head_with_attributes_is_not_a_splice_point() {
        let html = r#"<head lang="zh"><title>T</title></head>"#;
        let result = inject_inline_script(html, SCRIPT);
        assert!(result.starts_with(SCRIPT));
    }

    #[test]
    fn empty_document_yields_script() {
        assert_eq!(inject_inline_script("", SCRIPT), SCRIPT);
    }
}
