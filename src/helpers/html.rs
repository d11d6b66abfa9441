//! Escaping helpers

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Make serialized JSON safe to embed in a `<script>` element
pub fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"Tom & "Jerry" <'cat'>"#),
            "Tom &amp; &quot;Jerry&quot; &lt;&apos;cat&apos;&gt;"
        );
    }

    #[test]
    fn test_html_escape_ampersand_first() {
        assert_eq!(html_escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_script_safe_json() {
        assert_eq!(
            script_safe_json(r#"{"a":"</script>"}"#),
            r#"{"a":"<\/script>"}"#
        );
    }
}
