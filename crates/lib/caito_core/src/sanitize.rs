//! Free-text sanitation: trim, then HTML-escape.

/// Trim surrounding whitespace and escape characters that are unsafe to
/// render as HTML (`&`, `<`, `>`, `"`, `'`).
///
/// The output never contains `<`, `>`, `"` or `'`. Every `&` in the output
/// starts one of the entities below, so escaping a second time only rewrites
/// those ampersands.
pub fn sanitize(text: &str) -> String {
    escape_html(text.trim())
}

/// Escape the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize("  Ann \n\t"), "Ann");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            sanitize("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(sanitize("Привет, мир"), "Привет, мир");
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn output_never_contains_angle_brackets_or_quotes() {
        let inputs = [
            "<<>>",
            "a<b>c",
            "\"'\"'",
            " <img src=x onerror='1'> ",
            "&lt;already&gt;",
            "><",
        ];
        for input in inputs {
            let out = sanitize(input);
            assert!(!out.contains(['<', '>', '"', '\'']), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn second_pass_only_rewrites_ampersands() {
        let once = sanitize("<b>");
        let twice = sanitize(&once);
        assert_eq!(once, "&lt;b&gt;");
        assert_eq!(twice, "&amp;lt;b&amp;gt;");
        assert!(!twice.contains(['<', '>']));
    }

    #[test]
    fn safe_text_is_idempotent() {
        let once = sanitize("  +79161234567 ");
        assert_eq!(sanitize(&once), once);
    }
}
