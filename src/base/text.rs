//! Comment wrapping and small string utilities used by the emitters.

/// Render `comment` as prefixed comment lines.
///
/// Text that already contains newlines is emitted line by line, verbatim.
/// Otherwise the text is word-wrapped so no line runs past `max_col`
/// (a single word longer than the limit gets a line of its own).
pub fn format_comment(indent: &str, prefix: &str, comment: &str, max_col: usize) -> String {
    let mut out = String::new();
    if comment.contains('\n') {
        for line in comment.split('\n') {
            push_comment_line(&mut out, indent, prefix, line);
        }
        return out;
    }
    let lead = indent.len() + prefix.len();
    let mut line = String::new();
    for word in comment.split(' ') {
        if !line.is_empty() && lead + line.len() + 1 + word.len() > max_col {
            push_comment_line(&mut out, indent, prefix, &line);
            line.clear();
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    push_comment_line(&mut out, indent, prefix, &line);
    out
}

fn push_comment_line(out: &mut String, indent: &str, prefix: &str, line: &str) {
    out.push_str(indent);
    if line.is_empty() {
        out.push_str(prefix.trim_end());
    } else {
        out.push_str(prefix);
        out.push_str(line);
    }
    out.push('\n');
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn uncapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Quote a string the way node values are written: JSON escaping.
pub fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_comment_single_line() {
        assert_eq!(format_comment("", "/// ", "A city.", 100), "/// A city.\n");
    }

    #[test]
    fn test_multiline_comment_verbatim() {
        let out = format_comment("    ", "/// ", "first\n\nthird", 20);
        assert_eq!(out, "    /// first\n    ///\n    /// third\n");
    }

    #[test]
    fn test_wraps_at_column() {
        let text = "aaaa bbbb cccc dddd";
        let out = format_comment("", "/// ", text, 14);
        assert_eq!(out, "/// aaaa bbbb\n/// cccc dddd\n");
        for line in out.lines() {
            assert!(line.len() <= 14);
        }
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let out = format_comment("", "// ", "a verylongwordthatwontfit b", 10);
        assert_eq!(out, "// a\n// verylongwordthatwontfit\n// b\n");
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(capitalize("getCity"), "GetCity");
        assert_eq!(uncapitalize("GetCity"), "getCity");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\n"), "\"a\\\"b\\n\"");
    }
}
