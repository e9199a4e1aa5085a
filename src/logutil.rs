//! Log sanitizing for player-typed input: keeps every log entry on one line
//! and free of control characters.

/// Escape a typed line for single-line logging. Newlines, carriage returns,
/// tabs and backslashes are backslash-escaped; other control characters
/// become `\xNN`. Long lines are cut with an ellipsis to cap log noise.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 200;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_log("ler 0\n\t"), "ler 0\\n\\t");
        assert_eq!(escape_log("a\\b"), "a\\\\b");
    }

    #[test]
    fn truncates_long_lines() {
        let long = "x".repeat(500);
        let escaped = escape_log(&long);
        assert!(escaped.ends_with('…'));
        assert!(escaped.chars().count() <= 201);
    }
}
