//! Diff rendering for fixture comparison.

/// Render a diff between expected and actual formatter output.
///
/// Control bytes are escaped so that `\r\n` mismatches stay visible.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    if let Some(offset) = first_difference(expected.as_bytes(), actual.as_bytes()) {
        out.push_str(&format!("@@ byte {offset} @@\n"));
    }
    out.push_str(&format!("-{}\n", escape_visible(expected)));
    out.push_str(&format!("+{}\n", escape_visible(actual)));
    out
}

/// Offset of the first byte where the two outputs differ.
#[must_use]
pub fn first_difference(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

/// Escape control characters and backslashes as C-style sequences.
#[must_use]
pub fn escape_visible(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_outputs() {
        assert_eq!(render_diff("d: 1\r\n", "d: 1\r\n"), "[identical]");
    }

    #[test]
    fn diff_points_at_first_byte() {
        let diff = render_diff("d: -1\r\n", "d: 4294967295\r\n");
        assert!(diff.contains("@@ byte 3 @@"));
        assert!(diff.contains("-d: -1\\r\\n"));
        assert!(diff.contains("+d: 4294967295\\r\\n"));
    }

    #[test]
    fn prefix_difference_is_reported_at_shorter_length() {
        assert_eq!(first_difference(b"abc", b"abcd"), Some(3));
        assert_eq!(first_difference(b"abc", b"abc"), None);
        assert_eq!(escape_visible("\u{1}\\"), "\\x01\\\\");
    }
}
