//! Output normalization and equivalence rules.
//!
//! Independent language runtimes disagree on line endings, trailing
//! whitespace and the spacing inside serialized arrays; exact matching
//! would fail submissions for reasons unrelated to correctness.

/// Normalizes program output for comparison: CRLF becomes LF and trailing
/// whitespace (including the final newline) is stripped from the end of the
/// whole string. Leading and interior whitespace is preserved.
pub fn normalize(s: &str) -> String {
    s.replace("\r\n", "\n").trim_end().to_string()
}

/// Compares expected vs. actual output.
///
/// Normalized strings that are byte-equal match. If both look array-like
/// (start with `[` and end with `]`), they are compared again with all
/// whitespace removed, so `[1, 2]` and `[1,2]` are equivalent.
pub fn outputs_match(expected: &str, actual: &str) -> bool {
    let expected = normalize(expected);
    let actual = normalize(actual);

    if expected == actual {
        return true;
    }

    let array_like = |s: &str| s.starts_with('[') && s.ends_with(']');
    if array_like(&expected) && array_like(&actual) {
        let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
        return strip(&expected) == strip(&actual);
    }

    false
}
