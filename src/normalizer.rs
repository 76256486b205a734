//! Input normalization and small text helpers.

use crate::error::{Error, Result};

/// Raw input broken into trimmed, delimiter-separated segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    /// Original input string
    pub original: String,
    /// Non-empty segments, in input order
    pub segments: Vec<String>,
}

/// Collapse repeated whitespace and split the input on `,`, tab and newline.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if `input` has zero length.
///
/// # Example
///
/// ```rust
/// use addresser::normalizer::normalize;
///
/// let normalized = normalize("100  Main St,\tSpringfield, IL 62701")?;
/// assert_eq!(normalized.segments, ["100 Main St", "Springfield", "IL 62701"]);
/// # Ok::<(), addresser::Error>(())
/// ```
pub fn normalize(input: &str) -> Result<NormalizedAddress> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }

    let collapsed = collapse_spaces(input);
    let segments = collapsed
        .split([',', '\t', '\n'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    Ok(NormalizedAddress {
        original: input.to_string(),
        segments,
    })
}

/// Replace every run of spaces with a single space.
pub fn collapse_spaces(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_space = false;
    for c in input.chars() {
        if c == ' ' {
            if !previous_space {
                out.push(c);
            }
            previous_space = true;
        } else {
            out.push(c);
            previous_space = false;
        }
    }
    out
}

/// Title-case each word: first character upper-case, the rest lower-case.
///
/// A word starts at a letter, digit or underscore and runs to the next
/// whitespace, so "o'NEIL" becomes "O'neil" and "4B" becomes "4b".
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_whitespace() {
            in_word = false;
            out.push(c);
        } else if in_word {
            out.extend(c.to_lowercase());
        } else if c.is_ascii_alphanumeric() || c == '_' {
            in_word = true;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// If `text` ends with `needle` (ignoring ASCII case) and the match starts a
/// word, return the text before the match with trailing spaces removed.
pub(crate) fn strip_word_suffix<'a>(text: &'a str, needle: &str) -> Option<&'a str> {
    if needle.is_empty() || needle.len() > text.len() {
        return None;
    }
    let start = text.len() - needle.len();
    if !text.is_char_boundary(start) || !text[start..].eq_ignore_ascii_case(needle) {
        return None;
    }
    let head = &text[..start];
    if head.is_empty() || head.ends_with(' ') {
        Some(head.trim_end())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_input() {
        assert_matches!(normalize(""), Err(Error::EmptyInput));
    }

    #[test]
    fn test_whitespace_only_input_has_no_segments() {
        let normalized = normalize("   ").unwrap();
        assert!(normalized.segments.is_empty());
    }

    #[test]
    fn test_splits_on_all_delimiters() {
        let normalized = normalize("PO Box 123\nAustin,   TX\t78701").unwrap();
        assert_eq!(normalized.segments, ["PO Box 123", "Austin", "TX", "78701"]);
        assert_eq!(normalized.original, "PO Box 123\nAustin,   TX\t78701");
    }

    #[test]
    fn test_drops_empty_segments() {
        let normalized = normalize("100 Main St,, Springfield, ").unwrap();
        assert_eq!(normalized.segments, ["100 Main St", "Springfield"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("MONTEREY PARK"), "Monterey Park");
        assert_eq!(title_case("o'NEIL st"), "O'neil St");
        assert_eq!(title_case("5th ave a"), "5th Ave A");
        assert_eq!(title_case("(north)"), "(North)");
    }

    #[test]
    fn test_strip_word_suffix() {
        assert_eq!(strip_word_suffix("Monterey Park CA", "ca"), Some("Monterey Park"));
        assert_eq!(strip_word_suffix("california", "California"), Some(""));
        assert_eq!(strip_word_suffix("West Virginia", "Virginia"), Some("West"));
        assert_eq!(strip_word_suffix("Arkansas", "Kansas"), None);
        assert_eq!(strip_word_suffix("CA", "West Virginia"), None);
    }
}
