use crate::error::TaskError;
use crate::time::DateMatch;

/// Title used when the date phrase was all the user typed.
pub const UNTITLED_PLACEHOLDER: &str = "Untitled Event";

/// Rejects empty and whitespace-only text.
pub fn require_text(text: &str) -> Result<&str, TaskError> {
    if text.trim().is_empty() {
        return Err(TaskError::invalid("task text is required"));
    }
    Ok(text)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts the matched span out of `text` and tidies the whitespace left behind.
/// Without a match the text only gets trimmed.
pub fn strip_match(text: &str, matched: Option<&DateMatch>) -> String {
    let Some(m) = matched else {
        return text.trim().to_string();
    };
    let (Some(head), Some(tail)) = (text.get(..m.start), text.get(m.end()..)) else {
        return text.trim().to_string();
    };
    collapse_whitespace(&format!("{}{}", head, tail))
}

pub fn title_or_placeholder(cleaned: String) -> String {
    if cleaned.is_empty() {
        UNTITLED_PLACEHOLDER.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn span(start: usize, len: usize) -> DateMatch {
        DateMatch {
            start,
            len,
            date: NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
        }
    }

    #[test]
    fn test_strip_removes_span() {
        assert_eq!(strip_match("Meeting 25/12/2023", Some(&span(8, 10))), "Meeting");
        assert_eq!(
            strip_match("Call  Bob 25/12   about  it", Some(&span(10, 5))),
            "Call Bob about it"
        );
    }

    #[test]
    fn test_strip_removes_exactly_the_span() {
        assert_eq!(strip_match("a tomorrow b", Some(&span(2, 8))), "a b");
        assert_eq!(strip_match("a(today)b", Some(&span(2, 5))), "a()b");
    }

    #[test]
    fn test_strip_without_match_trims() {
        assert_eq!(strip_match("  Buy  Milk ", None), "Buy  Milk");
    }

    #[test]
    fn test_strip_whole_input() {
        let cleaned = strip_match(" tomorrow ", Some(&span(1, 8)));
        assert_eq!(cleaned, "");
        assert_eq!(title_or_placeholder(cleaned), UNTITLED_PLACEHOLDER);
    }

    #[test]
    fn test_out_of_range_span_is_ignored() {
        assert_eq!(strip_match("short", Some(&span(3, 10))), "short");
    }

    #[test]
    fn test_require_text() {
        assert!(require_text("Buy Milk").is_ok());
        assert!(matches!(require_text(""), Err(TaskError::InvalidInput(_))));
        assert!(matches!(require_text(" \t\n"), Err(TaskError::InvalidInput(_))));
    }
}
