// src/util.rs — Shared utility functions

use chrono::Utc;

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, ensuring the cut
/// point falls on a valid UTF-8 character boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

/// Like [`truncate_str`], with a trailing `...` when anything was cut.
pub fn ellipsize(s: &str, max_len: usize) -> String {
    let cut = truncate_str(s, max_len);
    if cut.len() < s.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}

/// Local history dates are UTC calendar days, `YYYY-MM-DD`.
pub fn today_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "crème" has a 2-byte è; cutting at 3 must not split it
        assert_eq!(truncate_str("crème", 3), "cr");
    }

    #[test]
    fn test_ellipsize() {
        assert_eq!(ellipsize("salmon", 10), "salmon");
        assert_eq!(ellipsize("grilled salmon", 7), "grilled...");
    }

    #[test]
    fn test_today_date_shape() {
        let d = today_date();
        assert_eq!(d.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_new_id_is_unique() {
        assert_ne!(new_id(), new_id());
    }
}
